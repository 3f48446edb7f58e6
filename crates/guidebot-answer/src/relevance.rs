/// Whether the judge's reply rejects the context.
///
/// Any occurrence of "no" in the lower-cased reply counts, so "not relevant"
/// and "yes, no doubt" both reject. Only a reply free of "no" accepts.
pub fn judged_irrelevant(reply: &str) -> bool {
    reply.trim().to_lowercase().contains("no")
}

#[cfg(test)]
mod tests {
    use super::judged_irrelevant;

    #[test]
    fn substring_match() {
        assert!(!judged_irrelevant("yes"));
        assert!(!judged_irrelevant("  YES\n"));
        assert!(judged_irrelevant("no"));
        assert!(judged_irrelevant("No."));
        assert!(judged_irrelevant("not relevant"));
        assert!(judged_irrelevant("yes, no doubt"));
        assert!(judged_irrelevant("I do not know"));
    }
}
