//! Prompt templates and generation constants for the answer flow.

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
pub const GROUNDED_TEMPERATURE: f32 = 0.3;
pub const FALLBACK_TEMPERATURE: f32 = 0.7;
/// Characters of context shown to the relevance judge.
pub const JUDGE_CONTEXT_CHARS: usize = 1500;
pub const APOLOGY: &str = "Sorry, I couldn't find any relevant information.";

pub fn judge_prompt(query: &str, context: &str) -> String {
    format!(
        "You are an AI assistant that checks if context is relevant to a question.\n\
         Question: {query}\n\
         Context: {}\n\n\
         Answer only 'yes' if the context directly relates to the question, else 'no'.",
        truncate_chars(context, JUDGE_CONTEXT_CHARS)
    )
}

pub fn grounded_prompt(query: &str, context: &str) -> String {
    format!(
        "SYSTEM: Give concise, clear answers upto 60 words.\n\
         You are a helpful tourism and culture guide.\n\
         Use the following context to answer the question.\n\
         If it helps, you may add your general knowledge to make the answer more complete.\n\n\
         Context:\n{context}\n\nQuestion: {query}"
    )
}

pub fn fallback_prompt(query: &str) -> String {
    format!(
        "SYSTEM: Give concise, clear answers upto 60 words.\n\
         You are a friendly tourism and culture guide. \
         Use your knowledge to answer this question in detail:\n\n{query}"
    )
}

pub fn direct_prompt(query: &str) -> String {
    format!("You are a helpful travel assistant. Answer the following query:\n\n{query}")
}

/// First `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_prompt_caps_context() {
        let context = "é".repeat(2000);
        let prompt = judge_prompt("q", &context);
        assert_eq!(prompt.matches('é').count(), JUDGE_CONTEXT_CHARS);
        assert!(prompt.starts_with("You are an AI assistant that checks if context is relevant to a question.\nQuestion: q\nContext: "));
        assert!(prompt.ends_with("\n\nAnswer only 'yes' if the context directly relates to the question, else 'no'."));
    }

    #[test]
    fn grounded_prompt_layout() {
        let prompt = grounded_prompt("Where?", "ctx");
        assert_eq!(
            prompt,
            "SYSTEM: Give concise, clear answers upto 60 words.\nYou are a helpful tourism and culture guide.\nUse the following context to answer the question.\nIf it helps, you may add your general knowledge to make the answer more complete.\n\nContext:\nctx\n\nQuestion: Where?"
        );
    }

    #[test]
    fn fallback_and_direct_prompt_layout() {
        assert_eq!(
            fallback_prompt("Q"),
            "SYSTEM: Give concise, clear answers upto 60 words.\nYou are a friendly tourism and culture guide. Use your knowledge to answer this question in detail:\n\nQ"
        );
        assert_eq!(direct_prompt("Q"), "You are a helpful travel assistant. Answer the following query:\n\nQ");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_chars("नमस्ते", 2), "नम");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
