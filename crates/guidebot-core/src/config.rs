//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_SERVER__BIND`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Chunks retrieved per query unless `retrieval.top_k` says otherwise.
pub const DEFAULT_TOP_K: usize = 5;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub retrieval: RetrievalSettings,
    pub generation: GenerationSettings,
    pub llm: LlmSettings,
    pub ingest: IngestSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".into()));
        }
        if self.generation.max_output_tokens == 0 {
            return Err(Error::InvalidConfig("generation.max_output_tokens must be at least 1".into()));
        }
        if self.ingest.chunk_size == 0 || self.ingest.chunk_overlap >= self.ingest.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "ingest.chunk_overlap ({}) must be smaller than ingest.chunk_size ({})",
                self.ingest.chunk_overlap, self.ingest.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub banner: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            banner: "Welcome to the Tourism Chatbot API".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreSettings {
    pub index_path: String,
    pub meta_path: String,
    pub model_dir: Option<String>,
    pub use_fake_embeddings: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            index_path: "data/faiss_index.bin".to_string(),
            meta_path: "data/chunks_meta.json".to_string(),
            model_dir: None,
            use_fake_embeddings: false,
        }
    }
}

impl StoreSettings {
    pub fn index_path(&self) -> PathBuf {
        expand_path(&self.index_path)
    }

    pub fn meta_path(&self) -> PathBuf {
        expand_path(&self.meta_path)
    }

    pub fn model_dir(&self) -> Option<PathBuf> {
        self.model_dir.as_deref().map(expand_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { max_output_tokens: 500 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProviderKind,
    pub model: String,
    pub base_url: Option<String>,
    /// Falls back to `GOOGLE_API_KEY` / `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Gemini,
            model: "gemini-2.0-flash".to_string(),
            base_url: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Directory that relative PDF paths are resolved against.
    pub base_dir: String,
    pub cities: Vec<CitySource>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 150,
            base_dir: ".".to_string(),
            cities: default_cities(),
        }
    }
}

/// One entry of the ingestion catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CitySource {
    pub name: String,
    #[serde(default)]
    pub web: Option<String>,
    #[serde(default)]
    pub pdf: PdfPaths,
    #[serde(default)]
    pub text_url: Option<String>,
}

/// Accepts either `pdf = "a.pdf"` or `pdf = ["a.pdf", "b.pdf"]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "OneOrMany", into = "Vec<String>")]
pub struct PdfPaths(Vec<String>);

impl PdfPaths {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for PdfPaths {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<PdfPaths> for Vec<String> {
    fn from(paths: PdfPaths) -> Self {
        paths.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for PdfPaths {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(path) => Self(vec![path]),
            OneOrMany::Many(paths) => Self(paths),
        }
    }
}

fn default_cities() -> Vec<CitySource> {
    let delhi_pdfs = [
        "Art.pdf",
        "DELHI_HAAT_PITAMPURA_JANAKPURI.pdf",
        "Discover_India.pdf",
        "Faith.pdf",
        "Five_Senses_Brochure.pdf",
        "Metro.pdf",
        "Museums.pdf",
        "Shopping.pdf",
        "Taste.pdf",
    ];
    vec![
        CitySource {
            name: "Delhi".to_string(),
            web: Some("https://en.wikipedia.org/wiki/Delhi".to_string()),
            pdf: PdfPaths(delhi_pdfs.iter().map(|p| p.to_string()).collect()),
            text_url: None,
        },
        CitySource {
            name: "Mumbai".to_string(),
            web: Some("https://en.wikipedia.org/wiki/Mumbai".to_string()),
            pdf: PdfPaths(vec!["mumbai_tourism_brochure.pdf".to_string()]),
            text_url: None,
        },
        CitySource {
            name: "Jaipur".to_string(),
            web: Some("https://en.wikipedia.org/wiki/Jaipur".to_string()),
            pdf: PdfPaths(vec!["jaipur_tourism_brochure.pdf".to_string()]),
            text_url: None,
        },
    ]
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_the_service_contract() {
        let settings = Settings::default();
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.generation.max_output_tokens, 500);
        assert_eq!(settings.ingest.chunk_size, 800);
        assert_eq!(settings.ingest.chunk_overlap, 150);
        assert_eq!(settings.llm.model, "gemini-2.0-flash");
        assert_eq!(settings.ingest.cities.len(), 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn toml_and_env_layers_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [retrieval]
                top_k = 3

                [[ingest.cities]]
                name = "Jaipur"
                pdf = "jaipur.pdf"

                [[ingest.cities]]
                name = "Delhi"
                pdf = ["a.pdf", "b.pdf"]
                "#,
            )?;
            jail.set_env("APP_SERVER__BIND", "0.0.0.0:9000");
            jail.set_env("APP_LLM__PROVIDER", "openai");

            let config = Config::load_for_env("test").map_err(|e| e.to_string())?;
            let settings = config.settings().map_err(|e| e.to_string())?;
            assert_eq!(settings.retrieval.top_k, 3);
            assert_eq!(settings.server.bind, "0.0.0.0:9000");
            assert_eq!(settings.llm.provider, LlmProviderKind::OpenAi);
            assert_eq!(settings.generation.max_output_tokens, 500);
            assert_eq!(settings.ingest.cities.len(), 2);
            assert_eq!(settings.ingest.cities[0].pdf.iter().collect::<Vec<_>>(), vec!["jaipur.pdf"]);
            assert_eq!(settings.ingest.cities[1].pdf.len(), 2);
            assert!(settings.ingest.cities[1].web.is_none());

            let top_k: usize = config.get("retrieval.top_k").map_err(|e| e.to_string())?;
            assert_eq!(top_k, 3);
            Ok(())
        });
    }

    #[test]
    fn overlap_not_smaller_than_size_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[ingest]\nchunk_size = 100\nchunk_overlap = 100\n")?;
            assert!(Config::load_for_env("test").is_err());
            Ok(())
        });
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/srv/brochures");
        assert_eq!(resolve_with_base(base, "Taste.pdf"), PathBuf::from("/srv/brochures/Taste.pdf"));
        assert_eq!(resolve_with_base(base, "/tmp/Metro.pdf"), PathBuf::from("/tmp/Metro.pdf"));
    }
}
