use std::{env, fmt, net::IpAddr, path::PathBuf};
use thiserror::Error;

// Runtime/server configuration, read once at startup.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are Solver.AI, an expert in Physics, \
Chemistry, and Mathematics for the IIT JEE exam. Provide a clear, step-by-step solution. \
Use LaTeX for all mathematical expressions. Be encouraging and helpful.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not defined")]
    MissingApiKey,
    #[error("invalid HOST {value:?}: {source}")]
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid GEMINI_API_BASE_URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

// Upstream credential; Debug output is redacted so configs can be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: IpAddr,
    pub port: u16,
    pub api_key: ApiKey,
    pub model: String,
    pub api_base_url: String,
    pub static_dir: PathBuf,
    // Present only when the system instruction is enabled.
    pub system_instruction: Option<String>,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Parse from any key lookup so tests never have to mutate the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(ApiKey::new)
            .ok_or(ConfigError::MissingApiKey)?;

        let host = match lookup("HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { value, source })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_base_url =
            lookup("GEMINI_API_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        if let Err(source) = url::Url::parse(&api_base_url) {
            return Err(ConfigError::InvalidBaseUrl {
                value: api_base_url,
                source,
            });
        }

        let model = lookup("GEMINI_MODEL")
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let system_instruction = lookup("SYSTEM_INSTRUCTION_ENABLED")
            .is_some_and(|v| is_truthy(&v))
            .then(|| {
                lookup("SYSTEM_INSTRUCTION")
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string())
            });

        Ok(Self {
            host,
            port,
            api_key,
            model,
            api_base_url,
            static_dir,
            system_instruction,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
