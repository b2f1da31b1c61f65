use crate::services::providers::gemini::GEMINI_API_BASE;
use crate::services::providers::ProviderKind;
use portal_core::config as core_config;
use portal_core::error::AppError;
use secrecy::Secret;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Which answering pipeline the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One implicit answer table, no role classification.
    Single,
    /// Keyword role classification selects the answer table.
    RoleAware,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "single" | "a" => Ok(Variant::Single),
            "role_aware" | "b" => Ok(Variant::RoleAware),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub assistant: AssistantConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub variant: Variant,
    pub provider: ProviderKind,
    pub provider_timeout: Duration,
    /// JSON file replacing the built-in curated answers.
    pub answers_path: Option<String>,
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider: ProviderKind = parse_env(
            &get_env("CHAT_PROVIDER", Some("gemini"), is_prod)?,
            "CHAT_PROVIDER",
        )?;
        // Outside production the key may be absent; generation then falls back.
        let api_key = match provider {
            ProviderKind::Gemini => {
                let key = get_env("GEMINI_API_KEY", Some(""), is_prod)?;
                require_in_prod("GEMINI_API_KEY", key, is_prod)?
            }
            ProviderKind::Mock => env::var("GEMINI_API_KEY").unwrap_or_default(),
        };

        let provider_timeout_secs = optional_env("CHAT_PROVIDER_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS);

        Ok(ChatConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: Secret::new(api_key),
                model: get_env("GEMINI_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                api_base: optional_env("GEMINI_API_BASE")
                    .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            },
            assistant: AssistantConfig {
                variant: parse_env(
                    &get_env("CHAT_VARIANT", Some("single"), is_prod)?,
                    "CHAT_VARIANT",
                )?,
                provider,
                provider_timeout: Duration::from_secs(provider_timeout_secs),
                answers_path: optional_env("CHAT_ANSWERS_PATH"),
            },
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Production refuses a variable that is set but blank.
fn require_in_prod(key: &str, value: String, is_prod: bool) -> Result<String, AppError> {
    if is_prod && value.trim().is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but empty",
            key
        )));
    }
    Ok(value)
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(value: &str, key: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
}
