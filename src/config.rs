//! Configuration for polyrun
//!
//! Settings come from environment variables with fallback defaults; CLI flags
//! override individual fields afterwards.
//!
//! # Environment Variables
//!
//! - `POLYRUN_PROVIDER`: recovery model provider (ollama|openai|anthropic|gemini|xai|groq) - default: "ollama"
//! - `POLYRUN_MODEL`: model name - default: "qwen2.5-coder:7b"
//! - `POLYRUN_API_BASE_URL`: custom endpoint for the provider - default: provider's own
//! - `POLYRUN_EXEC_TIMEOUT`: per-process timeout in seconds - default: "30"
//! - `POLYRUN_REQUEST_TIMEOUT`: model request timeout in seconds - default: "60"
//! - `POLYRUN_MAX_PROMPT_CHARS`: repair prompt bound - default: "4096"
//! - `POLYRUN_MAX_SUGGESTION_CHARS`: suggestion bound - default: "2048"
//! - `POLYRUN_SCRATCH_DIR`: parent of compile scratch directories - default: system temp dir
//! - `POLYRUN_PYTHON_BRIDGE`: feed Python snippets over stdin (true|false) - default: "false"
//! - `POLYRUN_RECOVERY`: ask the model for repairs (true|false) - default: "true"
//! - `POLYRUN_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `OLLAMA_HOST`,
//! ...) are read by genai itself.
//!
//! # Example
//!
//! ```no_run
//! use polyrun::PolyrunConfig;
//!
//! let config = PolyrunConfig::default();
//! config.validate().expect("invalid configuration");
//! let dispatcher = config.create_dispatcher();
//! ```

use crate::dispatch::Dispatcher;
use crate::llm::{GenAIClient, LLMClient};
use crate::recovery::{RecoveryAdvisor, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_MAX_SUGGESTION_CHARS};
use crate::toolchain::{ExecutionContext, SystemRunner, ToolchainRegistry};
use crate::util::logging::try_parse_level;
use genai::adapter::AdapterKind;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct PolyrunConfig {
    /// Provider used by the recovery advisor (from genai)
    pub provider: AdapterKind,

    pub model: String,

    /// Custom base URL for the provider, e.g. a remote Ollama host
    pub api_base_url: Option<String>,

    /// Upper bound for every toolchain process
    pub exec_timeout_secs: u64,

    pub request_timeout_secs: u64,

    pub max_prompt_chars: usize,

    pub max_suggestion_chars: usize,

    /// Parent directory for compile scratch directories, system temp dir when unset
    pub scratch_root: Option<PathBuf>,

    pub python_bridge: bool,

    pub recovery_enabled: bool,

    pub log_level: String,
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    let lower = name.trim().to_lowercase();
    let alias = match lower.as_str() {
        "claude" => "anthropic",
        "grok" => "xai",
        other => other,
    };
    AdapterKind::from_lower_str(alias).ok_or_else(|| ConfigError::InvalidProvider(name.to_string()))
}

impl Default for PolyrunConfig {
    /// Loads `POLYRUN_*` environment variables, falling back to defaults
    fn default() -> Self {
        let provider = env::var("POLYRUN_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::Ollama);

        let model = env::var("POLYRUN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_base_url = env::var("POLYRUN_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let scratch_root = env::var("POLYRUN_SCRATCH_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("POLYRUN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            api_base_url,
            exec_timeout_secs: env_parse("POLYRUN_EXEC_TIMEOUT").unwrap_or(DEFAULT_EXEC_TIMEOUT_SECS),
            request_timeout_secs: env_parse("POLYRUN_REQUEST_TIMEOUT")
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_prompt_chars: env_parse("POLYRUN_MAX_PROMPT_CHARS").unwrap_or(DEFAULT_MAX_PROMPT_CHARS),
            max_suggestion_chars: env_parse("POLYRUN_MAX_SUGGESTION_CHARS")
                .unwrap_or(DEFAULT_MAX_SUGGESTION_CHARS),
            scratch_root,
            python_bridge: env_parse("POLYRUN_PYTHON_BRIDGE").unwrap_or(false),
            recovery_enabled: env_parse("POLYRUN_RECOVERY").unwrap_or(true),
            log_level,
        }
    }
}

impl PolyrunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_timeout("Execution timeout", self.exec_timeout_secs)?;
        check_timeout("Request timeout", self.request_timeout_secs)?;

        if !(256..=65_536).contains(&self.max_prompt_chars) {
            return Err(ConfigError::ValidationFailed(format!(
                "Max prompt chars must be between 256 and 65536, got {}",
                self.max_prompt_chars
            )));
        }
        if !(64..=65_536).contains(&self.max_suggestion_chars) {
            return Err(ConfigError::ValidationFailed(format!(
                "Max suggestion chars must be between 64 and 65536, got {}",
                self.max_suggestion_chars
            )));
        }

        if try_parse_level(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }

    pub fn create_llm_client(&self) -> Arc<dyn LLMClient> {
        Arc::new(GenAIClient::new(
            self.provider,
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
            self.api_base_url.clone(),
        ))
    }

    pub fn create_registry(&self) -> ToolchainRegistry {
        let registry = ToolchainRegistry::with_defaults();
        if self.python_bridge {
            registry.with_python_bridge()
        } else {
            registry
        }
    }

    pub fn create_execution_context(&self) -> ExecutionContext {
        let context = ExecutionContext::new(Arc::new(SystemRunner), self.exec_timeout());
        match &self.scratch_root {
            Some(root) => context.with_scratch_root(root),
            None => context,
        }
    }

    /// Advisor over `client`, bounded by the configured prompt and suggestion limits
    pub fn create_advisor(&self, client: Arc<dyn LLMClient>) -> RecoveryAdvisor {
        RecoveryAdvisor::new(client).with_limits(self.max_prompt_chars, self.max_suggestion_chars)
    }

    /// Production dispatcher: system toolchains, and a genai-backed advisor when recovery is on
    pub fn create_dispatcher(&self) -> Dispatcher {
        let dispatcher = Dispatcher::new(self.create_registry(), self.create_execution_context());
        if self.recovery_enabled {
            dispatcher.with_recovery(self.create_advisor(self.create_llm_client()))
        } else {
            dispatcher
        }
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("provider".to_string(), format!("{:?}", self.provider));
        map.insert("model".to_string(), self.model.clone());
        if let Some(ref url) = self.api_base_url {
            map.insert("api_base_url".to_string(), url.clone());
        }
        map.insert(
            "exec_timeout_secs".to_string(),
            self.exec_timeout_secs.to_string(),
        );
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert(
            "max_prompt_chars".to_string(),
            self.max_prompt_chars.to_string(),
        );
        map.insert(
            "max_suggestion_chars".to_string(),
            self.max_suggestion_chars.to_string(),
        );
        if let Some(ref dir) = self.scratch_root {
            map.insert("scratch_root".to_string(), dir.display().to_string());
        }
        map.insert("python_bridge".to_string(), self.python_bridge.to_string());
        map.insert(
            "recovery_enabled".to_string(),
            self.recovery_enabled.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

fn check_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationFailed(format!(
            "{} must be at least 1 second",
            name
        )));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::ValidationFailed(format!(
            "{} cannot exceed 10 minutes",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageTag;
    use crate::toolchain::AdapterVariant;
    use serial_test::serial;

    const VARS: [&str; 11] = [
        "POLYRUN_PROVIDER",
        "POLYRUN_MODEL",
        "POLYRUN_API_BASE_URL",
        "POLYRUN_EXEC_TIMEOUT",
        "POLYRUN_REQUEST_TIMEOUT",
        "POLYRUN_MAX_PROMPT_CHARS",
        "POLYRUN_MAX_SUGGESTION_CHARS",
        "POLYRUN_SCRATCH_DIR",
        "POLYRUN_PYTHON_BRIDGE",
        "POLYRUN_RECOVERY",
        "POLYRUN_LOG_LEVEL",
    ];

    /// Restores the touched variables when dropped
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clean() -> Self {
            let saved = VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
            for key in VARS {
                env::remove_var(key);
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guard = EnvGuard::clean();

        let config = PolyrunConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_base_url.is_none());
        assert_eq!(config.exec_timeout_secs, 30);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.max_prompt_chars, 4096);
        assert_eq!(config.max_suggestion_chars, 2048);
        assert!(config.scratch_root.is_none());
        assert!(!config.python_bridge);
        assert!(config.recovery_enabled);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guard = EnvGuard::clean();
        env::set_var("POLYRUN_PROVIDER", "Claude");
        env::set_var("POLYRUN_MODEL", "custom-model");
        env::set_var("POLYRUN_EXEC_TIMEOUT", "5");
        env::set_var("POLYRUN_MAX_PROMPT_CHARS", "1024");
        env::set_var("POLYRUN_SCRATCH_DIR", "/tmp/polyrun-scratch");
        env::set_var("POLYRUN_PYTHON_BRIDGE", "true");
        env::set_var("POLYRUN_RECOVERY", "false");
        env::set_var("POLYRUN_LOG_LEVEL", "DEBUG");

        let config = PolyrunConfig::default();

        assert_eq!(config.provider, AdapterKind::Anthropic);
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.exec_timeout_secs, 5);
        assert_eq!(config.max_prompt_chars, 1024);
        assert_eq!(
            config.scratch_root,
            Some(PathBuf::from("/tmp/polyrun-scratch"))
        );
        assert!(config.python_bridge);
        assert!(!config.recovery_enabled);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_unparseable_values_fall_back() {
        let _guard = EnvGuard::clean();
        env::set_var("POLYRUN_PROVIDER", "not-a-provider");
        env::set_var("POLYRUN_EXEC_TIMEOUT", "soon");

        let config = PolyrunConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.exec_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_validation_bounds() {
        let _guard = EnvGuard::clean();
        let base = PolyrunConfig::default();

        let mut config = base.clone();
        config.exec_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.max_prompt_chars = 100;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.max_suggestion_chars = 70_000;
        assert!(config.validate().is_err());

        let mut config = base;
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("ollama").unwrap(), AdapterKind::Ollama);
        assert_eq!(parse_provider("OpenAI").unwrap(), AdapterKind::OpenAI);
        assert_eq!(parse_provider("grok").unwrap(), AdapterKind::Xai);
        assert!(matches!(
            parse_provider("mainframe"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    #[serial]
    fn test_registry_honors_python_bridge() {
        let _guard = EnvGuard::clean();
        let mut config = PolyrunConfig::default();

        assert_eq!(
            config.create_registry().variant_of(LanguageTag::Python),
            Some(AdapterVariant::ScriptInterpreter)
        );

        config.python_bridge = true;
        assert_eq!(
            config.create_registry().variant_of(LanguageTag::Python),
            Some(AdapterVariant::InProcessInterpreter)
        );
    }

    #[test]
    #[serial]
    fn test_execution_context_from_config() {
        let _guard = EnvGuard::clean();
        let mut config = PolyrunConfig::default();
        config.exec_timeout_secs = 7;
        config.scratch_root = Some(PathBuf::from("/var/tmp"));

        let context = config.create_execution_context();

        assert_eq!(context.timeout, Duration::from_secs(7));
        assert_eq!(context.scratch_root, Some(PathBuf::from("/var/tmp")));
    }

    #[test]
    #[serial]
    fn test_display_map() {
        let _guard = EnvGuard::clean();
        let config = PolyrunConfig::default();

        let map = config.to_display_map();
        assert_eq!(map.get("model").map(String::as_str), Some(DEFAULT_MODEL));
        assert_eq!(map.get("exec_timeout_secs").map(String::as_str), Some("30"));
        assert!(!map.contains_key("scratch_root"));
    }
}
