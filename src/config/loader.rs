//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量（`VIXTTS_` 前缀）
//! 2. 旧版环境变量 `XTTS_KEEP_SILENCE_DURATION`
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File, Map};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

const ENV_PREFIX: &str = "VIXTTS";

/// 旧版服务读取的尾部静音时长（秒）
const LEGACY_KEEP_SILENCE_VAR: &str = "XTTS_KEEP_SILENCE_DURATION";

/// 与旧版变量冲突时优先的新变量
const KEEP_SILENCE_VAR: &str = "VIXTTS_TRIM__KEEP_SILENCE_SECS";

/// 加载应用配置
///
/// # 环境变量示例
/// - `VIXTTS_SERVER__PORT=8080`
/// - `VIXTTS_TTS__URL=http://tts-server:8000`
/// - `VIXTTS_TRIM__KEEP_SILENCE_SECS=0.3`
/// - `VIXTTS_PIPELINE__FAILURE_POLICY=partial`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_from_sources(config_path, None)
}

/// 从指定文件和环境变量表加载配置
///
/// `env` 为 None 时读取进程环境变量。
pub fn load_config_from_sources(
    config_path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("tts.backend", "http")?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("tts.default_language", "vi")?
        .set_default("tts.do_sample", true)?
        .set_default("segment.max_chars", 250)?
        .set_default("trim.threshold", 0.01)?
        .set_default("trim.frame_length", 2048)?
        .set_default("trim.hop_length", 512)?
        .set_default("trim.keep_silence_secs", 0.2)?
        .set_default("pipeline.output_key_len", 50)?
        .set_default("pipeline.max_concurrent", 1)?
        .set_default("pipeline.failure_policy", "abort")?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 旧版变量，仅在新变量未设置时生效
    let lookup = |key: &str| match &env {
        Some(map) => map.get(key).cloned(),
        None => std::env::var(key).ok(),
    };
    if lookup(KEEP_SILENCE_VAR).is_none() {
        if let Some(raw) = lookup(LEGACY_KEEP_SILENCE_VAR) {
            match raw.trim().parse::<f64>() {
                Ok(secs) => {
                    builder = builder.set_override("trim.keep_silence_secs", secs)?;
                }
                Err(_) => {
                    return Err(ConfigError::ParseError(format!(
                        "{} must be a number of seconds, got {:?}",
                        LEGACY_KEEP_SILENCE_VAR, raw
                    )));
                }
            }
        }
    }

    // 4. 环境变量（最高优先级）
    // 例如: VIXTTS_TTS__URL=http://tts-server:8000
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env.clone()),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.backend == TtsBackend::Http && config.tts.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.tts.default_language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default language cannot be empty".to_string(),
        ));
    }

    config
        .pipeline_config()
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("TTS Backend: {:?}", config.tts.backend);
    if config.tts.backend == TtsBackend::Http {
        tracing::info!("TTS URL: {}", config.tts.url);
        tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    }
    tracing::info!("Default Language: {}", config.tts.default_language);
    tracing::info!("Segment Max Chars: {}", config.segment.max_chars);
    tracing::info!(
        "Trim: threshold={} frame={} hop={} keep={}s",
        config.trim.threshold,
        config.trim.frame_length,
        config.trim.hop_length,
        config.trim.keep_silence_secs
    );
    tracing::info!(
        "Pipeline: max_concurrent={} failure_policy={:?}",
        config.pipeline.max_concurrent,
        config.pipeline.failure_policy
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::FailurePolicy;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_url_only_matters_for_http_backend() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());

        config.tts.backend = TtsBackend::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_invalid_trim() {
        let mut config = AppConfig::default();
        config.trim.hop_length = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = AppConfig::default();
        config.trim.keep_silence_secs = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_limits() {
        let mut config = AppConfig::default();
        config.segment.max_chars = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.pipeline.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_file_then_env_layering() {
        let file = write_config(
            r#"
[server]
port = 6000

[trim]
keep_silence_secs = 0.4

[pipeline]
failure_policy = "partial"
max_concurrent = 2
"#,
        );

        let config = load_config_from_sources(
            Some(file.path()),
            env(&[("VIXTTS_SERVER__PORT", "7000")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.trim.keep_silence_secs, 0.4);
        assert_eq!(config.pipeline.failure_policy, FailurePolicy::Partial);
        assert_eq!(config.pipeline.max_concurrent, 2);
        assert_eq!(config.segment.max_chars, 250);
    }

    #[test]
    fn test_legacy_keep_silence_variable() {
        let file = write_config("");

        let config = load_config_from_sources(
            Some(file.path()),
            env(&[("XTTS_KEEP_SILENCE_DURATION", "0.8")]),
        )
        .unwrap();
        assert!((config.trim.keep_silence_secs - 0.8).abs() < 1e-6);

        // 新变量优先
        let config = load_config_from_sources(
            Some(file.path()),
            env(&[
                ("XTTS_KEEP_SILENCE_DURATION", "0.8"),
                ("VIXTTS_TRIM__KEEP_SILENCE_SECS", "0.3"),
            ]),
        )
        .unwrap();
        assert!((config.trim.keep_silence_secs - 0.3).abs() < 1e-6);

    }

    #[test]
    fn test_unparseable_legacy_variable_is_an_error() {
        let file = write_config("");
        let result = load_config_from_sources(
            Some(file.path()),
            env(&[("XTTS_KEEP_SILENCE_DURATION", "lots")]),
        );
        assert!(matches!(result, Err(ConfigError::ParseError(msg)) if msg.contains("lots")));

        // 新变量存在时不读取旧变量
        let config = load_config_from_sources(
            Some(file.path()),
            env(&[
                ("XTTS_KEEP_SILENCE_DURATION", "lots"),
                ("VIXTTS_TRIM__KEEP_SILENCE_SECS", "0.3"),
            ]),
        )
        .unwrap();
        assert!((config.trim.keep_silence_secs - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_env_value_fails_validation() {
        let file = write_config("");
        let result = load_config_from_sources(
            Some(file.path()),
            env(&[("VIXTTS_SEGMENT__MAX_CHARS", "0")]),
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
