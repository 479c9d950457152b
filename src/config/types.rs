//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::application::{FailurePolicy, PipelineConfig, DEFAULT_OUTPUT_KEY_LEN};
use crate::domain::audio::{
    TrimConfig, DEFAULT_FRAME_LENGTH, DEFAULT_HOP_LENGTH, DEFAULT_KEEP_SILENCE_SECS,
    DEFAULT_RMS_THRESHOLD,
};
use crate::domain::DEFAULT_MAX_CHARS;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 分段配置
    #[serde(default)]
    pub segment: SegmentSettings,

    /// 静音裁剪配置
    #[serde(default)]
    pub trim: TrimSettings,

    /// 流水线配置
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 裁剪参数
    pub fn trim_config(&self) -> TrimConfig {
        TrimConfig {
            threshold: self.trim.threshold,
            frame_length: self.trim.frame_length,
            hop_length: self.trim.hop_length,
            keep_silence_secs: self.trim.keep_silence_secs,
        }
    }

    /// 流水线参数
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_chars: self.segment.max_chars,
            trim: self.trim_config(),
            output_key_len: self.pipeline.output_key_len,
            max_concurrent: self.pipeline.max_concurrent,
            failure_policy: self.pipeline.failure_policy,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsBackend {
    /// 外部 HTTP 合成服务
    #[default]
    Http,
    /// 本地正弦音引擎（开发/测试）
    Fake,
}

/// 合成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub backend: TtsBackend,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 请求未指定语言时使用
    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default)]
    pub top_k: Option<u32>,

    #[serde(default)]
    pub top_p: Option<f32>,

    #[serde(default = "default_do_sample")]
    pub do_sample: bool,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_language() -> String {
    "vi".to_string()
}

fn default_do_sample() -> bool {
    true
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            backend: TtsBackend::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            default_language: default_language(),
            top_k: None,
            top_p: None,
            do_sample: default_do_sample(),
        }
    }
}

/// 分段配置
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentSettings {
    /// 单个片段最大字符数
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

/// 静音裁剪配置
#[derive(Debug, Clone, Deserialize)]
pub struct TrimSettings {
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    #[serde(default = "default_frame_length")]
    pub frame_length: usize,

    #[serde(default = "default_hop_length")]
    pub hop_length: usize,

    /// 保留的尾部静音（秒）
    #[serde(default = "default_keep_silence")]
    pub keep_silence_secs: f32,
}

fn default_threshold() -> f32 {
    DEFAULT_RMS_THRESHOLD
}

fn default_frame_length() -> usize {
    DEFAULT_FRAME_LENGTH
}

fn default_hop_length() -> usize {
    DEFAULT_HOP_LENGTH
}

fn default_keep_silence() -> f32 {
    DEFAULT_KEEP_SILENCE_SECS
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            frame_length: default_frame_length(),
            hop_length: default_hop_length(),
            keep_silence_secs: default_keep_silence(),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 输出 key 保留的字符数
    #[serde(default = "default_output_key_len")]
    pub output_key_len: usize,

    /// 同时进行的引擎调用数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_output_key_len() -> usize {
    DEFAULT_OUTPUT_KEY_LEN
}

fn default_max_concurrent() -> usize {
    1
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            output_key_len: default_output_key_len(),
            max_concurrent: default_max_concurrent(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
