//! 应用层错误定义

use thiserror::Error;

use crate::application::ports::TtsError;
use crate::domain::audio::AudioError;

/// 流水线错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 段落规范化后为空
    #[error("Empty input: nothing to synthesize")]
    EmptyInput,

    /// 某个片段合成失败
    #[error("Synthesis failed for chunk {index} ({text:?}): {source}")]
    SynthesisFailure {
        index: usize,
        text: String,
        #[source]
        source: TtsError,
    },

    /// 配置无效
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// 创建配置无效错误
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<AudioError> for PipelineError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::InvalidConfiguration(msg) => Self::InvalidConfiguration(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}
