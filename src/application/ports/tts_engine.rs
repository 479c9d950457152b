//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义合成引擎的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioBuffer;
use crate::domain::SynthesisParameters;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 已规范化的文本
    pub text: String,
    /// 语言代码
    pub language: String,
    /// 按片段计算出的参数
    pub params: SynthesisParameters,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// 单声道 PCM（含采样率）
    pub audio: AudioBuffer,
}

/// TTS Engine Port
///
/// 引擎是稀缺资源（可能独占 GPU），调用方负责限制并发，端口本身不做重试
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成一个片段
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError>;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
