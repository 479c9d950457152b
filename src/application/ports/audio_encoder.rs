//! Audio Encoder Port - 音频编码抽象
//!
//! 把 AudioBuffer 序列化为标准容器格式，流水线本身不关心容器细节

use thiserror::Error;

use crate::domain::audio::AudioBuffer;

/// 编码错误
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// 编码结果
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    /// 容器字节
    pub data: Vec<u8>,
    /// 文件扩展名（不含点）
    pub extension: &'static str,
    /// MIME 类型
    pub mime_type: &'static str,
}

/// Audio Encoder Port
pub trait AudioEncoderPort: Send + Sync {
    /// 编码音频
    fn encode(&self, audio: &AudioBuffer) -> Result<EncodedAudio, EncodeError>;
}
