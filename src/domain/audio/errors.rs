//! Audio Context - Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("音频中没有超过阈值的帧: threshold={threshold}")]
    SilentAudio { threshold: f32 },

    #[error("无效的裁剪配置: {0}")]
    InvalidConfiguration(String),
}
