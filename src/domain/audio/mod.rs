//! Audio Context - 合成音频后处理
//!
//! 职责:
//! - AudioBuffer 值对象（单声道 PCM + 采样率）
//! - 基于短时 RMS 能量的尾部静音裁剪

mod errors;
mod silence_trimmer;
mod value_objects;

pub use errors::AudioError;
pub use silence_trimmer::{
    find_trim_point, rms_frames, trim_silence, TrimConfig, DEFAULT_FRAME_LENGTH, DEFAULT_HOP_LENGTH,
    DEFAULT_KEEP_SILENCE_SECS, DEFAULT_RMS_THRESHOLD,
};
pub use value_objects::AudioBuffer;
