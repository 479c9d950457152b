//! 尾部静音裁剪
//!
//! 基于短时 RMS 能量定位最后一个有声帧，裁掉其后的静音，
//! 同时保留 `keep_silence_secs` 秒的尾音。

use super::{AudioBuffer, AudioError};

/// 默认 RMS 阈值
pub const DEFAULT_RMS_THRESHOLD: f32 = 0.01;

/// 默认帧长（样本数）
pub const DEFAULT_FRAME_LENGTH: usize = 2048;

/// 默认帧移（样本数）
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// 默认保留的尾部静音（秒）
/// 0.8s 会让短句的输出被明显拉长，当前使用 0.2s
pub const DEFAULT_KEEP_SILENCE_SECS: f32 = 0.2;

/// 裁剪配置
#[derive(Debug, Clone, PartialEq)]
pub struct TrimConfig {
    /// 高于该 RMS 值的帧视为有声
    pub threshold: f32,
    /// RMS 帧长（样本数）
    pub frame_length: usize,
    /// 帧移（样本数）
    pub hop_length: usize,
    /// 最后一个有声帧之后保留的静音（秒）
    pub keep_silence_secs: f32,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RMS_THRESHOLD,
            frame_length: DEFAULT_FRAME_LENGTH,
            hop_length: DEFAULT_HOP_LENGTH,
            keep_silence_secs: DEFAULT_KEEP_SILENCE_SECS,
        }
    }
}

impl TrimConfig {
    pub fn validate(&self) -> Result<(), AudioError> {
        if self.frame_length == 0 {
            return Err(AudioError::InvalidConfiguration(
                "frame_length must be greater than 0".to_string(),
            ));
        }
        if self.hop_length == 0 {
            return Err(AudioError::InvalidConfiguration(
                "hop_length must be greater than 0".to_string(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(AudioError::InvalidConfiguration(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if !self.keep_silence_secs.is_finite() || self.keep_silence_secs < 0.0 {
            return Err(AudioError::InvalidConfiguration(format!(
                "keep_silence_secs must be a non-negative number, got {}",
                self.keep_silence_secs
            )));
        }
        Ok(())
    }
}

/// 计算逐帧 RMS 能量
///
/// 帧以 `t * hop_length` 为中心，两端各补 `frame_length / 2` 个零，
/// 因此第 `t` 帧对应的样本下标就是 `t * hop_length`。
pub fn rms_frames(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f32> {
    if frame_length == 0 || hop_length == 0 {
        return Vec::new();
    }

    let pad = frame_length / 2;
    let padded_len = samples.len() + 2 * pad;
    if padded_len < frame_length {
        return Vec::new();
    }

    let num_frames = 1 + (padded_len - frame_length) / hop_length;
    (0..num_frames)
        .map(|t| {
            // 帧在补零序列中的区间 [start, start + frame_length)，换算回原始样本下标
            let start = t * hop_length;
            let lo = start.saturating_sub(pad).min(samples.len());
            let hi = (start + frame_length).saturating_sub(pad).min(samples.len());
            let energy: f64 = samples[lo..hi]
                .iter()
                .map(|&s| f64::from(s) * f64::from(s))
                .sum();
            (energy / frame_length as f64).sqrt() as f32
        })
        .collect()
}

/// 计算裁剪后的样本数
///
/// 返回 `min(last_active_sample + keep_silence_samples, len)`。
/// 没有任何帧超过阈值时返回 `AudioError::SilentAudio`。
pub fn find_trim_point(audio: &AudioBuffer, config: &TrimConfig) -> Result<usize, AudioError> {
    config.validate()?;

    let rms = rms_frames(audio.samples(), config.frame_length, config.hop_length);
    let last_frame = rms
        .iter()
        .rposition(|&energy| energy > config.threshold)
        .ok_or(AudioError::SilentAudio {
            threshold: config.threshold,
        })?;

    let last_sample = last_frame * config.hop_length;
    let keep_silence_samples =
        (f64::from(config.keep_silence_secs) * f64::from(audio.sample_rate())) as usize;

    Ok(last_sample
        .saturating_add(keep_silence_samples)
        .min(audio.len()))
}

/// 裁剪尾部静音
pub fn trim_silence(audio: AudioBuffer, config: &TrimConfig) -> Result<AudioBuffer, AudioError> {
    let end = find_trim_point(&audio, config)?;
    Ok(audio.truncate(end))
}
