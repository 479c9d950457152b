//! Audio Context - Value Objects

/// 单声道 PCM 音频
///
/// 样本为 [-1.0, 1.0] 区间的 f32。合成引擎产出后只允许截断尾部，
/// 保留部分的样本值不会被修改。
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / self.sample_rate as u64
    }

    /// 截断到最多 `len` 个样本，永不扩展
    pub fn truncate(mut self, len: usize) -> Self {
        self.samples.truncate(len);
        self
    }
}
