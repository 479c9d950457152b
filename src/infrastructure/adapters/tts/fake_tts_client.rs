//! Fake TTS Client - 用于开发和测试的合成引擎
//!
//! 不调用任何外部服务，按文本长度生成正弦音，末尾追加固定长度的静音

use async_trait::async_trait;
use std::f32::consts::PI;

use crate::application::ports::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};
use crate::domain::audio::AudioBuffer;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 采样率
    pub sample_rate: u32,
    /// 每个字符对应的发声时长（毫秒）
    pub ms_per_char: u64,
    /// 尾部静音时长（毫秒）
    pub silence_tail_ms: u64,
    /// 正弦音频率（Hz）
    pub frequency: f32,
    /// 正弦音振幅
    pub amplitude: f32,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            ms_per_char: 60,
            silence_tail_ms: 800,
            frequency: 220.0,
            amplitude: 0.3,
            latency_ms: 0,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            ms_per_char = config.ms_per_char,
            silence_tail_ms = config.silence_tail_ms,
            "FakeTtsClient initialized"
        );
        Self { config }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    fn samples_for_ms(&self, ms: u64) -> usize {
        (ms * self.config.sample_rate as u64 / 1000) as usize
    }

    fn render(&self, text: &str) -> AudioBuffer {
        let voiced_ms = text.chars().count() as u64 * self.config.ms_per_char;
        let voiced = self.samples_for_ms(voiced_ms);
        let tail = self.samples_for_ms(self.config.silence_tail_ms);
        let rate = self.config.sample_rate as f32;

        let mut samples: Vec<f32> = (0..voiced)
            .map(|i| self.config.amplitude * (2.0 * PI * self.config.frequency * i as f32 / rate).sin())
            .collect();
        samples.resize(voiced + tail, 0.0);

        AudioBuffer::new(samples, self.config.sample_rate)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError> {
        tracing::debug!(
            text_len = request.text.chars().count(),
            language = %request.language,
            "FakeTtsClient: rendering tone"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        Ok(SynthesisOutput {
            audio: self.render(&request.text),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
