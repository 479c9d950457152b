//! HTTP TTS Client - 调用外部合成引擎服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 服务
//!
//! 外部 TTS API:
//! POST http://localhost:8000/api/tts/synthesize
//! Request: {"text": "...", "language": "vi", "speed": 1.0, ...}  (JSON)
//! Response: audio/wav binary

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};
use crate::infrastructure::adapters::encoder::decode_wav;

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    text: &'a str,
    language: &'a str,
    speed: f32,
    length_penalty: f32,
    temperature: f32,
    repetition_penalty: f32,
    enable_text_splitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    do_sample: bool,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 采样参数，未设置时由引擎决定
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub do_sample: bool,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            top_k: None,
            top_p: None,
            do_sample: true,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_sampling(mut self, top_k: Option<u32>, top_p: Option<f32>, do_sample: bool) -> Self {
        self.top_k = top_k;
        self.top_p = top_p;
        self.do_sample = do_sample;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 使用默认配置创建客户端
    pub fn with_default_config() -> Result<Self, TtsError> {
        Self::new(HttpTtsClientConfig::default())
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!(
            "{}/api/tts/synthesize",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body<'a>(&self, request: &'a SynthesisRequest) -> TtsHttpRequest<'a> {
        TtsHttpRequest {
            text: &request.text,
            language: &request.language,
            speed: request.params.speed,
            length_penalty: request.params.length_penalty,
            temperature: request.params.temperature,
            repetition_penalty: request.params.repetition_penalty,
            enable_text_splitting: request.params.enable_text_splitting,
            top_k: self.config.top_k,
            top_p: self.config.top_p,
            do_sample: self.config.do_sample,
        }
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError> {
        let url = self.synthesize_url();
        let body = self.request_body(&request);

        tracing::debug!(
            url = %url,
            text_len = request.text.chars().count(),
            language = %request.language,
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio_data = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TtsError::Timeout
            } else {
                TtsError::InvalidResponse(format!("Failed to read audio: {}", e))
            }
        })?;

        let audio = decode_wav(&audio_data)
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            duration_ms = audio.duration_ms(),
            sample_rate = audio.sample_rate(),
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisOutput { audio })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
