//! Application State

use std::sync::Arc;

use crate::application::ports::AudioEncoderPort;
use crate::application::ChunkPipeline;

/// 应用状态
pub struct AppState {
    pub pipeline: Arc<ChunkPipeline>,
    pub encoder: Arc<dyn AudioEncoderPort>,
    /// 请求未指定语言时使用
    pub default_language: String,
}

impl AppState {
    pub fn new(
        pipeline: Arc<ChunkPipeline>,
        encoder: Arc<dyn AudioEncoderPort>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            encoder,
            default_language: default_language.into(),
        }
    }
}
