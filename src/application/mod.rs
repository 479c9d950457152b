//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、AudioEncoder）
//! - pipeline: 段落 → 片段 → 合成 → 裁剪 的编排
//! - error: 应用层错误定义

pub mod error;
pub mod pipeline;
pub mod ports;

pub use error::PipelineError;

pub use pipeline::{
    chunk_key, AudioEntry, AudioMap, ChunkFailure, ChunkPipeline, FailurePolicy, PipelineConfig,
    DEFAULT_OUTPUT_KEY_LEN,
};

pub use ports::{
    AudioEncoderPort, EncodeError, EncodedAudio, SynthesisOutput, SynthesisRequest,
    TtsEnginePort, TtsError,
};
