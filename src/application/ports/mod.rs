//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_encoder;
mod tts_engine;

pub use audio_encoder::{AudioEncoderPort, EncodeError, EncodedAudio};
pub use tts_engine::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};
