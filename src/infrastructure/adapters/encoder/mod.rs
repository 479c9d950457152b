//! Encoder Adapter - 音频容器编解码

mod wav_encoder;

pub use wav_encoder::{decode_wav, encode_wav, WavEncoder};
