//! Domain Layer - 领域层
//!
//! 纯函数算法，无 I/O、无共享状态:
//! - text_segmenter: 分句与按长度重组
//! - number_normalizer: 数字读法替换
//! - inference_params: 合成参数计算
//! - audio: AudioBuffer 与尾部静音裁剪

pub mod audio;
mod inference_params;
mod number_normalizer;
mod text_segmenter;

pub use inference_params::{
    calculate_inference_params, SynthesisParameters, TextFeatures, SHORT_TEXT_WORDS,
};
pub use number_normalizer::{normalize_numbers, NumberSpeller, SpellerRegistry};
pub use text_segmenter::{segment_text, segment_text_default, SegmentConfig, DEFAULT_MAX_CHARS};
