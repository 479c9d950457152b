//! 推理参数计算
//!
//! 根据片段的统计特征（长度、标点密度、词汇多样性）为合成引擎选择参数。
//! 短句容易被拉长或过度生成，长句/高多样性/标点密集的句子容易重复或提前结束，
//! 下面的阈值是针对这些问题实测调出来的，不要随意改动。

use serde::Serialize;

/// 短句阈值（词数）
pub const SHORT_TEXT_WORDS: usize = 15;

/// 参与标点密度统计的字符
const PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':', '\u{2014}', '-'];

/// 合成参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SynthesisParameters {
    pub speed: f32,
    pub length_penalty: f32,
    pub temperature: f32,
    pub repetition_penalty: f32,
    /// 分句由本服务完成，不交给引擎
    pub enable_text_splitting: bool,
}

/// 片段的统计特征
#[derive(Debug, Clone, PartialEq)]
pub struct TextFeatures {
    pub text_len: usize,
    pub punctuation_count: usize,
    pub punctuation_density: f64,
    pub word_count: usize,
    pub unique_words: usize,
    pub word_diversity: f64,
}

impl TextFeatures {
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        let text_len = text.chars().count();
        let punctuation_count = text.chars().filter(|c| PUNCTUATION.contains(c)).count();

        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let word_count = words.len();
        let mut distinct = words.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let unique_words = distinct.len();

        Self {
            text_len,
            punctuation_count,
            punctuation_density: punctuation_count as f64 / text_len.max(1) as f64,
            word_count,
            unique_words,
            word_diversity: unique_words as f64 / word_count.max(1) as f64,
        }
    }
}

/// 计算合成参数（纯函数）
pub fn calculate_inference_params(text: &str) -> SynthesisParameters {
    let features = TextFeatures::from_text(text);

    if features.word_count < SHORT_TEXT_WORDS {
        return SynthesisParameters {
            speed: 1.04,
            length_penalty: 0.75,
            temperature: 0.8,
            repetition_penalty: 1.5,
            enable_text_splitting: false,
        };
    }

    let speed = if features.punctuation_density > 0.05 {
        0.98
    } else if features.text_len > 200 {
        0.95
    } else {
        1.0
    };

    let length_penalty = if features.text_len < 80 {
        1.0
    } else if features.text_len > 200 {
        1.1
    } else {
        1.05
    };

    let temperature = if features.word_diversity > 0.7 {
        0.75
    } else if features.word_diversity < 0.5 {
        0.7
    } else {
        0.72
    };

    let repetition_penalty = if features.word_count > 50 && features.word_diversity < 0.6 {
        4.0
    } else if features.word_count > 30 {
        3.0
    } else {
        2.0
    };

    SynthesisParameters {
        speed,
        length_penalty,
        temperature,
        repetition_penalty,
        enable_text_splitting: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_features() {
        let f = TextFeatures::from_text("  Một, hai. MỘT hai!  ");
        assert_eq!(f.text_len, 18);
        assert_eq!(f.punctuation_count, 3);
        assert_eq!(f.word_count, 4);
        // "một," "hai." "một" "hai!"
        assert_eq!(f.unique_words, 4);
        assert!((f.word_diversity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_text_features() {
        let f = TextFeatures::from_text("");
        assert_eq!(f.text_len, 0);
        assert_eq!(f.punctuation_density, 0.0);
        assert_eq!(f.word_diversity, 0.0);
    }

    #[test]
    fn test_short_text_branch() {
        let params = calculate_inference_params("Tôi có hai con mèo.");
        assert_eq!(
            params,
            SynthesisParameters {
                speed: 1.04,
                length_penalty: 0.75,
                temperature: 0.8,
                repetition_penalty: 1.5,
                enable_text_splitting: false,
            }
        );
    }

    #[test]
    fn test_fourteen_vs_fifteen_words() {
        let short = calculate_inference_params(&words(14));
        let long = calculate_inference_params(&words(15));
        assert_eq!(short.length_penalty, 0.75);
        assert_ne!(short, long);
        // 15 个不同的词：长度 < 80，多样性 1.0
        assert_eq!(
            long,
            SynthesisParameters {
                speed: 1.0,
                length_penalty: 1.0,
                temperature: 0.75,
                repetition_penalty: 2.0,
                enable_text_splitting: false,
            }
        );
    }

    #[test]
    fn test_punctuation_dense_text_slows_down() {
        let text = (0..16).map(|i| format!("w{},", i)).collect::<Vec<_>>().join(" ");
        let params = calculate_inference_params(&text);
        assert_eq!(params.speed, 0.98);
    }

    #[test]
    fn test_long_text() {
        // 60 个词，只有 20 个不同：长度 > 200，多样性 < 0.5
        let text = (0..60)
            .map(|i| format!("word{}", i % 20))
            .collect::<Vec<_>>()
            .join(" ");
        let params = calculate_inference_params(&text);
        assert_eq!(params.speed, 0.95);
        assert_eq!(params.length_penalty, 1.1);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.repetition_penalty, 4.0);
        assert!(!params.enable_text_splitting);
    }

    #[test]
    fn test_medium_text_mid_diversity() {
        // 32 个词，20 个不同：多样性 0.625
        let text = (0..32)
            .map(|i| format!("ab{}", i % 20))
            .collect::<Vec<_>>()
            .join(" ");
        let params = calculate_inference_params(&text);
        assert_eq!(params.length_penalty, 1.05);
        assert_eq!(params.temperature, 0.72);
        assert_eq!(params.repetition_penalty, 3.0);
    }

    #[test]
    fn test_deterministic() {
        let text = "Chúng tôi đã đi rất xa, qua nhiều thành phố, và gặp rất nhiều người thú vị trên đường.";
        assert_eq!(calculate_inference_params(text), calculate_inference_params(text));
    }
}
