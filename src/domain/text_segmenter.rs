//! 文本分割器
//!
//! 将段落切分为适合单次合成的片段：
//! 1. 按强分隔符（句末标点、省略号）切分为句子
//! 2. 超过 `max_chars` 的句子按弱分隔符（逗号、分号、冒号、破折号）贪心重组

use once_cell::sync::Lazy;
use regex::Regex;

/// 默认最大字符数
pub const DEFAULT_MAX_CHARS: usize = 250;

/// 省略号占位符（私有区字符，不会出现在正常文本中）
const ELLIPSIS_MARK: char = '\u{E000}';

/// 强分隔：省略号或 `.!?`，后可跟闭合引号/括号，必须跟空白
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?:{}|[.!?])["'\u{{201D}}\u{{2019}})\]]*\s+"#,
        regex::escape(&ELLIPSIS_MARK.to_string())
    ))
    .expect("boundary pattern is valid")
});

/// 越南语连词
const VI_CONJUNCTIONS: &[&str] = &[
    "và", "nhưng", "hoặc", "rồi", "thì", "là", "nên", "vì", "bởi", "tuy", "dù",
];

/// 英语连词
const EN_CONJUNCTIONS: &[&str] = &["and", "but", "or", "so", "because", "then", "yet"];

/// 文本分割配置
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// 单个片段的最大字符数
    pub max_chars: usize,
    /// 语言代码，决定连词表
    pub language: String,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            language: "vi".to_string(),
        }
    }
}

impl SegmentConfig {
    pub fn new(max_chars: usize, language: impl Into<String>) -> Self {
        Self {
            max_chars,
            language: language.into(),
        }
    }
}

/// 检查是否为弱分隔符
#[inline]
fn is_soft_delimiter(ch: char) -> bool {
    matches!(ch, ',' | ';' | ':' | '-' | '\u{2013}' | '\u{2014}')
}

/// 语言对应的连词表，按主语言子标签匹配（`vi-VN` → `vi`）
fn conjunctions(language: &str) -> &'static [&'static str] {
    let language = language.trim().to_lowercase();
    let primary = language.split(&['-', '_'][..]).next().unwrap_or_default();
    match primary {
        "vi" => VI_CONJUNCTIONS,
        "en" => EN_CONJUNCTIONS,
        _ => &[],
    }
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 片段末尾出现时读起来不自然的 token：单独的弱分隔符或连词
fn is_dangling(token: &str, conjunctions: &[&str]) -> bool {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if is_soft_delimiter(ch) {
            return true;
        }
    }

    let word = token
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '.') || is_soft_delimiter(c))
        .to_lowercase();
    conjunctions.contains(&word.as_str())
}

/// 按强分隔符切分句子（保留标点，去除首尾空白）
fn split_sentences(paragraph: &str) -> Vec<String> {
    let text = paragraph
        .trim()
        .replace('\u{2026}', "...")
        .replace("...", &ELLIPSIS_MARK.to_string());

    let restore = |s: &str| s.replace(ELLIPSIS_MARK, "...");

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in BOUNDARY_RE.find_iter(&text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(restore(sentence));
        }
        start = m.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(restore(tail));
    }

    sentences
}

/// 按弱分隔符切分，分隔符附着在前一个 token 上
fn split_soft_tokens(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in sentence.chars() {
        current.push(ch);
        if is_soft_delimiter(ch) {
            let token = current.trim();
            if !token.is_empty() {
                tokens.push(token.to_string());
            }
            current.clear();
        }
    }

    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }

    tokens
}

/// 贪心打包 token，单个片段不超过 `max_chars`
///
/// 无法再放入下一个 token 时，如果缓冲区最后一个 token 是连词或孤立的分隔符，
/// 把它移到下一个片段开头。单个 token 本身超长时原样输出，不截断。
fn pack_tokens(tokens: Vec<String>, max_chars: usize, conjunctions: &[&str]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut current_len = 0;

    let flush = |buffer: &mut Vec<String>, chunks: &mut Vec<String>| {
        let chunk = buffer.join(" ");
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        buffer.clear();
    };

    for token in tokens {
        let token_len = char_len(&token);
        let separator = usize::from(current_len > 0);

        if current_len + separator + token_len <= max_chars {
            buffer.push(token);
            current_len += separator + token_len;
            continue;
        }

        // 把末尾的连词/分隔符延后到下一个片段（前提是它和当前 token 放得下）
        let mut carried: Option<String> = None;
        if buffer.len() > 1 {
            if let Some(last) = buffer.last() {
                if is_dangling(last, conjunctions) && char_len(last) + 1 + token_len <= max_chars
                {
                    carried = buffer.pop();
                }
            }
        }

        flush(&mut buffer, &mut chunks);

        current_len = token_len;
        if let Some(carried) = carried {
            current_len += char_len(&carried) + 1;
            buffer.push(carried);
        }
        buffer.push(token);
    }

    flush(&mut buffer, &mut chunks);
    chunks
}

/// 对段落进行分段
///
/// 返回的片段保持原文顺序，去除首尾空白，不含空片段。
pub fn segment_text(paragraph: &str, config: &SegmentConfig) -> Vec<String> {
    let conjunctions = conjunctions(&config.language);
    let mut chunks = Vec::new();

    for sentence in split_sentences(paragraph) {
        if char_len(&sentence) <= config.max_chars {
            chunks.push(sentence);
            continue;
        }

        let tokens = split_soft_tokens(&sentence);
        chunks.extend(pack_tokens(tokens, config.max_chars, conjunctions));
    }

    chunks
}

/// 使用默认配置分段（便捷方法）
pub fn segment_text_default(paragraph: &str) -> Vec<String> {
    segment_text(paragraph, &SegmentConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize_whitespace(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_vietnamese_two_sentences() {
        let segments = segment_text_default("Tôi có 2 con mèo. Chúng rất dễ thương!");
        assert_eq!(segments, vec!["Tôi có 2 con mèo.", "Chúng rất dễ thương!"]);
    }

    #[test]
    fn test_empty_and_whitespace_paragraph() {
        assert!(segment_text_default("").is_empty());
        assert!(segment_text_default("   \n\t ").is_empty());
    }

    #[test]
    fn test_terminal_punctuation_needs_whitespace() {
        // 小数点和缩写后无空白，不切分
        let segments = segment_text_default("Giá là 2.5 triệu.Không đổi");
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_closing_quotes_stay_with_sentence() {
        let segments = segment_text_default("Anh ấy nói: \"Đi thôi!\" Rồi đi. (Thật vậy.) Hết");
        assert_eq!(
            segments,
            vec!["Anh ấy nói: \"Đi thôi!\"", "Rồi đi.", "(Thật vậy.)", "Hết"]
        );
    }

    #[test]
    fn test_curly_quotes_stay_with_sentence() {
        let segments = segment_text_default("Cô ấy hỏi “Ai đó?” Không ai trả lời.");
        assert_eq!(segments, vec!["Cô ấy hỏi “Ai đó?”", "Không ai trả lời."]);
    }

    #[test]
    fn test_ellipsis_variants_are_boundaries() {
        let segments = segment_text_default("Chờ đã… Tôi nghĩ... Được rồi");
        assert_eq!(segments, vec!["Chờ đã...", "Tôi nghĩ...", "Được rồi"]);
    }

    #[test]
    fn test_ellipsis_without_whitespace_is_not_split() {
        let segments = segment_text_default("Ờ...ừ. Xong");
        assert_eq!(segments, vec!["Ờ...ừ.", "Xong"]);
    }

    #[test]
    fn test_short_sentence_unchanged() {
        let config = SegmentConfig::new(20, "vi");
        let segments = segment_text("Ngắn, gọn; rõ: ràng.", &config);
        assert_eq!(segments, vec!["Ngắn, gọn; rõ: ràng."]);
    }

    #[test]
    fn test_long_sentence_split_on_commas() {
        // 10 个约 40 字符的子句，总长约 400
        let clause = "mot hai ba bon nam sau bay tam chin muoi";
        let sentence = vec![clause; 10].join(", ") + ".";
        assert!(sentence.chars().count() > 400);

        let segments = segment_text(&sentence, &SegmentConfig::new(250, "vi"));
        assert!(segments.len() >= 2);
        for seg in &segments {
            assert!(seg.chars().count() <= 250);
            assert!(seg.ends_with(',') || seg.ends_with('.'));
            // 不会切断单词
            for word in seg.split_whitespace() {
                let word = word.trim_end_matches(|c| c == ',' || c == '.');
                assert!(clause.split(' ').any(|w| w == word), "split inside word: {word}");
            }
        }
        assert_eq!(segments.join(" "), sentence);
    }

    #[test]
    fn test_oversized_token_is_kept_whole() {
        let long_word = "a".repeat(60);
        let sentence = format!("đầu, {} cuối", long_word);
        let segments = segment_text(&sentence, &SegmentConfig::new(30, "vi"));

        assert_eq!(segments, vec!["đầu,".to_string(), format!("{} cuối", long_word)]);
        // 超长片段内部没有弱分隔符
        assert!(!segments[1].chars().any(is_soft_delimiter));
    }

    #[test]
    fn test_conjunction_deferred_to_next_chunk() {
        // 唯一可行的切分点正好落在连词 "và," 之后
        let sentence = "Hôm nay trời đẹp quá, và, chúng tôi đi dạo rất lâu";
        let segments = segment_text(sentence, &SegmentConfig::new(30, "vi"));

        assert_eq!(
            segments,
            vec![
                "Hôm nay trời đẹp quá,",
                "và, chúng tôi đi dạo rất lâu",
            ]
        );
    }

    #[test]
    fn test_conjunction_list_follows_primary_subtag() {
        let sentence = "Hôm nay trời đẹp quá, và, chúng tôi đi dạo rất lâu";
        for language in ["vi-VN", "VI", "vi_VN"] {
            let segments = segment_text(sentence, &SegmentConfig::new(30, language));
            assert_eq!(segments[0], "Hôm nay trời đẹp quá,", "language {language}");
        }
    }

    #[test]
    fn test_conjunction_kept_for_other_language() {
        let sentence = "Hôm nay trời đẹp quá, và, chúng tôi đi dạo rất lâu";
        let segments = segment_text(sentence, &SegmentConfig::new(30, "fr"));
        assert_eq!(segments[0], "Hôm nay trời đẹp quá, và,");
    }

    #[test]
    fn test_bare_delimiter_deferred() {
        let sentence = "mười hai chữ cái ở đây,, rồi thêm phần sau nữa";
        let segments = segment_text(sentence, &SegmentConfig::new(25, "en"));
        assert_eq!(segments, vec!["mười hai chữ cái ở đây,", ", rồi thêm phần sau nữa"]);
    }

    #[test]
    fn test_reconstructs_reading_order() {
        let paragraph = "  Một câu ngắn.   Câu thứ hai, dài hơn một chút, có dấu phẩy!\n\
                         Câu ba… Và câu bốn?  ";
        let segments = segment_text(paragraph, &SegmentConfig::new(20, "vi"));
        let expected = normalize_whitespace(paragraph).replace('…', "...");
        assert_eq!(segments.join(" "), expected);
    }

    #[test]
    fn test_no_empty_chunks() {
        let paragraph = ". . ! ? ,,, -- ...   … a.";
        for max_chars in [1, 3, 10, 250] {
            let segments = segment_text(paragraph, &SegmentConfig::new(max_chars, "vi"));
            assert!(segments.iter().all(|s| !s.trim().is_empty()));
        }
    }

    #[test]
    fn test_length_bound_or_indivisible() {
        let paragraph = "Đây là một đoạn văn khá dài, với nhiều mệnh đề khác nhau; mỗi mệnh đề \
                         có độ dài không đều: có cái rất ngắn, có cái dài hơn hẳn – và một số \
                         cái thì nằm ở giữa — để kiểm tra giới hạn độ dài của từng đoạn.";
        let max_chars = 40;
        let segments = segment_text(paragraph, &SegmentConfig::new(max_chars, "vi"));
        for seg in &segments {
            let len = seg.chars().count();
            let inner: String = seg.chars().take(len.saturating_sub(1)).collect();
            assert!(
                len <= max_chars || !inner.chars().any(is_soft_delimiter),
                "chunk too long and divisible: {seg}"
            );
        }
    }

    #[test]
    fn test_soft_tokens_keep_delimiter_on_left() {
        let tokens = split_soft_tokens("a, b; c: d - e – f — g");
        assert_eq!(tokens, vec!["a,", "b;", "c:", "d -", "e –", "f —", "g"]);
    }

    #[test]
    fn test_is_dangling() {
        assert!(is_dangling(",", VI_CONJUNCTIONS));
        assert!(is_dangling("—", VI_CONJUNCTIONS));
        assert!(is_dangling("Và,", VI_CONJUNCTIONS));
        assert!(is_dangling("nhưng", VI_CONJUNCTIONS));
        assert!(!is_dangling("con mèo,", VI_CONJUNCTIONS));
        assert!(!is_dangling("và,", EN_CONJUNCTIONS));
    }
}
