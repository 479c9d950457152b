//! 数字规范化
//!
//! 把文本中的数字改写为目标语言的读法。先匹配小数（`2.5` 整体读作一个数），
//! 再处理剩余的整数。具体读法由 [`NumberSpeller`] 提供。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::Arc;

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\.([0-9]+)").expect("decimal pattern is valid"));

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("integer pattern is valid"));

/// 数字读法服务
///
/// 输入均为 ASCII 数字串，实现必须对任意长度的数字串给出结果。
pub trait NumberSpeller: Send + Sync {
    /// 语言代码（如 `vi`、`en`）
    fn locale(&self) -> &str;

    /// 整数读法
    fn spell_integer(&self, digits: &str) -> String;

    /// 小数读法，`integer` 与 `fraction` 分别为小数点两侧的数字串
    fn spell_decimal(&self, integer: &str, fraction: &str) -> String;
}

/// 按语言查找读法服务
///
/// 找不到时依次尝试主语言子标签（`vi-VN` → `vi`）和默认读法。
#[derive(Clone)]
pub struct SpellerRegistry {
    spellers: HashMap<String, Arc<dyn NumberSpeller>>,
    fallback: Arc<dyn NumberSpeller>,
}

impl SpellerRegistry {
    pub fn new(fallback: Arc<dyn NumberSpeller>) -> Self {
        let mut spellers = HashMap::new();
        spellers.insert(fallback.locale().to_lowercase(), fallback.clone());
        Self { spellers, fallback }
    }

    /// 注册读法服务，同一语言后注册的覆盖先注册的
    pub fn with_speller(mut self, speller: Arc<dyn NumberSpeller>) -> Self {
        self.spellers.insert(speller.locale().to_lowercase(), speller);
        self
    }

    pub fn get(&self, locale: &str) -> Arc<dyn NumberSpeller> {
        let locale = locale.trim().to_lowercase();
        if let Some(speller) = self.spellers.get(&locale) {
            return speller.clone();
        }

        let primary = locale.split(&['-', '_'][..]).next().unwrap_or_default();
        self.spellers
            .get(primary)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn fallback_locale(&self) -> &str {
        self.fallback.locale()
    }

    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.spellers.keys().cloned().collect();
        locales.sort();
        locales
    }
}

/// 将文本中的数字替换为读法，其余文本保持不变
pub fn normalize_numbers(text: &str, speller: &dyn NumberSpeller) -> String {
    let text = DECIMAL_RE.replace_all(text, |caps: &Captures| {
        speller.spell_decimal(&caps[1], &caps[2])
    });

    INTEGER_RE
        .replace_all(&text, |caps: &Captures| speller.spell_integer(&caps[0]))
        .into_owned()
}
