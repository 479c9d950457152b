//! English number reading

use crate::domain::NumberSpeller;

const ONES: &[&str] = &[
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];
const TENS: &[&str] = &[
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const SCALE: &[&str] = &[
    "", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion",
];
const DIGITS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// 英语数字读法
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSpeller;

impl EnglishSpeller {
    pub fn new() -> Self {
        Self
    }

    fn three_digits(n: u64) -> String {
        let mut parts = Vec::new();
        let hundreds = n / 100;
        let remainder = n % 100;
        if hundreds > 0 {
            parts.push(format!("{} hundred", ONES[hundreds as usize]));
        }
        if remainder < 20 {
            if remainder > 0 {
                parts.push(ONES[remainder as usize].to_string());
            }
        } else {
            let tens_word = TENS[(remainder / 10) as usize];
            let ones_word = ONES[(remainder % 10) as usize];
            if ones_word.is_empty() {
                parts.push(tens_word.to_string());
            } else {
                parts.push(format!("{}-{}", tens_word, ones_word));
            }
        }
        parts.join(" ")
    }

    fn cardinal(n: u64) -> String {
        if n == 0 {
            return DIGITS[0].to_string();
        }

        let mut parts = Vec::new();
        let mut remaining = n;
        for &scale in SCALE {
            let chunk = remaining % 1000;
            if chunk > 0 {
                let words = Self::three_digits(chunk);
                if scale.is_empty() {
                    parts.push(words);
                } else {
                    parts.push(format!("{} {}", words, scale));
                }
            }
            remaining /= 1000;
            if remaining == 0 {
                break;
            }
        }
        parts.reverse();
        parts.join(" ")
    }

    fn digit_by_digit(digits: &str) -> String {
        digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| DIGITS[d as usize])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl NumberSpeller for EnglishSpeller {
    fn locale(&self) -> &str {
        "en"
    }

    fn spell_integer(&self, digits: &str) -> String {
        match digits.parse::<u64>() {
            Ok(n) => Self::cardinal(n),
            Err(_) => Self::digit_by_digit(digits),
        }
    }

    fn spell_decimal(&self, integer: &str, fraction: &str) -> String {
        format!(
            "{} point {}",
            self.spell_integer(integer),
            Self::digit_by_digit(fraction)
        )
    }
}
