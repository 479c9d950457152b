//! Vietnamese number reading
//!
//! 规则：
//! - 21, 31 … 91 的个位读 `mốt`，15, 25 … 95 的个位读 `lăm`
//! - 百位后的个位数前加 `lẻ`（105 → một trăm lẻ năm）
//! - 单位 nghìn / triệu / tỷ，余数小于 100 时加 `lẻ`
//! - 超过 u64 的数字串逐位读

use crate::domain::NumberSpeller;

const DIGITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

const DENOMINATIONS: [(u64, &str); 3] = [
    (1_000_000_000, "tỷ"),
    (1_000_000, "triệu"),
    (1_000, "nghìn"),
];

/// 越南语数字读法
#[derive(Debug, Clone, Copy, Default)]
pub struct VietnameseSpeller;

impl VietnameseSpeller {
    pub fn new() -> Self {
        Self
    }

    fn below_hundred(n: u64) -> String {
        let tens = (n / 10) as usize;
        let units = (n % 10) as usize;

        match (tens, units) {
            (0, _) => DIGITS[units].to_string(),
            (1, 0) => "mười".to_string(),
            (1, 5) => "mười lăm".to_string(),
            (1, _) => format!("mười {}", DIGITS[units]),
            (_, 0) => format!("{} mươi", DIGITS[tens]),
            (_, 1) => format!("{} mươi mốt", DIGITS[tens]),
            (_, 5) => format!("{} mươi lăm", DIGITS[tens]),
            _ => format!("{} mươi {}", DIGITS[tens], DIGITS[units]),
        }
    }

    fn below_thousand(n: u64) -> String {
        if n < 100 {
            return Self::below_hundred(n);
        }

        let hundreds = format!("{} trăm", DIGITS[(n / 100) as usize]);
        match n % 100 {
            0 => hundreds,
            rest if rest < 10 => format!("{} lẻ {}", hundreds, DIGITS[rest as usize]),
            rest => format!("{} {}", hundreds, Self::below_hundred(rest)),
        }
    }

    fn cardinal(n: u64) -> String {
        if n < 1000 {
            return Self::below_thousand(n);
        }

        for (value, name) in DENOMINATIONS {
            if n < value {
                continue;
            }
            let high = Self::cardinal(n / value);
            return match n % value {
                0 => format!("{} {}", high, name),
                rest if rest < 100 => format!("{} {} lẻ {}", high, name, Self::cardinal(rest)),
                rest => format!("{} {} {}", high, name, Self::cardinal(rest)),
            };
        }

        Self::below_thousand(n)
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

impl NumberSpeller for VietnameseSpeller {
    fn locale(&self) -> &str {
        "vi"
    }

    fn spell_integer(&self, digits: &str) -> String {
        match digits.parse::<u64>() {
            Ok(n) => Self::cardinal(n),
            Err(_) => Self::digit_by_digit(digits),
        }
    }

    fn spell_decimal(&self, integer: &str, fraction: &str) -> String {
        let significant = fraction.trim_start_matches('0');
        let leading_zeros = fraction.len() - significant.len();

        let mut words: Vec<String> = vec![self.spell_integer(integer), "phẩy".to_string()];
        words.extend(std::iter::repeat(DIGITS[0].to_string()).take(leading_zeros));
        if !significant.is_empty() {
            words.push(self.spell_integer(significant));
        }
        words.join(" ")
    }
}
