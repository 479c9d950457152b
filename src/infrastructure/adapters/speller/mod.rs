//! Speller Adapter - 各语言的数字读法

mod english;
mod vietnamese;

use std::sync::Arc;

use crate::domain::SpellerRegistry;

pub use english::EnglishSpeller;
pub use vietnamese::VietnameseSpeller;

/// 内置读法注册表，`fallback` 未注册时使用越南语
pub fn default_speller_registry(fallback: &str) -> SpellerRegistry {
    let vietnamese = Arc::new(VietnameseSpeller::new());
    let english = Arc::new(EnglishSpeller::new());

    let registry = match fallback.trim().to_lowercase().as_str() {
        "en" => SpellerRegistry::new(english).with_speller(vietnamese),
        _ => SpellerRegistry::new(vietnamese).with_speller(english),
    };

    tracing::debug!(
        locales = ?registry.locales(),
        fallback = registry.fallback_locale(),
        "Number spellers registered"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = default_speller_registry("vi");
        assert_eq!(registry.locales(), vec!["en", "vi"]);
        assert_eq!(registry.get("en-US").spell_integer("2"), "two");
        assert_eq!(registry.get("ja").spell_integer("2"), "hai");

        let registry = default_speller_registry("en");
        assert_eq!(registry.get("ja").spell_integer("2"), "two");
        assert_eq!(default_speller_registry("xx").fallback_locale(), "vi");
    }
}
