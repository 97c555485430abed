//! Storefront locales and localized category labels.

use serde::{Deserialize, Serialize};

/// Display language. Uzbek is the storefront default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uz,
    Ru,
}

impl Locale {
    /// Language code as used in query strings and request bodies.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Uz => "uz",
            Self::Ru => "ru",
        }
    }
}

/// Categories the storefront knows labels for: `(key, uz, ru)`.
const CATEGORY_LABELS: &[(&str, &str, &str)] = &[
    ("Hotdog", "Hotdog", "Хотдог"),
    ("Burger", "Burger", "Бургер"),
    ("Side", "Qo'shimchalar", "Дополнения"),
    ("Drink", "Ichimliklar", "Напитки"),
    ("Sandwich", "Sendvichlar", "Сэндвичи"),
    ("Combo", "Kombo", "Комбо"),
    ("Chicken", "Tovuq", "Курица"),
];

/// Localized label for a category key.
///
/// Categories are free text in the catalog; unknown keys are shown as-is.
#[must_use]
pub fn category_label(category: &str, locale: Locale) -> &str {
    CATEGORY_LABELS
        .iter()
        .find(|(key, _, _)| *key == category)
        .map_or(category, |&(_, uz, ru)| match locale {
            Locale::Uz => uz,
            Locale::Ru => ru,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_category_labels() {
        assert_eq!(category_label("Drink", Locale::Uz), "Ichimliklar");
        assert_eq!(category_label("Drink", Locale::Ru), "Напитки");
    }

    #[test]
    fn test_unknown_category_falls_back_to_key() {
        assert_eq!(category_label("Desserts", Locale::Ru), "Desserts");
    }

    #[test]
    fn test_locale_serde() {
        assert_eq!(serde_json::to_string(&Locale::Ru).ok().as_deref(), Some("\"ru\""));
        assert_eq!(Locale::default(), Locale::Uz);
    }
}
