//! Value Objects for the storefront

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Display locale. Anything other than Vietnamese resolves to English.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Vi,
}

impl Locale {
    /// Lenient parse: `"vi"`, `"vi-VN"`, `"VI"` map to Vietnamese, everything else to English.
    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        let primary = code.split(['-', '_']).next().unwrap_or(code);
        if primary.eq_ignore_ascii_case("vi") { Self::Vi } else { Self::En }
    }
    pub fn code(&self) -> &'static str { match self { Self::En => "en", Self::Vi => "vi" } }
    pub fn is_vietnamese(&self) -> bool { matches!(self, Self::Vi) }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self { Self::parse(code) }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> { serializer.serialize_str(self.code()) }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::parse(&code))
    }
}

/// Text carried in both storefront languages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub vi: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, vi: impl Into<String>) -> Self { Self { en: en.into(), vi: vi.into() } }

    /// Picks the text for `locale`. Missing Vietnamese copy falls back to English.
    pub fn resolve(&self, locale: Locale) -> &str {
        match locale {
            Locale::Vi if !self.vi.trim().is_empty() => &self.vi,
            _ => &self.en,
        }
    }
}

/// Quantity of a line item; never below one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 { return Err(QuantityError::Zero); }
        Ok(Self(value))
    }
    pub fn one() -> Self { Self(1) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: Quantity) -> Self { Self(self.0.saturating_add(other.0)) }
}

impl Default for Quantity { fn default() -> Self { Self::one() } }

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self { q.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum QuantityError { Zero }
impl std::error::Error for QuantityError {}
impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Quantity must be at least 1") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("vi"), Locale::Vi);
        assert_eq!(Locale::parse("vi-VN"), Locale::Vi);
        assert_eq!(Locale::parse("VI"), Locale::Vi);
        assert_eq!(Locale::parse("en"), Locale::En);
        assert_eq!(Locale::parse("fr"), Locale::En);
        assert_eq!(Locale::parse(""), Locale::En);
    }

    #[test]
    fn test_locale_serde() {
        let l: Locale = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(l, Locale::En);
        assert_eq!(serde_json::to_string(&Locale::Vi).unwrap(), "\"vi\"");
    }

    #[test]
    fn test_localized_text_fallback() {
        let t = LocalizedText::new("Standard", "Tiêu chuẩn");
        assert_eq!(t.resolve(Locale::Vi), "Tiêu chuẩn");
        assert_eq!(t.resolve(Locale::En), "Standard");
        let missing = LocalizedText::new("Express", "  ");
        assert_eq!(missing.resolve(Locale::Vi), "Express");
    }

    #[test]
    fn test_quantity() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        let q = Quantity::new(2).unwrap();
        assert_eq!(q.add(Quantity::one()).value(), 3);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }
}
