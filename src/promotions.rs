//! Promotions

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Errors raised while constructing a promotion.
#[derive(Debug, Error)]
pub enum PromotionError {
    /// Name is blank or the reserved word `null`.
    #[error("promotion name must not be blank or the reserved word \"null\"")]
    InvalidName,

    /// A bundle quantity is zero.
    #[error("promotion bundle quantities must be greater than zero")]
    InvalidBundle,

    /// More units are given away than have to be bought.
    #[error("promotion get quantity {get} exceeds buy quantity {buy}")]
    GetExceedsBuy {
        /// Units that must be bought
        buy: u32,
        /// Units given for free
        get: u32,
    },

    /// The window ends before it starts.
    #[error("promotion starts on {start} but ends on {end}")]
    ReversedDates {
        /// First day of the window
        start: NaiveDate,
        /// Last day of the window
        end: NaiveDate,
    },
}

/// A buy-N-get-M offer valid within an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    name: String,
    buy: u32,
    get: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Promotion {
    /// Create a new promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the name is blank or reserved, either
    /// bundle quantity is zero, `get` exceeds `buy`, or the window is
    /// reversed.
    pub fn new(
        name: impl Into<String>,
        buy: u32,
        get: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, PromotionError> {
        let name = name.into();

        if name.trim().is_empty() || name == "null" {
            return Err(PromotionError::InvalidName);
        }

        if buy == 0 || get == 0 {
            return Err(PromotionError::InvalidBundle);
        }

        if get > buy {
            return Err(PromotionError::GetExceedsBuy { buy, get });
        }

        if start_date > end_date {
            return Err(PromotionError::ReversedDates {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Promotion {
            name,
            buy,
            get,
            start_date,
            end_date,
        })
    }

    /// Promotion name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units that must be bought to qualify.
    pub fn buy(&self) -> u32 {
        self.buy
    }

    /// Units given for free per qualifying bundle.
    pub fn get(&self) -> u32 {
        self.get
    }

    /// First day of the window.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the window.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Whether the promotion runs on the given day. Both window ends are
    /// inclusive.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

/// Registry of promotions, addressed by key and resolvable by name.
///
/// The first definition of a name wins; later definitions with the same name
/// are ignored.
#[derive(Debug, Default)]
pub struct PromotionBook {
    promotions: SlotMap<PromotionKey, Promotion>,
    by_name: FxHashMap<String, PromotionKey>,
}

impl PromotionBook {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a promotion and return its key.
    ///
    /// If a promotion with the same name is already registered, the existing
    /// key is returned and the new definition is discarded.
    pub fn insert(&mut self, promotion: Promotion) -> PromotionKey {
        if let Some(&key) = self.by_name.get(promotion.name()) {
            return key;
        }

        let name = promotion.name().to_owned();
        let key = self.promotions.insert(promotion);
        self.by_name.insert(name, key);

        key
    }

    /// Look up a promotion key by name.
    pub fn find(&self, name: &str) -> Option<PromotionKey> {
        self.by_name.get(name).copied()
    }

    /// Fetch a promotion by key.
    pub fn get(&self, key: PromotionKey) -> Option<&Promotion> {
        self.promotions.get(key)
    }

    /// Number of registered promotions.
    pub fn len(&self) -> usize {
        self.promotions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn soda_two_plus_one() -> TestResult<Promotion> {
        Ok(Promotion::new(
            "Soda 2+1",
            2,
            1,
            "2026-01-01".parse()?,
            "2026-12-31".parse()?,
        )?)
    }

    #[test]
    fn new_promotion_keeps_fields() -> TestResult {
        let promotion = soda_two_plus_one()?;

        assert_eq!(promotion.name(), "Soda 2+1");
        assert_eq!(promotion.buy(), 2);
        assert_eq!(promotion.get(), 1);
        assert_eq!(promotion.start_date(), "2026-01-01".parse::<NaiveDate>()?);
        assert_eq!(promotion.end_date(), "2026-12-31".parse::<NaiveDate>()?);

        Ok(())
    }

    #[test]
    fn blank_or_reserved_names_are_rejected() -> TestResult {
        let start = "2026-01-01".parse::<NaiveDate>()?;
        let end = "2026-12-31".parse::<NaiveDate>()?;

        assert!(matches!(
            Promotion::new("", 1, 1, start, end),
            Err(PromotionError::InvalidName)
        ));
        assert!(matches!(
            Promotion::new("   ", 1, 1, start, end),
            Err(PromotionError::InvalidName)
        ));
        assert!(matches!(
            Promotion::new("null", 1, 1, start, end),
            Err(PromotionError::InvalidName)
        ));

        Ok(())
    }

    #[test]
    fn zero_bundle_quantities_are_rejected() -> TestResult {
        let start = "2026-01-01".parse::<NaiveDate>()?;
        let end = "2026-12-31".parse::<NaiveDate>()?;

        assert!(matches!(
            Promotion::new("Soda 2+1", 0, 1, start, end),
            Err(PromotionError::InvalidBundle)
        ));
        assert!(matches!(
            Promotion::new("Soda 2+1", 2, 0, start, end),
            Err(PromotionError::InvalidBundle)
        ));

        Ok(())
    }

    #[test]
    fn get_must_not_exceed_buy() -> TestResult {
        let start = "2026-01-01".parse::<NaiveDate>()?;
        let end = "2026-12-31".parse::<NaiveDate>()?;

        let result = Promotion::new("Generous", 1, 2, start, end);

        assert!(matches!(
            result,
            Err(PromotionError::GetExceedsBuy { buy: 1, get: 2 })
        ));

        Ok(())
    }

    #[test]
    fn reversed_window_is_rejected() -> TestResult {
        let start = "2026-12-31".parse::<NaiveDate>()?;
        let end = "2026-01-01".parse::<NaiveDate>()?;

        let result = Promotion::new("Backwards", 1, 1, start, end);

        assert!(matches!(result, Err(PromotionError::ReversedDates { .. })));

        Ok(())
    }

    #[test]
    fn is_active_includes_both_window_ends() -> TestResult {
        let promotion = soda_two_plus_one()?;

        assert!(promotion.is_active("2026-01-01".parse()?));
        assert!(promotion.is_active("2026-08-25".parse()?));
        assert!(promotion.is_active("2026-12-31".parse()?));
        assert!(!promotion.is_active("2025-12-31".parse()?));
        assert!(!promotion.is_active("2027-01-01".parse()?));

        Ok(())
    }

    #[test]
    fn book_resolves_names_to_registered_promotions() -> TestResult {
        let mut book = PromotionBook::new();
        let key = book.insert(soda_two_plus_one()?);

        assert_eq!(book.find("Soda 2+1"), Some(key));
        assert_eq!(book.get(key), Some(&soda_two_plus_one()?));
        assert_eq!(book.find("Flash Sale"), None);
        assert_eq!(book.len(), 1);

        Ok(())
    }

    #[test]
    fn book_keeps_the_first_definition_of_a_name() -> TestResult {
        let start = "2026-01-01".parse::<NaiveDate>()?;
        let end = "2026-12-31".parse::<NaiveDate>()?;

        let mut book = PromotionBook::new();
        let first = book.insert(Promotion::new("Soda 2+1", 2, 1, start, end)?);
        let second = book.insert(Promotion::new("Soda 2+1", 1, 1, start, end)?);

        assert_eq!(first, second);
        assert_eq!(book.len(), 1);

        let kept = book.get(first);
        match kept {
            Some(promotion) => assert_eq!(promotion.buy(), 2),
            None => panic!("expected the first definition to be kept"),
        }

        Ok(())
    }

    #[test]
    fn empty_book_finds_nothing() {
        let book = PromotionBook::new();

        assert!(book.is_empty());
        assert_eq!(book.find("Soda 2+1"), None);
    }
}
