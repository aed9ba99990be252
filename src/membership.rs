//! Membership

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors raised while constructing a membership policy.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// The discount rate is below zero.
    #[error("membership rate must not be negative")]
    NegativeRate,
}

/// Membership discount policy: a percentage of the amount paid outside any
/// promotion, up to a fixed cap in won.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Membership {
    rate: Percentage,
    cap: u64,
}

impl Membership {
    /// Create a membership policy with the given rate and cap.
    ///
    /// # Errors
    ///
    /// Returns a [`MembershipError`] if the rate is negative.
    pub fn new(rate: Percentage, cap: u64) -> Result<Self, MembershipError> {
        if rate * Decimal::ONE < Decimal::ZERO {
            return Err(MembershipError::NegativeRate);
        }

        Ok(Membership { rate, cap })
    }

    /// The standard in-store policy: 30% off the non-promotional amount,
    /// capped at 8,000 won.
    pub fn standard() -> Self {
        Membership {
            rate: Percentage::from(Decimal::new(3, 1)),
            cap: 8_000,
        }
    }

    /// Maximum discount in won.
    pub fn cap(&self) -> u64 {
        self.cap
    }

    /// Discount in won for the given non-promotional amount. The share is
    /// truncated toward zero, never rounded up, and capped.
    pub fn discount_for(&self, amount: u64) -> u64 {
        truncated_share(self.rate, amount).min(self.cap)
    }
}

/// Share of an amount at the given rate, truncated toward zero.
fn truncated_share(rate: Percentage, amount: u64) -> u64 {
    let Some(amount) = Decimal::from_u64(amount) else {
        unreachable!("always returns `Some` for every `u64`")
    };

    let truncated = (rate * amount).round_dp_with_strategy(0, RoundingStrategy::ToZero);
    let Some(truncated) = truncated.to_u64() else {
        unreachable!("a non-negative truncated share of a `u64` amount fits in a `u64`")
    };

    truncated
}
