//! # Money
//!
//! Prices, line totals, subtotals and shipping fees, held as whole cents.
//!
//! The free-shipping rule compares a summed subtotal against a threshold,
//! and that comparison has to be exact: `$49.99 + $0.02` must land strictly
//! above `$50.00` every time. Integer cents guarantee it; floats do not.
//!
//! Arithmetic saturates at the `i64` bounds instead of overflowing, so a
//! huge quantity times a huge price pins the total rather than panicking.
//!
//! ```rust
//! use debuti_core::money::Money;
//!
//! let trench = Money::from_cents(12999);
//! let scarf = Money::from_cents(4550);
//! assert_eq!((trench.times(2) + scarf).to_string(), "$305.48");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// An amount in US cents. Serialized as the bare integer.
///
/// Signed, so "amount still needed for free shipping" and config typos
/// (a negative fee) are representable and can be rejected by validation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn zero() -> Self {
        Self::ZERO
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Unit price times a line quantity.
    pub const fn times(self, quantity: u32) -> Self {
        Money(self.0.saturating_mul(quantity as i64))
    }

    /// `self - other`, never below zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

/// `$12.34` / `-$0.50`. Log and test output only; the UI does its own
/// currency formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "${}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
