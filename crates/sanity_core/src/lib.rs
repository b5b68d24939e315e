//! Provide the falsy-for-testing vocabulary used by `expect`.
//!
//! An `expect` call fails for exactly four kinds of value: an absent value, a null value, `false`, and numeric zero.
//! Everything else passes, including empty strings, empty collections and `NaN`. The classification is implemented
//! per type through [`Testable`].
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, no harness types.
//! - JSON values are supported behind the `json` feature so data-driven suites classify values the same way.
//!
//! ## Examples
//! ```rust
//! use sanity_core::{FalsyKind, Testable};
//!
//! assert_eq!(false.falsy_kind(), Some(FalsyKind::False));
//! assert_eq!(0u8.falsy_kind(), Some(FalsyKind::Zero));
//! assert!("".holds());
//! assert!(Vec::<i32>::new().holds());
//! assert!(!None::<&str>.holds());
//! ```

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

#[cfg(feature = "json")]
mod json;

/// The reason a value is classified as falsy-for-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FalsyKind {
    /// No value at all (`None`, `()`).
    Absent,
    /// An explicit null ([`Null`], JSON `null`).
    Null,
    /// The boolean `false`.
    False,
    /// Integer zero, `0.0` or `-0.0`.
    Zero,
}

impl FalsyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FalsyKind::Absent => "absent",
            FalsyKind::Null => "null",
            FalsyKind::False => "false",
            FalsyKind::Zero => "zero",
        }
    }
}

impl fmt::Display for FalsyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A null-equivalent value for hosts that need one distinct from `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Null;

/// Classify a value for `expect`.
///
/// Implementors return `Some(kind)` when the value is falsy-for-testing and `None` otherwise.
pub trait Testable {
    fn falsy_kind(&self) -> Option<FalsyKind>;

    /// Whether an `expect` on this value passes.
    fn holds(&self) -> bool {
        self.falsy_kind().is_none()
    }
}

impl Testable for bool {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        (!*self).then_some(FalsyKind::False)
    }
}

macro_rules! impl_testable_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Testable for $ty {
                fn falsy_kind(&self) -> Option<FalsyKind> {
                    (*self == 0).then_some(FalsyKind::Zero)
                }
            }
        )*
    };
}

impl_testable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// NaN compares unequal to zero, so it passes.
impl Testable for f32 {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        (*self == 0.0).then_some(FalsyKind::Zero)
    }
}

impl Testable for f64 {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        (*self == 0.0).then_some(FalsyKind::Zero)
    }
}

impl Testable for () {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        Some(FalsyKind::Absent)
    }
}

impl Testable for Null {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        Some(FalsyKind::Null)
    }
}

/// `Some(v)` classifies as `v` would.
impl<T: Testable> Testable for Option<T> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        match self {
            None => Some(FalsyKind::Absent),
            Some(value) => value.falsy_kind(),
        }
    }
}

macro_rules! impl_testable_delegate {
    ($($wrapper:ty),* $(,)?) => {
        $(
            impl<T: Testable + ?Sized> Testable for $wrapper {
                fn falsy_kind(&self) -> Option<FalsyKind> {
                    (**self).falsy_kind()
                }
            }
        )*
    };
}

impl_testable_delegate!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

macro_rules! impl_testable_always {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Testable for $ty {
                fn falsy_kind(&self) -> Option<FalsyKind> {
                    None
                }
            }
        )*
    };
}

impl_testable_always!(str, String, char);

// Containers pass regardless of length or contents.
impl<T> Testable for [T] {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<T, const N: usize> Testable for [T; N] {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<T> Testable for Vec<T> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<T> Testable for VecDeque<T> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<T> Testable for BTreeSet<T> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<K, V> Testable for BTreeMap<K, V> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<T, S> Testable for HashSet<T, S> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

impl<K, V, S> Testable for HashMap<K, V, S> {
    fn falsy_kind(&self) -> Option<FalsyKind> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_the_four_falsy_kinds() {
        assert_eq!(None::<i32>.falsy_kind(), Some(FalsyKind::Absent));
        assert_eq!(().falsy_kind(), Some(FalsyKind::Absent));
        assert_eq!(Null.falsy_kind(), Some(FalsyKind::Null));
        assert_eq!(false.falsy_kind(), Some(FalsyKind::False));
        assert_eq!(0i64.falsy_kind(), Some(FalsyKind::Zero));
        assert_eq!(0usize.falsy_kind(), Some(FalsyKind::Zero));
        assert_eq!(0.0f64.falsy_kind(), Some(FalsyKind::Zero));
        assert_eq!((-0.0f32).falsy_kind(), Some(FalsyKind::Zero));
    }

    #[test]
    fn test_empty_values_hold() {
        assert!("".holds());
        assert!(String::new().holds());
        assert!(Vec::<u8>::new().holds());
        assert!(HashMap::<String, i32>::new().holds());
        assert!([0u8; 0].holds());
        assert!(f64::NAN.holds());
    }

    #[test]
    fn test_nonzero_numbers_hold() {
        assert!(1i32.holds());
        assert!((-1i8).holds());
        assert!(0.5f64.holds());
        assert!(u128::MAX.holds());
    }

    #[test]
    fn test_option_delegates_to_inner() {
        assert_eq!(Some(false).falsy_kind(), Some(FalsyKind::False));
        assert_eq!(Some(0u32).falsy_kind(), Some(FalsyKind::Zero));
        assert!(Some("").holds());
        assert_eq!(Some(None::<bool>).falsy_kind(), Some(FalsyKind::Absent));
    }

    #[test]
    fn test_wrappers_delegate() {
        let zero = 0i32;
        assert!(!(&zero).holds());
        assert!(!Box::new(false).holds());
        assert!(Rc::new(3u8).holds());
        assert!(!Arc::new(Null).holds());
    }

    #[test]
    fn test_falsy_kind_display() {
        assert_eq!(FalsyKind::Zero.to_string(), "zero");
        assert_eq!(FalsyKind::Absent.to_string(), "absent");
    }
}
