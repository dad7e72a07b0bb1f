//! Entries of a bundle indicator vector

use std::fmt::Debug;

/// A single 0/1 membership flag as a host may send it.
///
/// Rows returned by random bid sampling are `f64`, so floats are accepted as
/// long as they are exactly 0 or 1.
pub trait Indicator: Copy + Debug {
    /// `Some(true)` for 1, `Some(false)` for 0, `None` for anything else
    fn membership(self) -> Option<bool>;
}

macro_rules! impl_integer_indicator {
    ($($t:ty),*) => {
        $(
            impl Indicator for $t {
                fn membership(self) -> Option<bool> {
                    match self {
                        0 => Some(false),
                        1 => Some(true),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_integer_indicator!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

impl Indicator for bool {
    fn membership(self) -> Option<bool> {
        Some(self)
    }
}

impl Indicator for f32 {
    fn membership(self) -> Option<bool> {
        f64::from(self).membership()
    }
}

impl Indicator for f64 {
    fn membership(self) -> Option<bool> {
        if self == 0.0 {
            Some(false)
        } else if self == 1.0 {
            Some(true)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_membership() {
        assert_eq!(0u8.membership(), Some(false));
        assert_eq!(1i64.membership(), Some(true));
        assert_eq!(2u32.membership(), None);
        assert_eq!((-1i32).membership(), None);
    }

    #[test]
    fn test_float_membership() {
        assert_eq!(1.0f64.membership(), Some(true));
        assert_eq!((-0.0f64).membership(), Some(false));
        assert_eq!(0.5f64.membership(), None);
        assert_eq!(f64::NAN.membership(), None);
    }
}
