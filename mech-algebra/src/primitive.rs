//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates the [`Rational`] `num / den`. The denominator must not be zero.
pub fn ratio(num: i64, den: i64) -> Rational {
    Rational::from((num, den))
}

/// If the given [`Rational`] is an integer that fits in an [`i32`], returns it.
pub fn small_int(n: &Rational) -> Option<i32> {
    if *n.denom() == 1 {
        n.numer().to_i32()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_integers() {
        assert_eq!(small_int(&rational(-7)), Some(-7));
        assert_eq!(small_int(&ratio(6, 3)), Some(2));
        assert_eq!(small_int(&ratio(1, 2)), None);
        assert_eq!(small_int(&rational(int(1_u64 << 40))), None);
    }
}
