//! Extensions for numbers that are not present in the stable standard library.

use super::MAX_INTEGER_VALUE;
use super::MIN_INTEGER_VALUE;

pub(crate) trait NumExt {
    /// Division with rounding up.
    fn div_ceil(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_floor(self, other: Self) -> Self;
}

impl NumExt for i64 {
    fn div_ceil(self, other: Self) -> Self {
        // TODO: The source is taken from the standard library nightly implementation of this
        // function and div_floor. Once they are stabilized, these definitions can be removed.
        // Tracking issue: https://github.com/rust-lang/rust/issues/88581
        let d = self / other;
        let r = self % other;
        if (r > 0 && other > 0) || (r < 0 && other < 0) {
            d + 1
        } else {
            d
        }
    }

    fn div_floor(self, other: Self) -> Self {
        // TODO: See todo in `div_ceil`.
        let d = self / other;
        let r = self % other;
        if (r > 0 && other < 0) || (r < 0 && other > 0) {
            d - 1
        } else {
            d
        }
    }
}

fn clamp_to_bounds(value: i64) -> i64 {
    value.clamp(MIN_INTEGER_VALUE, MAX_INTEGER_VALUE)
}

/// `a + b`, where an infinite operand makes the result infinite.
pub(crate) fn cap_add(a: i64, b: i64) -> i64 {
    if a >= MAX_INTEGER_VALUE || b >= MAX_INTEGER_VALUE {
        return MAX_INTEGER_VALUE;
    }
    if a <= MIN_INTEGER_VALUE || b <= MIN_INTEGER_VALUE {
        return MIN_INTEGER_VALUE;
    }

    clamp_to_bounds(a.saturating_add(b))
}

/// `a - b`, where an infinite operand makes the result infinite.
pub(crate) fn cap_sub(a: i64, b: i64) -> i64 {
    cap_add(a, clamp_to_bounds(b).saturating_neg())
}

/// `a * b`, saturating at the infinities.
pub(crate) fn cap_prod(a: i64, b: i64) -> i64 {
    clamp_to_bounds(a.saturating_mul(b))
}

/// `floor(value / divisor)` for a positive `divisor`; infinities are preserved.
pub(crate) fn floor_ratio(value: i64, divisor: i64) -> i64 {
    debug_assert!(divisor > 0);
    if value >= MAX_INTEGER_VALUE {
        MAX_INTEGER_VALUE
    } else if value <= MIN_INTEGER_VALUE {
        MIN_INTEGER_VALUE
    } else {
        <i64 as NumExt>::div_floor(value, divisor)
    }
}

/// `ceil(value / divisor)` for a positive `divisor`; infinities are preserved.
pub(crate) fn ceil_ratio(value: i64, divisor: i64) -> i64 {
    debug_assert!(divisor > 0);
    if value >= MAX_INTEGER_VALUE {
        MAX_INTEGER_VALUE
    } else if value <= MIN_INTEGER_VALUE {
        MIN_INTEGER_VALUE
    } else {
        <i64 as NumExt>::div_ceil(value, divisor)
    }
}

/// Negates a bound, mapping +infinity to -infinity and vice versa.
pub(crate) fn negate_bound(value: i64) -> i64 {
    clamp_to_bounds(value).saturating_neg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_rounds_in_the_right_direction() {
        assert_eq!(2, <i64 as NumExt>::div_floor(5, 2));
        assert_eq!(-3, <i64 as NumExt>::div_floor(-5, 2));
        assert_eq!(3, <i64 as NumExt>::div_ceil(5, 2));
        assert_eq!(-2, <i64 as NumExt>::div_ceil(-5, 2));
    }

    #[test]
    fn infinity_is_sticky_under_addition() {
        assert_eq!(MAX_INTEGER_VALUE, cap_add(MAX_INTEGER_VALUE, -1_000));
        assert_eq!(MIN_INTEGER_VALUE, cap_add(MIN_INTEGER_VALUE, 1_000));
        assert_eq!(MAX_INTEGER_VALUE, cap_sub(5, MIN_INTEGER_VALUE));
    }

    #[test]
    fn products_saturate_instead_of_wrapping() {
        let large = 1_i64 << 62;

        assert_eq!(MAX_INTEGER_VALUE, cap_prod(2, large));
        assert_eq!(MIN_INTEGER_VALUE, cap_prod(-2, large));
        assert_eq!(MAX_INTEGER_VALUE, cap_add(cap_prod(2, large), large));
        assert_eq!(0, cap_prod(0, MAX_INTEGER_VALUE));
    }

    #[test]
    fn ratios_keep_infinities() {
        assert_eq!(MAX_INTEGER_VALUE, floor_ratio(MAX_INTEGER_VALUE, 2));
        assert_eq!(MIN_INTEGER_VALUE, ceil_ratio(i64::MIN, 3));
        assert_eq!(-3, floor_ratio(-7, 3));
        assert_eq!(-2, ceil_ratio(-7, 3));
    }

    #[test]
    fn negation_swaps_infinities() {
        assert_eq!(MIN_INTEGER_VALUE, negate_bound(MAX_INTEGER_VALUE));
        assert_eq!(MAX_INTEGER_VALUE, negate_bound(i64::MIN));
        assert_eq!(-4, negate_bound(4));
    }
}
