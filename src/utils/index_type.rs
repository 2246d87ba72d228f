//! Compact slot indices shared by every index-linked collection in the crate.

use core::hash::Hash;
use std::fmt::Debug;

/// An integer type used as a **slot index** in place of a pointer.
///
/// Links between slots (tree children and parents, list successors, free-list
/// entries) are stored as indices into flat arrays. The maximum value of the
/// type is reserved as [`NONE`](IndexType::NONE), the arena analogue of a null
/// pointer, so a type can address at most [`LIMIT`](IndexType::LIMIT) slots.
pub trait IndexType: Copy + Eq + Hash + Debug + 'static {
    /// Sentinel meaning "no link".
    const NONE: Self;

    /// The first slot index.
    const ZERO: Self;

    /// Largest slot count addressable while keeping `NONE` reserved.
    const LIMIT: usize;

    /// Converts this index to a `usize` for array access.
    fn as_usize(self) -> usize;

    /// Converts a `usize` slot index to this compact type.
    ///
    /// # Panics
    /// Debug builds panic if `i` does not fit (e.g. `i > 255` for `u8`).
    fn from_usize(i: usize) -> Self;

    /// Returns `self + 1`.
    fn inc(self) -> Self;

    /// Returns `self - 1`.
    fn dec(self) -> Self;

    /// Returns true if the index is zero.
    fn is_zero(self) -> bool;

    /// Returns true if this is the `NONE` sentinel.
    #[inline(always)]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns true if this index links to a slot.
    #[inline(always)]
    fn is_some(self) -> bool {
        self != Self::NONE
    }
}

macro_rules! impl_index_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IndexType for $ty {
                const NONE: Self = <$ty>::MAX;
                const ZERO: Self = 0;
                const LIMIT: usize = <$ty>::MAX as usize;
                #[inline(always)]
                fn as_usize(self) -> usize {
                    self as usize
                }
                #[inline(always)]
                fn from_usize(i: usize) -> Self {
                    debug_assert!(i <= <$ty>::MAX as usize, "slot index {i} overflows {}", stringify!($ty));
                    i as $ty
                }
                #[inline(always)]
                fn inc(self) -> Self {
                    self + 1
                }
                #[inline(always)]
                fn dec(self) -> Self {
                    self - 1
                }
                #[inline(always)]
                fn is_zero(self) -> bool {
                    self == 0
                }
            }
        )*
    };
}

impl_index_type!(u8, u16, u32, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn test_index_type<I: IndexType>() {
        let zero = I::ZERO;
        assert!(zero.is_zero());
        assert_eq!(zero.as_usize(), 0);

        let one = zero.inc();
        assert!(!one.is_zero());
        assert_eq!(one.as_usize(), 1);

        let zero_again = one.dec();
        assert!(zero_again.is_zero());

        let from = I::from_usize(10);
        assert_eq!(from.as_usize(), 10);

        assert!(I::NONE.is_none());
        assert!(!I::NONE.is_some());
        assert!(zero.is_some());
        assert_eq!(I::NONE.as_usize(), I::LIMIT);
    }

    #[test]
    fn test_u8_index() {
        test_index_type::<u8>();
        assert_eq!(u8::LIMIT, 255);
    }

    #[test]
    fn test_u16_index() {
        test_index_type::<u16>();
        assert_eq!(u16::LIMIT, 65535);
    }

    #[test]
    fn test_u32_index() {
        test_index_type::<u32>();
    }

    #[test]
    fn test_usize_index() {
        test_index_type::<usize>();
    }

    #[test]
    fn test_limit_leaves_room_for_sentinel() {
        // Slots 0..LIMIT are addressable; the value LIMIT itself is NONE.
        let last = u8::from_usize(u8::LIMIT - 1);
        assert!(last.is_some());
        assert!(last.inc().is_none());
    }
}
