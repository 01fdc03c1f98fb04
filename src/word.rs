//! Trait for the unsigned word types that fix the branching factor of a
//! [`BitmapTree`](crate::BitmapTree).

use core::{
    fmt,
    hash::Hash,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Shl},
};

mod private {
    pub trait Sealed {}
}

/// An unsigned machine word used as one bitmap of the tree.
///
/// The number of bits in the word is the branching factor `F` of the tree:
/// every inner node has `F` children, and every leaf holds `F` words of `F`
/// bits each. A set bit always means "free".
///
/// This trait is sealed and implemented for `u8`, `u16`, `u32`, `u64` and
/// `u128`.
pub trait Word:
    private::Sealed
    + Copy
    + Eq
    + Hash
    + fmt::Debug
    + fmt::Binary
    + BitAnd<Output = Self>
    + BitAndAssign
    + BitOr<Output = Self>
    + BitOrAssign
    + Not<Output = Self>
    + Shl<usize, Output = Self>
    + 'static
{
    /// Number of bits in the word, which is also the branching factor.
    const BITS: usize;

    /// The word with no bits set.
    const ZERO: Self;

    /// The word with only the lowest bit set.
    const ONE: Self;

    /// The word with every bit set.
    const ONES: Self;

    /// An array of exactly [`Self::BITS`] elements.
    type Array<T>: AsRef<[T]> + AsMut<[T]>;

    /// Build a [`Self::Array`] by calling `f` with each position in order.
    fn array_from_fn<T>(f: impl FnMut(usize) -> T) -> Self::Array<T>;

    /// Number of set bits.
    fn count_ones(self) -> u32;

    /// Number of zero bits below the lowest set bit.
    fn trailing_zeros(self) -> u32;

    /// The word with only bit `index` set.
    #[inline]
    fn bit(index: usize) -> Self {
        debug_assert!(index < Self::BITS);
        Self::ONE << index
    }

    /// Return true if bit `index` is set.
    #[inline]
    fn test_bit(self, index: usize) -> bool {
        self & Self::bit(index) != Self::ZERO
    }

    /// Set bit `index`.
    #[inline]
    fn set_bit(&mut self, index: usize) {
        *self |= Self::bit(index);
    }

    /// Clear bit `index`.
    #[inline]
    fn clear_bit(&mut self, index: usize) {
        *self &= !Self::bit(index);
    }

    /// Position of the lowest set bit, or `None` if no bit is set.
    #[inline]
    fn lowest_set_bit(self) -> Option<usize> {
        if self == Self::ZERO {
            None
        } else {
            Some(self.trailing_zeros() as usize)
        }
    }
}

macro_rules! word_for_unsigned_types {
    ($($type:ty => $bits:literal),*) => {
        $(
            impl private::Sealed for $type {}

            impl Word for $type {
                const BITS: usize = $bits;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const ONES: Self = <$type>::MAX;

                type Array<T> = [T; $bits];

                #[inline]
                fn array_from_fn<T>(f: impl FnMut(usize) -> T) -> Self::Array<T> {
                    core::array::from_fn(f)
                }

                #[inline]
                fn count_ones(self) -> u32 {
                    <$type>::count_ones(self)
                }

                #[inline]
                fn trailing_zeros(self) -> u32 {
                    <$type>::trailing_zeros(self)
                }
            }
        )*
    };
}

word_for_unsigned_types!(u8 => 8, u16 => 16, u32 => 32, u64 => 64, u128 => 128);
