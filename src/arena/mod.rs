//! Dense, capacity-bounded slot storage for intrinsic (index-linked) trees.
//!
//! An arena stores one element per slot plus three link arrays (`lefts`,
//! `rights`, `parents`) in struct-of-arrays layout. Slots are always dense:
//! occupied slots are exactly `0..len`. Removal goes through
//! [`swap_remove`](AnyArena::swap_remove), which moves the last slot into the
//! hole; the caller is responsible for re-pointing the moved slot's neighbours.
//!
//! Two storage strategies implement [`AnyArena`]:
//!
//! | Type | Storage | Capacity |
//! |------|---------|----------|
//! | [`HeapArena`] | `Vec` reserved up front | chosen at construction |
//! | [`HeaplessArena`] | `heapless::Vec` inline | const generic `N` |

pub mod heap_arena;
#[cfg(feature = "heapless")]
pub mod heapless_arena;

pub use heap_arena::HeapArena;
#[cfg(feature = "heapless")]
pub use heapless_arena::HeaplessArena;

use crate::IndexType;

/// Common interface of the arena storage strategies.
///
/// Indices handed out by [`push`](AnyArena::push) stay valid only until the
/// next [`swap_remove`](AnyArena::swap_remove).
pub trait AnyArena<T> {
    /// Slot index type; `Index::NONE` is the "no link" sentinel.
    type Index: IndexType;

    /// Number of occupied slots.
    fn len(&self) -> usize;

    /// Maximum number of slots.
    fn capacity(&self) -> usize;

    /// Returns `true` if no slot is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every slot is occupied.
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Appends a slot with all links set to `NONE`.
    ///
    /// Returns the new slot's index, or the element back if the arena is full.
    fn push(&mut self, element: T) -> Result<Self::Index, T>;

    /// Removes the slot at `hole` and returns its element.
    ///
    /// The last slot (element and links) is moved into `hole` unless `hole`
    /// already is the last slot. Links pointing at the old last index are
    /// **not** rewritten.
    ///
    /// # Panics
    /// Panics if `hole` is out of bounds.
    fn swap_remove(&mut self, hole: Self::Index) -> T;

    /// Removes every slot, dropping the elements.
    fn clear(&mut self);

    /// Removes every slot, handing each element to `f` in array order.
    fn drain_with(&mut self, f: &mut dyn FnMut(T));

    /// The dense element array.
    fn elements(&self) -> &[T];

    /// The dense element array, mutably.
    fn elements_mut(&mut self) -> &mut [T];

    /// Creates an empty arena with the same capacity.
    fn empty_like(&self) -> Self
    where
        Self: Sized;

    fn left(&self, idx: Self::Index) -> Self::Index;
    fn right(&self, idx: Self::Index) -> Self::Index;
    fn parent(&self, idx: Self::Index) -> Self::Index;
    fn set_left(&mut self, idx: Self::Index, to: Self::Index);
    fn set_right(&mut self, idx: Self::Index, to: Self::Index);
    fn set_parent(&mut self, idx: Self::Index, to: Self::Index);

    /// Returns the element stored in slot `idx`.
    #[inline(always)]
    fn element(&self, idx: Self::Index) -> &T {
        &self.elements()[idx.as_usize()]
    }

    /// Swaps the elements of two slots, leaving their links in place.
    #[inline]
    fn swap_elements(&mut self, a: Self::Index, b: Self::Index) {
        self.elements_mut().swap(a.as_usize(), b.as_usize());
    }
}
