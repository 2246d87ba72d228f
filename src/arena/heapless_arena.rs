#![cfg(feature = "heapless")]
//! Stack-resident arena with a compile-time capacity.

use heapless::Vec as HeaplessVec;

use super::AnyArena;
use crate::IndexType;

/// A **stack-allocated** arena holding up to `N` slots.
///
/// Each of the four parallel arrays is a `heapless::Vec<_, N>`, so the whole
/// arena lives inline in its owner and never touches the allocator.
#[derive(Debug, Clone)]
pub struct HeaplessArena<T, const N: usize, I: IndexType = u16> {
    elements: HeaplessVec<T, N>,
    lefts: HeaplessVec<I, N>,
    rights: HeaplessVec<I, N>,
    parents: HeaplessVec<I, N>,
}

impl<T, const N: usize, I: IndexType> HeaplessArena<T, N, I> {
    /// Creates an empty arena. No allocation occurs.
    pub fn new() -> Self {
        const {
            assert!(
                N <= I::LIMIT,
                "HeaplessArena capacity N does not fit the index type; widen I"
            );
        }
        Self {
            elements: HeaplessVec::new(),
            lefts: HeaplessVec::new(),
            rights: HeaplessVec::new(),
            parents: HeaplessVec::new(),
        }
    }
}

impl<T, const N: usize, I: IndexType> Default for HeaplessArena<T, N, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, I: IndexType> AnyArena<T> for HeaplessArena<T, N, I> {
    type Index = I;

    #[inline(always)]
    fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        N
    }

    fn push(&mut self, element: T) -> Result<I, T> {
        let idx = I::from_usize(self.elements.len());
        self.elements.push(element)?;
        // The link arrays always have the same length as `elements`.
        self.lefts.push(I::NONE).ok();
        self.rights.push(I::NONE).ok();
        self.parents.push(I::NONE).ok();
        Ok(idx)
    }

    fn swap_remove(&mut self, hole: I) -> T {
        let h = hole.as_usize();
        self.lefts.swap_remove(h);
        self.rights.swap_remove(h);
        self.parents.swap_remove(h);
        self.elements.swap_remove(h)
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.lefts.clear();
        self.rights.clear();
        self.parents.clear();
    }

    fn drain_with(&mut self, f: &mut dyn FnMut(T)) {
        self.lefts.clear();
        self.rights.clear();
        self.parents.clear();
        self.elements.as_mut_slice().reverse();
        while let Some(element) = self.elements.pop() {
            f(element);
        }
    }

    #[inline(always)]
    fn elements(&self) -> &[T] {
        self.elements.as_slice()
    }

    #[inline(always)]
    fn elements_mut(&mut self) -> &mut [T] {
        self.elements.as_mut_slice()
    }

    fn empty_like(&self) -> Self {
        Self::new()
    }

    #[inline(always)]
    fn left(&self, idx: I) -> I {
        self.lefts[idx.as_usize()]
    }

    #[inline(always)]
    fn right(&self, idx: I) -> I {
        self.rights[idx.as_usize()]
    }

    #[inline(always)]
    fn parent(&self, idx: I) -> I {
        self.parents[idx.as_usize()]
    }

    #[inline(always)]
    fn set_left(&mut self, idx: I, to: I) {
        self.lefts[idx.as_usize()] = to;
    }

    #[inline(always)]
    fn set_right(&mut self, idx: I, to: I) {
        self.rights[idx.as_usize()] = to;
    }

    #[inline(always)]
    fn set_parent(&mut self, idx: I, to: I) {
        self.parents[idx.as_usize()] = to;
    }
}
