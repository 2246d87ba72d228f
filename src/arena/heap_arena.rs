//! Heap-backed arena whose capacity is fixed when it is created.

use super::AnyArena;
use crate::error::{Error, Result};
use crate::IndexType;

/// A **heap-allocated** arena with a capacity chosen at construction.
///
/// All four parallel arrays are reserved for the full capacity up front, so
/// the arena never reallocates after construction.
#[derive(Debug)]
pub struct HeapArena<T, I: IndexType = u32> {
    elements: Vec<T>,
    lefts: Vec<I>,
    rights: Vec<I>,
    parents: Vec<I>,
    capacity: usize,
}

impl<T, I: IndexType> HeapArena<T, I> {
    /// Creates an empty arena able to hold `capacity` slots.
    ///
    /// # Panics
    /// Panics if `capacity` exceeds `I::LIMIT` or the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(arena) => arena,
            Err(e) => panic!("HeapArena::with_capacity: {e}"),
        }
    }

    /// Fallible variant of [`with_capacity`](HeapArena::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        if capacity > I::LIMIT {
            return Err(Error::InvalidCapacity {
                requested: capacity,
                limit: I::LIMIT,
            });
        }
        Ok(Self {
            elements: reserve(capacity)?,
            lefts: reserve(capacity)?,
            rights: reserve(capacity)?,
            parents: reserve(capacity)?,
            capacity,
        })
    }
}

impl<T: Clone, I: IndexType> Clone for HeapArena<T, I> {
    /// The clone reserves the full capacity again.
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.capacity);
        out.elements.extend_from_slice(&self.elements);
        out.lefts.extend_from_slice(&self.lefts);
        out.rights.extend_from_slice(&self.rights);
        out.parents.extend_from_slice(&self.parents);
        out
    }
}

fn reserve<U>(capacity: usize) -> Result<Vec<U>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
        .map_err(|_| Error::AllocationFailed { capacity })?;
    Ok(v)
}

impl<T, I: IndexType> AnyArena<T> for HeapArena<T, I> {
    type Index = I;

    #[inline(always)]
    fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&mut self, element: T) -> std::result::Result<I, T> {
        if self.elements.len() >= self.capacity {
            return Err(element);
        }
        let idx = I::from_usize(self.elements.len());
        self.elements.push(element);
        self.lefts.push(I::NONE);
        self.rights.push(I::NONE);
        self.parents.push(I::NONE);
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
        for element in self.elements.drain(..) {
            f(element);
        }
    }

    #[inline(always)]
    fn elements(&self) -> &[T] {
        &self.elements
    }

    #[inline(always)]
    fn elements_mut(&mut self) -> &mut [T] {
        &mut self.elements
    }

    fn empty_like(&self) -> Self {
        Self::with_capacity(self.capacity)
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
