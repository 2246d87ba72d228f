//! Intrinsic binary search tree: links live in parallel index arrays, not in
//! heap-allocated nodes.
//!
//! # Layout
//! The tree owns an arena (see [`crate::arena`]) with four parallel arrays,
//! `elements`, `lefts`, `rights` and `parents`, plus a `root` index. An index
//! equal to `I::NONE` means "no link".
//!
//! # Density
//! Occupied slots are always exactly `0..len`. Removing a node leaves a hole
//! that is closed before the call returns by moving the **last** slot into it
//! and re-pointing that slot's parent and children. As a consequence any slot
//! index observed before a removal may name a different element afterwards;
//! the public API never hands indices out.
//!
//! # Ordering
//! Inserts descend left while `compare(new, current) != Greater`, so equal
//! elements collect in the left subtree of the first one inserted. An
//! in-order walk always yields a non-decreasing sequence.

use core::cmp::Ordering;
use core::fmt::{self, Debug};
use std::marker::PhantomData;

use bitvec::prelude::{BitVec, Lsb0};
use tracing::{debug, trace};

use super::traverse::{InOrder, LevelOrder, Order, PostOrder, PreOrder};
use crate::IndexType;
use crate::arena::{AnyArena, HeapArena};
#[cfg(feature = "heapless")]
use crate::arena::HeaplessArena;
use crate::error::{Error, Result};

/// Comparator type used when the element's own `Ord` decides the order.
pub type CompareFn<T> = fn(&T, &T) -> Ordering;

/// A binary search tree stored in an arena `A` and ordered by `C`.
///
/// Use one of the aliases rather than naming this type directly:
///
/// | Alias | Storage | Capacity |
/// |-------|---------|----------|
/// | [`BinaryTree`] | heap, reserved up front | constructor argument |
/// | [`HeaplessBinaryTree`] | inline `heapless::Vec`s | const generic `N` |
///
/// # Removal
/// ```text
/// node = locate(key)
/// left_depth  = length of the right-chain starting at left[node]
/// right_depth = length of the left-chain starting at right[node]
/// repl = rightmost(left[node])   if left_depth > right_depth
///      = leftmost(right[node])   else if right[node] != NONE
///      = node                    otherwise (leaf)
/// splice repl out: parent(repl) adopts repl's only child
/// swap elements[node] <-> elements[repl]   // removed value now sits in repl
/// hole = repl
/// move slot len-1 into hole; re-point its children, its parent and root
/// return the removed value
/// ```
///
/// Promoting from the deeper side is a cheap balancing heuristic; the tree
/// performs no rotations.
pub struct IntrinsicTree<T, A, C = CompareFn<T>>
where
    A: AnyArena<T>,
{
    arena: A,
    root: A::Index,
    compare: C,
    _marker: PhantomData<T>,
}

/// Heap-backed tree with a capacity fixed at construction.
pub type BinaryTree<T, I = u32, C = CompareFn<T>> = IntrinsicTree<T, HeapArena<T, I>, C>;

/// Stack-resident tree holding at most `N` elements.
#[cfg(feature = "heapless")]
pub type HeaplessBinaryTree<T, const N: usize, I = u16, C = CompareFn<T>> =
    IntrinsicTree<T, HeaplessArena<T, N, I>, C>;

impl<T: Ord, I: IndexType> IntrinsicTree<T, HeapArena<T, I>> {
    /// Creates an empty tree ordered by `T::cmp` with room for `capacity`
    /// elements.
    ///
    /// # Panics
    /// Panics if `capacity` exceeds `I::LIMIT` or the storage cannot be
    /// reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, <T as Ord>::cmp)
    }

    /// Fallible variant of [`with_capacity`](IntrinsicTree::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::from_parts(
            HeapArena::try_with_capacity(capacity)?,
            <T as Ord>::cmp,
        ))
    }
}

impl<T, I: IndexType, C> IntrinsicTree<T, HeapArena<T, I>, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty tree ordered by `compare`.
    ///
    /// # Panics
    /// Same conditions as [`with_capacity`](IntrinsicTree::with_capacity).
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        Self::from_parts(HeapArena::with_capacity(capacity), compare)
    }
}

#[cfg(feature = "heapless")]
impl<T: Ord, const N: usize, I: IndexType> IntrinsicTree<T, HeaplessArena<T, N, I>> {
    /// Creates an empty tree ordered by `T::cmp`. No allocation occurs.
    pub fn new() -> Self {
        Self::from_parts(HeaplessArena::new(), <T as Ord>::cmp)
    }
}

#[cfg(feature = "heapless")]
impl<T: Ord, const N: usize, I: IndexType> Default for IntrinsicTree<T, HeaplessArena<T, N, I>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "heapless")]
impl<T, const N: usize, I: IndexType, C> IntrinsicTree<T, HeaplessArena<T, N, I>, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty tree ordered by `compare`.
    pub fn with_comparator(compare: C) -> Self {
        Self::from_parts(HeaplessArena::new(), compare)
    }
}

impl<T, A, C> IntrinsicTree<T, A, C>
where
    A: AnyArena<T>,
    C: Fn(&T, &T) -> Ordering,
{
    fn from_parts(mut arena: A, compare: C) -> Self {
        arena.clear();
        Self {
            arena,
            root: <A::Index as IndexType>::NONE,
            compare,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if no further element can be inserted.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.arena.is_full()
    }

    /// Maximum number of elements.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// The elements in arena order (not sorted).
    pub fn elements(&self) -> &[T] {
        self.arena.elements()
    }

    /// Inserts `element`, keeping the search order.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] if the tree is full; the tree is left
    /// untouched and `element` is dropped.
    pub fn insert(&mut self, element: T) -> Result<()> {
        if self.arena.is_full() {
            debug!(
                capacity = self.arena.capacity(),
                "rejected insert into full arena"
            );
            return Err(Error::CapacityExceeded {
                capacity: self.arena.capacity(),
            });
        }

        let mut parent = <A::Index as IndexType>::NONE;
        let mut go_left = false;
        let mut curr = self.root;
        while curr.is_some() {
            parent = curr;
            go_left = (self.compare)(&element, self.arena.element(curr)) != Ordering::Greater;
            curr = if go_left {
                self.arena.left(curr)
            } else {
                self.arena.right(curr)
            };
        }

        let idx = self.arena.push(element).map_err(|_| Error::CapacityExceeded {
            capacity: self.arena.capacity(),
        })?;
        self.arena.set_parent(idx, parent);
        if parent.is_none() {
            self.root = idx;
        } else if go_left {
            self.arena.set_left(parent, idx);
        } else {
            self.arena.set_right(parent, idx);
        }
        Ok(())
    }

    /// Returns `true` if an element compares equal to `key`.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree. Querying an empty tree is treated as
    /// a caller bug rather than answered with `false`.
    pub fn contains(&self, key: &T) -> Result<bool> {
        match self.locate(key) {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns the stored element comparing equal to `key`.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree, [`Error::NotFound`] if no element
    /// compares equal.
    pub fn find(&self, key: &T) -> Result<&T> {
        self.locate(key).map(|idx| self.arena.element(idx))
    }

    /// Returns the smallest element.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree.
    pub fn min(&self) -> Result<&T> {
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        Ok(self.arena.element(self.leftmost(self.root)))
    }

    /// Returns the largest element.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree.
    pub fn max(&self) -> Result<&T> {
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        Ok(self.arena.element(self.rightmost(self.root)))
    }

    /// Removes and returns an element comparing equal to `key`.
    ///
    /// When several elements compare equal, the one closest to the root is
    /// removed.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree, [`Error::NotFound`] if no element
    /// compares equal.
    pub fn remove(&mut self, key: &T) -> Result<T> {
        let node = self.locate(key)?;
        let left = self.arena.left(node);
        let right = self.arena.right(node);

        let left_depth = self.chain_depth(left, |a, i| a.right(i));
        let right_depth = self.chain_depth(right, |a, i| a.left(i));

        let replacement = if left_depth > right_depth {
            self.rightmost(left)
        } else if right.is_some() {
            self.leftmost(right)
        } else {
            node
        };

        // `replacement` has at most one child in every branch above.
        let child = if self.arena.left(replacement).is_some() {
            self.arena.left(replacement)
        } else {
            self.arena.right(replacement)
        };
        self.splice_out(replacement, child);
        if replacement != node {
            self.arena.swap_elements(node, replacement);
        }
        Ok(self.release(replacement))
    }

    /// Removes and returns the smallest element.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree.
    pub fn remove_min(&mut self) -> Result<T> {
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        let node = self.leftmost(self.root);
        let child = self.arena.right(node);
        self.splice_out(node, child);
        Ok(self.release(node))
    }

    /// Removes and returns the largest element.
    ///
    /// # Errors
    /// [`Error::Empty`] on an empty tree.
    pub fn remove_max(&mut self) -> Result<T> {
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        let node = self.rightmost(self.root);
        let child = self.arena.left(node);
        self.splice_out(node, child);
        Ok(self.release(node))
    }

    /// Removes every element, dropping them in place. Capacity is kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = <A::Index as IndexType>::NONE;
    }

    /// Removes every element, handing each to `destroy` in arena order.
    pub fn clear_with<F>(&mut self, mut destroy: F)
    where
        F: FnMut(T),
    {
        self.arena.drain_with(&mut destroy);
        self.root = <A::Index as IndexType>::NONE;
    }

    /// Consumes the tree, handing each element to `destroy` in arena order.
    pub fn destroy_with<F>(mut self, destroy: F)
    where
        F: FnMut(T),
    {
        self.clear_with(destroy);
    }

    /// Builds a structurally identical tree whose elements are produced by
    /// `copy`.
    pub fn copy_with<F>(&self, mut copy: F) -> Self
    where
        F: FnMut(&T) -> T,
        C: Clone,
    {
        let mut arena = self.arena.empty_like();
        for element in self.arena.elements() {
            // Same capacity, same number of pushes: never full.
            let pushed = arena.push(copy(element));
            debug_assert!(pushed.is_ok());
        }
        for i in 0..self.arena.len() {
            let idx = <A::Index as IndexType>::from_usize(i);
            arena.set_left(idx, self.arena.left(idx));
            arena.set_right(idx, self.arena.right(idx));
            arena.set_parent(idx, self.arena.parent(idx));
        }
        Self {
            arena,
            root: self.root,
            compare: self.compare.clone(),
            _marker: PhantomData,
        }
    }

    /// Hands the dense element array to `manage` for in-place bulk work.
    ///
    /// `manage` must not change the relative order of elements under the
    /// tree's comparator; the links are left as they are.
    pub fn manage<F>(&mut self, manage: F)
    where
        F: FnOnce(&mut [T]),
    {
        manage(self.arena.elements_mut());
    }

    /// Number of levels on the longest root-to-leaf path (0 when empty).
    pub fn height(&self) -> usize {
        let mut frontier = Vec::with_capacity(self.len());
        let mut next = Vec::with_capacity(self.len());
        if self.root.is_some() {
            frontier.push(self.root);
        }
        let mut height = 0;
        while !frontier.is_empty() {
            height += 1;
            for &idx in &frontier {
                for child in [self.arena.left(idx), self.arena.right(idx)] {
                    if child.is_some() {
                        next.push(child);
                    }
                }
            }
            std::mem::swap(&mut frontier, &mut next);
            next.clear();
        }
        height
    }

    /// Ascending iterator (same as [`iter_in_order`](IntrinsicTree::iter_in_order)).
    pub fn iter(&self) -> InOrder<'_, T, A> {
        self.iter_in_order()
    }

    pub fn iter_in_order(&self) -> InOrder<'_, T, A> {
        InOrder::new(&self.arena, self.root)
    }

    pub fn iter_pre_order(&self) -> PreOrder<'_, T, A> {
        PreOrder::new(&self.arena, self.root)
    }

    pub fn iter_post_order(&self) -> PostOrder<'_, T, A> {
        PostOrder::new(&self.arena, self.root)
    }

    pub fn iter_level_order(&self) -> LevelOrder<'_, T, A> {
        LevelOrder::new(&self.arena, self.root)
    }

    /// Calls `operate` on every element in `order`.
    ///
    /// Returning `false` from `operate` stops the walk; the remaining
    /// elements are not visited. Returns `true` if every element was visited.
    pub fn traverse<F>(&self, order: Order, mut operate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        match order {
            Order::InOrder => self.iter_in_order().all(|e| operate(e)),
            Order::PreOrder => self.iter_pre_order().all(|e| operate(e)),
            Order::PostOrder => self.iter_post_order().all(|e| operate(e)),
            Order::LevelOrder => self.iter_level_order().all(|e| operate(e)),
        }
    }

    /// Verifies the arena's structural invariants.
    ///
    /// Checks that every link stays below `len`, that parent and child links
    /// agree, that each slot is reachable from the root exactly once, and that
    /// the in-order sequence never decreases.
    pub fn check_invariants(&self) -> Result<()> {
        let len = self.arena.len();
        let corrupted = |index: usize, reason: &'static str| Err(Error::Corrupted { index, reason });

        if self.root.is_none() {
            return if len == 0 {
                Ok(())
            } else {
                corrupted(0, "slots occupied but root is NONE")
            };
        }
        let root = self.root.as_usize();
        if root >= len {
            return corrupted(root, "root past the dense end");
        }
        if self.arena.parent(self.root).is_some() {
            return corrupted(root, "root has a parent");
        }

        let mut seen: BitVec<usize, Lsb0> = BitVec::repeat(false, len);
        let mut stack = Vec::with_capacity(len);
        stack.push(self.root);
        while let Some(idx) = stack.pop() {
            let i = idx.as_usize();
            if seen.replace(i, true) {
                return corrupted(i, "slot reachable twice");
            }
            for child in [self.arena.left(idx), self.arena.right(idx)] {
                if child.is_none() {
                    continue;
                }
                if child.as_usize() >= len {
                    return corrupted(i, "link past the dense end");
                }
                if self.arena.parent(child) != idx {
                    return corrupted(child.as_usize(), "parent link does not match");
                }
                stack.push(child);
            }
        }
        if let Some(i) = seen.first_zero() {
            return corrupted(i, "slot unreachable from root");
        }

        let mut prev: Option<&T> = None;
        for (pos, element) in self.iter_in_order().enumerate() {
            if let Some(p) = prev {
                if (self.compare)(p, element) == Ordering::Greater {
                    return corrupted(pos, "in-order sequence decreases");
                }
            }
            prev = Some(element);
        }
        Ok(())
    }

    /// Walks from the root to the first slot comparing equal to `key`.
    fn locate(&self, key: &T) -> Result<A::Index> {
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        let mut curr = self.root;
        while curr.is_some() {
            curr = match (self.compare)(key, self.arena.element(curr)) {
                Ordering::Equal => return Ok(curr),
                Ordering::Less => self.arena.left(curr),
                Ordering::Greater => self.arena.right(curr),
            };
        }
        Err(Error::NotFound)
    }

    fn leftmost(&self, mut idx: A::Index) -> A::Index {
        while self.arena.left(idx).is_some() {
            idx = self.arena.left(idx);
        }
        idx
    }

    fn rightmost(&self, mut idx: A::Index) -> A::Index {
        while self.arena.right(idx).is_some() {
            idx = self.arena.right(idx);
        }
        idx
    }

    /// Counts slots on the chain starting at `start` and following `step`.
    fn chain_depth<F>(&self, start: A::Index, step: F) -> usize
    where
        F: Fn(&A, A::Index) -> A::Index,
    {
        let mut depth = 0;
        let mut curr = start;
        while curr.is_some() {
            depth += 1;
            curr = step(&self.arena, curr);
        }
        depth
    }

    /// Detaches `node` (which has at most the one child `child`) by linking
    /// its parent directly to `child`.
    fn splice_out(&mut self, node: A::Index, child: A::Index) {
        let parent = self.arena.parent(node);
        if child.is_some() {
            self.arena.set_parent(child, parent);
        }
        if parent.is_none() {
            self.root = child;
        } else if self.arena.left(parent) == node {
            self.arena.set_left(parent, child);
        } else {
            self.arena.set_right(parent, child);
        }
    }

    /// Frees the detached slot `hole`, moving the last slot into it.
    fn release(&mut self, hole: A::Index) -> T {
        let last = <A::Index as IndexType>::from_usize(self.arena.len() - 1);
        let removed = self.arena.swap_remove(hole);
        if hole == last {
            return removed;
        }

        let (left, right) = (self.arena.left(hole), self.arena.right(hole));
        if left.is_some() {
            self.arena.set_parent(left, hole);
        }
        if right.is_some() {
            self.arena.set_parent(right, hole);
        }
        let parent = self.arena.parent(hole);
        if parent.is_some() {
            // Side is decided by index identity; equal keys may sit on either side.
            if self.arena.left(parent) == last {
                self.arena.set_left(parent, hole);
            } else {
                self.arena.set_right(parent, hole);
            }
        }
        if self.root == last {
            self.root = hole;
        }
        trace!(?hole, ?last, "moved last arena slot into hole");
        removed
    }
}

impl<T, A, C> Clone for IntrinsicTree<T, A, C>
where
    A: AnyArena<T> + Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            compare: self.compare.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, A, C> Debug for IntrinsicTree<T, A, C>
where
    T: Debug,
    A: AnyArena<T>,
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, A, C> IntoIterator for &'a IntrinsicTree<T, A, C>
where
    T: 'a,
    A: AnyArena<T>,
    C: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = InOrder<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
