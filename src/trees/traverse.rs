//! Non-recursive traversals over an intrinsic tree.
//!
//! Every iterator owns an explicit index stack (or queue) sized to the tree's
//! length, so a degenerate, list-shaped tree cannot exhaust the call stack.
//! The buffer is released when the iterator is dropped, including after an
//! early stop.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::IndexType;
use crate::arena::AnyArena;

/// Visiting order for [`IntrinsicTree::traverse`](crate::IntrinsicTree::traverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Left subtree, node, right subtree (ascending order).
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
    /// Breadth first, left to right.
    LevelOrder,
}

/// In-order iterator.
///
/// ```text
/// loop:
///     while curr != NONE: push curr; curr = left[curr]
///     idx = pop()            // None -> done
///     curr = right[idx]
///     yield elements[idx]
/// ```
pub struct InOrder<'a, T, A: AnyArena<T>> {
    arena: &'a A,
    stack: Vec<A::Index>,
    curr: A::Index,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, A: AnyArena<T>> InOrder<'a, T, A> {
    pub(crate) fn new(arena: &'a A, root: A::Index) -> Self {
        Self {
            arena,
            stack: Vec::with_capacity(arena.len()),
            curr: root,
            remaining: arena.len(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, A: AnyArena<T>> Iterator for InOrder<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let arena = self.arena;
        while self.curr.is_some() {
            self.stack.push(self.curr);
            self.curr = arena.left(self.curr);
        }
        let idx = self.stack.pop()?;
        self.curr = arena.right(idx);
        self.remaining -= 1;
        Some(arena.element(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, A: AnyArena<T>> ExactSizeIterator for InOrder<'a, T, A> {}

/// Pre-order iterator: the stack is seeded with the root, and each visit
/// pushes the right child before the left so the left subtree comes first.
pub struct PreOrder<'a, T, A: AnyArena<T>> {
    arena: &'a A,
    stack: Vec<A::Index>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, A: AnyArena<T>> PreOrder<'a, T, A> {
    pub(crate) fn new(arena: &'a A, root: A::Index) -> Self {
        let mut stack = Vec::with_capacity(arena.len());
        if root.is_some() {
            stack.push(root);
        }
        Self {
            arena,
            stack,
            remaining: arena.len(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, A: AnyArena<T>> Iterator for PreOrder<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let arena = self.arena;
        let idx = self.stack.pop()?;
        let (left, right) = (arena.left(idx), arena.right(idx));
        if right.is_some() {
            self.stack.push(right);
        }
        if left.is_some() {
            self.stack.push(left);
        }
        self.remaining -= 1;
        Some(arena.element(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, A: AnyArena<T>> ExactSizeIterator for PreOrder<'a, T, A> {}

/// Post-order iterator.
///
/// A node may be emitted only after both subtrees. `last` remembers the most
/// recently emitted slot so that, on the way back up, the walk can tell
/// "right subtree finished" apart from "right subtree not started yet".
///
/// ```text
/// loop:
///     while curr != NONE: push curr; curr = left[curr]
///     top = peek()           // None -> done
///     if right[top] != NONE and right[top] != last:
///         curr = right[top]; continue
///     last = pop(); yield elements[last]
/// ```
pub struct PostOrder<'a, T, A: AnyArena<T>> {
    arena: &'a A,
    stack: Vec<A::Index>,
    curr: A::Index,
    last: A::Index,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, A: AnyArena<T>> PostOrder<'a, T, A> {
    pub(crate) fn new(arena: &'a A, root: A::Index) -> Self {
        Self {
            arena,
            stack: Vec::with_capacity(arena.len()),
            curr: root,
            last: <A::Index as IndexType>::NONE,
            remaining: arena.len(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, A: AnyArena<T>> Iterator for PostOrder<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let arena = self.arena;
        loop {
            while self.curr.is_some() {
                self.stack.push(self.curr);
                self.curr = arena.left(self.curr);
            }
            let top = *self.stack.last()?;
            let right = arena.right(top);
            if right.is_some() && right != self.last {
                self.curr = right;
                continue;
            }
            self.stack.pop();
            self.last = top;
            self.remaining -= 1;
            return Some(arena.element(top));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, A: AnyArena<T>> ExactSizeIterator for PostOrder<'a, T, A> {}

/// Level-order (breadth-first) iterator backed by an index queue.
pub struct LevelOrder<'a, T, A: AnyArena<T>> {
    arena: &'a A,
    queue: VecDeque<A::Index>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, A: AnyArena<T>> LevelOrder<'a, T, A> {
    pub(crate) fn new(arena: &'a A, root: A::Index) -> Self {
        let mut queue = VecDeque::with_capacity(arena.len());
        if root.is_some() {
            queue.push_back(root);
        }
        Self {
            arena,
            queue,
            remaining: arena.len(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, A: AnyArena<T>> Iterator for LevelOrder<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let arena = self.arena;
        let idx = self.queue.pop_front()?;
        let (left, right) = (arena.left(idx), arena.right(idx));
        if left.is_some() {
            self.queue.push_back(left);
        }
        if right.is_some() {
            self.queue.push_back(right);
        }
        self.remaining -= 1;
        Some(arena.element(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, A: AnyArena<T>> ExactSizeIterator for LevelOrder<'a, T, A> {}
