//! Stack-allocated singly linked list that recycles vacated slots.
//!
//! # Implementation details
//! - **Struct-of-Arrays (SoA)**: `slots` holds the values and `nexts` the
//!   successor links, both indexed by slot.
//! - **Empty stack**: a removed slot is pushed onto a singly linked stack
//!   threaded through the same `nexts` array that carries live links.
//! - **Fresh tail**: slots at `fresh..N` have never been used. A new value
//!   takes a recycled slot when one exists and only then grows `fresh`.

use core::fmt;
use core::mem::MaybeUninit;

use tracing::trace;

use crate::IndexType;
use crate::error::{Error, Result};

/// A **stack-allocated** singly linked list holding at most `N` values.
///
/// Unlike [`IntrinsicTree`](crate::IntrinsicTree), slots are not kept dense:
/// removing a value leaves a hole that is remembered on the empty stack and
/// handed out again by the next insertion.
///
/// # Slot allocation
/// ```text
/// alloc(value):
///     if empty_head != NONE:          // recycle
///         idx = empty_head
///         empty_head = nexts[idx]
///     else if fresh < N:              // grow into the untouched tail
///         idx = fresh; fresh += 1
///     else:
///         return Err(full)
///     slots[idx] = value; nexts[idx] = NONE
///
/// free(idx):
///     value = slots[idx]
///     nexts[idx] = empty_head
///     empty_head = idx
/// ```
pub struct HeaplessStraightList<T, const N: usize, I: IndexType = u16> {
    slots: [MaybeUninit<T>; N],
    nexts: [I; N],
    head: I,
    tail: I,
    empty_head: I,
    fresh: I,
    len: I,
}

impl<T, const N: usize, I: IndexType> HeaplessStraightList<T, N, I> {
    /// Creates an empty list. No allocation occurs.
    pub fn new() -> Self {
        const {
            assert!(
                N <= I::LIMIT,
                "HeaplessStraightList capacity N does not fit the index type; widen I"
            );
        }
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            nexts: [I::NONE; N],
            head: I::NONE,
            tail: I::NONE,
            empty_head: I::NONE,
            fresh: I::ZERO,
            len: I::ZERO,
        }
    }

    /// Returns the number of values in the list.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len.as_usize()
    }

    /// Returns `true` if the list holds no values.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len.is_zero()
    }

    /// Returns `true` if no slot is left, neither recycled nor fresh.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len.as_usize() >= N
    }

    /// Maximum number of values.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of slots touched since creation or the last [`clear`](Self::clear).
    pub fn high_water_mark(&self) -> usize {
        self.fresh.as_usize()
    }

    /// Prepends `value`.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] if the list is full.
    pub fn push_front(&mut self, value: T) -> Result<()> {
        let idx = self.alloc(value)?;
        self.nexts[idx.as_usize()] = self.head;
        self.head = idx;
        if self.tail.is_none() {
            self.tail = idx;
        }
        self.len = self.len.inc();
        Ok(())
    }

    /// Appends `value`.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] if the list is full.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        let idx = self.alloc(value)?;
        if self.tail.is_some() {
            self.nexts[self.tail.as_usize()] = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
        self.len = self.len.inc();
        Ok(())
    }

    /// Inserts `value` so that it ends up at position `pos`.
    ///
    /// # Errors
    /// [`Error::IndexOutOfBounds`] if `pos > len`, [`Error::CapacityExceeded`]
    /// if the list is full.
    pub fn insert(&mut self, pos: usize, value: T) -> Result<()> {
        let len = self.len();
        if pos > len {
            return Err(Error::IndexOutOfBounds { index: pos, len });
        }
        if pos == 0 {
            return self.push_front(value);
        }
        if pos == len {
            return self.push_back(value);
        }
        let prev = self.slot_at(pos - 1);
        let idx = self.alloc(value)?;
        self.nexts[idx.as_usize()] = self.nexts[prev.as_usize()];
        self.nexts[prev.as_usize()] = idx;
        self.len = self.len.inc();
        Ok(())
    }

    /// Removes and returns the first value.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_none() {
            return None;
        }
        let idx = self.head;
        self.head = self.nexts[idx.as_usize()];
        if self.head.is_none() {
            self.tail = I::NONE;
        }
        self.len = self.len.dec();
        Some(self.free(idx))
    }

    /// Removes and returns the value at position `pos`.
    ///
    /// # Errors
    /// [`Error::IndexOutOfBounds`] if `pos >= len`.
    pub fn remove(&mut self, pos: usize) -> Result<T> {
        let len = self.len();
        if pos >= len {
            return Err(Error::IndexOutOfBounds { index: pos, len });
        }
        if pos == 0 {
            return self.pop_front().ok_or(Error::Empty);
        }
        let prev = self.slot_at(pos - 1);
        let idx = self.nexts[prev.as_usize()];
        self.nexts[prev.as_usize()] = self.nexts[idx.as_usize()];
        if idx == self.tail {
            self.tail = prev;
        }
        self.len = self.len.dec();
        Ok(self.free(idx))
    }

    /// Returns a reference to the first value.
    pub fn front(&self) -> Option<&T> {
        if self.head.is_none() {
            return None;
        }
        Some(unsafe { self.slots[self.head.as_usize()].assume_init_ref() })
    }

    /// Returns a reference to the last value.
    pub fn back(&self) -> Option<&T> {
        if self.tail.is_none() {
            return None;
        }
        Some(unsafe { self.slots[self.tail.as_usize()].assume_init_ref() })
    }

    /// Returns a reference to the value at position `pos`.
    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos >= self.len() {
            return None;
        }
        let idx = self.slot_at(pos);
        Some(unsafe { self.slots[idx.as_usize()].assume_init_ref() })
    }

    /// Returns a mutable reference to the value at position `pos`.
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        if pos >= self.len() {
            return None;
        }
        let idx = self.slot_at(pos);
        Some(unsafe { self.slots[idx.as_usize()].assume_init_mut() })
    }

    /// Returns `true` if the list contains a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Appends every value of `iter`, stopping at the first one that does not
    /// fit.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] once the list is full; values appended
    /// before that point stay in the list.
    pub fn try_extend<It>(&mut self, iter: It) -> Result<()>
    where
        It: IntoIterator<Item = T>,
    {
        for value in iter {
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Returns a front-to-back iterator.
    pub fn iter(&self) -> Iter<'_, T, N, I> {
        Iter {
            list: self,
            curr: self.head,
            remaining: self.len(),
        }
    }

    /// Drops every value and forgets all recycled slots.
    ///
    /// If a value's `Drop` panics, the values after it are leaked and the
    /// list is left empty.
    pub fn clear(&mut self) {
        self.drop_live();
    }

    fn alloc(&mut self, value: T) -> Result<I> {
        let idx = if self.empty_head.is_some() {
            let idx = self.empty_head;
            self.empty_head = self.nexts[idx.as_usize()];
            trace!(?idx, "recycled straight list slot");
            idx
        } else if self.fresh.as_usize() < N {
            let idx = self.fresh;
            self.fresh = self.fresh.inc();
            idx
        } else {
            return Err(Error::CapacityExceeded { capacity: N });
        };
        self.slots[idx.as_usize()].write(value);
        self.nexts[idx.as_usize()] = I::NONE;
        Ok(idx)
    }

    /// Moves the value out of the already unlinked slot `idx` and pushes the
    /// slot onto the empty stack.
    fn free(&mut self, idx: I) -> T {
        let value = unsafe { self.slots[idx.as_usize()].assume_init_read() };
        self.nexts[idx.as_usize()] = self.empty_head;
        self.empty_head = idx;
        value
    }

    /// Slot holding position `pos`; `pos` must be below `len`.
    fn slot_at(&self, pos: usize) -> I {
        let mut idx = self.head;
        for _ in 0..pos {
            idx = self.nexts[idx.as_usize()];
        }
        idx
    }

    /// Detaches every live slot before dropping it, so unwinding out of a
    /// value's `Drop` never reaches an already dropped slot.
    fn drop_live(&mut self) {
        let mut curr = core::mem::replace(&mut self.head, I::NONE);
        self.tail = I::NONE;
        self.empty_head = I::NONE;
        self.fresh = I::ZERO;
        self.len = I::ZERO;
        while curr.is_some() {
            let idx = curr.as_usize();
            curr = self.nexts[idx];
            unsafe { self.slots[idx].assume_init_drop() };
        }
    }
}

impl<T, const N: usize, I: IndexType> Default for HeaplessStraightList<T, N, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, I: IndexType> Drop for HeaplessStraightList<T, N, I> {
    fn drop(&mut self) {
        self.drop_live();
    }
}

impl<T: Clone, const N: usize, I: IndexType> Clone for HeaplessStraightList<T, N, I> {
    fn clone(&self) -> Self {
        let mut out = Self::new();
        for value in self.iter() {
            // Same capacity, at most `N` values: never full.
            let pushed = out.push_back(value.clone());
            debug_assert!(pushed.is_ok());
        }
        out
    }
}

impl<T: fmt::Debug, const N: usize, I: IndexType> fmt::Debug for HeaplessStraightList<T, N, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const N: usize, I: IndexType, const M: usize, J: IndexType>
    PartialEq<HeaplessStraightList<T, M, J>> for HeaplessStraightList<T, N, I>
{
    fn eq(&self, other: &HeaplessStraightList<T, M, J>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<'a, T, const N: usize, I: IndexType> IntoIterator for &'a HeaplessStraightList<T, N, I> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Front-to-back iterator over a [`HeaplessStraightList`].
pub struct Iter<'a, T, const N: usize, I: IndexType> {
    list: &'a HeaplessStraightList<T, N, I>,
    curr: I,
    remaining: usize,
}

impl<'a, T, const N: usize, I: IndexType> Iterator for Iter<'a, T, N, I> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.curr.is_none() {
            return None;
        }
        let idx = self.curr.as_usize();
        let list = self.list;
        self.curr = list.nexts[idx];
        self.remaining -= 1;
        Some(unsafe { list.slots[idx].assume_init_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, const N: usize, I: IndexType> ExactSizeIterator for Iter<'a, T, N, I> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<const N: usize, I: IndexType>(list: &HeaplessStraightList<i32, N, I>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_push_front_and_back() {
        let mut list: HeaplessStraightList<i32, 4> = HeaplessStraightList::new();
        list.push_back(2).unwrap();
        list.push_front(1).unwrap();
        list.push_back(3).unwrap();
        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_full_list_rejects() {
        let mut list: HeaplessStraightList<i32, 2, u8> = HeaplessStraightList::new();
        list.push_back(1).unwrap();
        list.push_back(2).unwrap();
        assert!(list.is_full());
        assert_eq!(
            list.push_back(3),
            Err(Error::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(
            list.insert(1, 3),
            Err(Error::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(collect(&list), vec![1, 2]);
    }

    #[test]
    fn test_vacated_slots_are_recycled_before_fresh_ones() {
        let mut list: HeaplessStraightList<i32, 8> = HeaplessStraightList::new();
        list.try_extend([10, 20, 30]).unwrap();
        assert_eq!(list.high_water_mark(), 3);

        assert_eq!(list.remove(1), Ok(20));
        assert_eq!(list.pop_front(), Some(10));
        list.push_back(40).unwrap();
        list.push_back(50).unwrap();
        // Both new values reused freed slots.
        assert_eq!(list.high_water_mark(), 3);
        assert_eq!(collect(&list), vec![30, 40, 50]);

        list.push_back(60).unwrap();
        assert_eq!(list.high_water_mark(), 4);
    }

    #[test]
    fn test_fills_to_capacity_after_churn() {
        let mut list: HeaplessStraightList<i32, 3, u8> = HeaplessStraightList::new();
        for round in 0..5 {
            list.try_extend([round, round + 1, round + 2]).unwrap();
            assert!(list.is_full());
            while list.pop_front().is_some() {}
        }
        assert_eq!(list.high_water_mark(), 3);
    }

    #[test]
    fn test_insert_and_remove_positions() {
        let mut list: HeaplessStraightList<i32, 8> = HeaplessStraightList::new();
        list.insert(0, 1).unwrap();
        list.insert(1, 3).unwrap();
        list.insert(1, 2).unwrap();
        list.insert(3, 4).unwrap();
        assert_eq!(collect(&list), vec![1, 2, 3, 4]);
        assert_eq!(
            list.insert(9, 0),
            Err(Error::IndexOutOfBounds { index: 9, len: 4 })
        );

        assert_eq!(list.remove(3), Ok(4));
        assert_eq!(list.back(), Some(&3));
        list.push_back(5).unwrap();
        assert_eq!(collect(&list), vec![1, 2, 3, 5]);
        assert_eq!(
            list.remove(4),
            Err(Error::IndexOutOfBounds { index: 4, len: 4 })
        );
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut list: HeaplessStraightList<i32, 4> = HeaplessStraightList::new();
        list.try_extend([1, 2, 3]).unwrap();
        assert_eq!(list.get(2), Some(&3));
        assert_eq!(list.get(3), None);
        *list.get_mut(1).unwrap() = 20;
        assert_eq!(collect(&list), vec![1, 20, 3]);
        assert!(list.contains(&20));
        assert!(!list.contains(&2));
    }

    #[test]
    fn test_pop_until_empty() {
        let mut list: HeaplessStraightList<i32, 4> = HeaplessStraightList::new();
        list.try_extend([1, 2]).unwrap();
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        list.push_front(7).unwrap();
        assert_eq!(list.back(), Some(&7));
    }

    #[test]
    fn test_clear_resets_empty_stack() {
        let mut list: HeaplessStraightList<String, 4> = HeaplessStraightList::new();
        list.push_back("a".into()).unwrap();
        list.push_back("b".into()).unwrap();
        list.pop_front();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.high_water_mark(), 0);
        list.push_back("c".into()).unwrap();
        assert_eq!(list.front().map(String::as_str), Some("c"));
    }

    #[test]
    fn test_drop_only_live_values() {
        use std::rc::Rc;
        let marker = Rc::new(());
        {
            let mut list: HeaplessStraightList<Rc<()>, 4> = HeaplessStraightList::new();
            for _ in 0..3 {
                list.push_back(Rc::clone(&marker)).unwrap();
            }
            drop(list.remove(1).unwrap());
            assert_eq!(Rc::strong_count(&marker), 3);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn test_clear_survives_panicking_drop() {
        use std::cell::Cell;
        use std::panic::{AssertUnwindSafe, catch_unwind};
        use std::rc::Rc;

        struct Noisy {
            panics: bool,
            drops: Rc<Cell<usize>>,
        }

        impl Drop for Noisy {
            fn drop(&mut self) {
                self.drops.set(self.drops.get() + 1);
                if self.panics {
                    panic!("drop failed");
                }
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut list: HeaplessStraightList<Noisy, 4> = HeaplessStraightList::new();
        for panics in [false, true, false] {
            list.push_back(Noisy {
                panics,
                drops: Rc::clone(&drops),
            })
            .unwrap();
        }

        let result = catch_unwind(AssertUnwindSafe(|| list.clear()));
        assert!(result.is_err());
        // The value after the panicking one is leaked, never dropped twice.
        assert_eq!(drops.get(), 2);
        assert!(list.is_empty());
        assert_eq!(list.high_water_mark(), 0);

        drop(list);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_clone_and_eq() {
        let mut list: HeaplessStraightList<i32, 4> = HeaplessStraightList::new();
        list.try_extend([1, 2, 3]).unwrap();
        list.remove(0).unwrap();
        let cloned = list.clone();
        assert_eq!(cloned, list);
        assert_eq!(format!("{cloned:?}"), "[2, 3]");

        let mut other: HeaplessStraightList<i32, 8, u8> = HeaplessStraightList::new();
        other.try_extend([2, 3]).unwrap();
        assert_eq!(list, other);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::VecDeque;

        #[derive(Debug, Clone)]
        enum Op {
            PushFront(i32),
            PushBack(i32),
            Insert(usize, i32),
            PopFront,
            Remove(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<i32>().prop_map(Op::PushFront),
                any::<i32>().prop_map(Op::PushBack),
                (0usize..20, any::<i32>()).prop_map(|(p, v)| Op::Insert(p, v)),
                Just(Op::PopFront),
                (0usize..20).prop_map(Op::Remove),
            ]
        }

        proptest! {
            #[test]
            fn prop_list_matches_vecdeque(ops in prop::collection::vec(op(), 1..150)) {
                let mut list: HeaplessStraightList<i32, 16, u8> = HeaplessStraightList::new();
                let mut model: VecDeque<i32> = VecDeque::new();

                for op in ops {
                    let full = model.len() == 16;
                    match op {
                        Op::PushFront(v) => {
                            prop_assert_eq!(list.push_front(v).is_ok(), !full);
                            if !full { model.push_front(v); }
                        }
                        Op::PushBack(v) => {
                            prop_assert_eq!(list.push_back(v).is_ok(), !full);
                            if !full { model.push_back(v); }
                        }
                        Op::Insert(p, v) => {
                            let res = list.insert(p, v);
                            if p > model.len() {
                                prop_assert_eq!(res, Err(Error::IndexOutOfBounds { index: p, len: model.len() }));
                            } else if full {
                                prop_assert_eq!(res, Err(Error::CapacityExceeded { capacity: 16 }));
                            } else {
                                prop_assert!(res.is_ok());
                                model.insert(p, v);
                            }
                        }
                        Op::PopFront => prop_assert_eq!(list.pop_front(), model.pop_front()),
                        Op::Remove(p) => {
                            let res = list.remove(p);
                            match model.remove(p) {
                                Some(v) => prop_assert_eq!(res, Ok(v)),
                                None => prop_assert_eq!(res, Err(Error::IndexOutOfBounds { index: p, len: model.len() })),
                            }
                        }
                    }
                    prop_assert_eq!(list.len(), model.len());
                    prop_assert!(list.high_water_mark() <= 16);
                    prop_assert!(list.iter().eq(model.iter()));
                    prop_assert_eq!(list.back(), model.back());
                }
            }
        }
    }
}
