use std::iter::Rev;
use std::ops::Deref;
use std::ops::DerefMut;
use std::vec::Drain;

use crate::pumpkin_assert_simple;

#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th checkpoint ends (exclusive) on the trail
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

// We explicitly implement the Default and not as a macro, because we want to avoid imposing Default
// on the generic type T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: Default::default(),
            trail_delimiter: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// The position on the trail of the first element pushed at the current checkpoint.
    pub(crate) fn checkpoint_start(&self) -> usize {
        self.trail_delimiter.last().copied().unwrap_or(0)
    }

    /// Removes every element which was pushed after `new_checkpoint` was the current checkpoint.
    ///
    /// The removed elements are given in the reverse order of insertion.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        pumpkin_assert_simple!(new_checkpoint < self.current_checkpoint);

        let new_trail_len = self.trail_delimiter[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }

    /// Pops the last element without any checks; it should only be used to undo a push made at the
    /// current checkpoint.
    pub(crate) fn pop(&mut self) -> Option<T> {
        pumpkin_assert_simple!(self.trail.len() > self.checkpoint_start());
        self.trail.pop()
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

impl<T> DerefMut for Trail<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.trail
    }
}
