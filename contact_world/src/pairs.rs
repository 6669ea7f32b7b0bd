// Copyright 2025 the Contact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pair state: which collider pairs overlapped last step.
//!
//! Overlaps found during a step are recorded into the `current` buffer in
//! ascending key order (the scan visits `i < j` pairs row by row). Enter and
//! exit transitions are the two set differences between `current` and
//! `previous`, computed by a merge walk over the sorted buffers. At the end
//! of the step the buffers swap, so no allocation happens once both have
//! grown to the peak overlap count.

use alloc::vec::Vec;

use crate::types::ColliderId;

/// Order-independent key for an unordered collider pair.
///
/// The lower id occupies the high 32 bits, so sorting keys sorts pairs by
/// their lower id first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(u64);

impl PairKey {
    /// Key for the pair `{a, b}`; `new(a, b) == new(b, a)`.
    #[inline]
    pub fn new(a: ColliderId, b: ColliderId) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self((u64::from(lo.raw()) << 32) | u64::from(hi.raw()))
    }

    /// The two ids, lower first.
    #[inline]
    pub fn ids(self) -> (ColliderId, ColliderId) {
        #[allow(clippy::cast_possible_truncation, reason = "each half holds a u32")]
        let (lo, hi) = ((self.0 >> 32) as u32, self.0 as u32);
        (ColliderId::from_raw(lo), ColliderId::from_raw(hi))
    }

    /// Whether `id` is one of the pair.
    #[inline]
    pub fn involves(self, id: ColliderId) -> bool {
        let (lo, hi) = self.ids();
        lo == id || hi == id
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PairTracker {
    previous: Vec<PairKey>,
    current: Vec<PairKey>,
}

impl PairTracker {
    /// Record an overlap found this step.
    ///
    /// Keys must arrive in ascending order.
    #[inline]
    pub(crate) fn record(&mut self, key: PairKey) {
        debug_assert!(
            self.current.last().is_none_or(|last| *last < key),
            "pairs recorded out of order"
        );
        self.current.push(key);
    }

    /// Pairs overlapping now that were not overlapping last step.
    pub(crate) fn entered(&self) -> Difference<'_> {
        Difference::new(&self.current, &self.previous)
    }

    /// Pairs overlapping last step that are not overlapping now.
    pub(crate) fn exited(&self) -> Difference<'_> {
        Difference::new(&self.previous, &self.current)
    }

    /// Make this step's overlaps the baseline for the next step.
    pub(crate) fn finish_step(&mut self) {
        core::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
    }

    /// Forget every pair involving `id`, appending the dropped keys to `out`
    /// in ascending order.
    pub(crate) fn drain_involving(&mut self, id: ColliderId, out: &mut Vec<PairKey>) {
        self.previous.retain(|&key| {
            if key.involves(id) {
                out.push(key);
                false
            } else {
                true
            }
        });
    }

    pub(crate) fn contains(&self, key: PairKey) -> bool {
        self.previous.binary_search(&key).is_ok()
    }

    /// Number of pairs overlapping as of the last step.
    pub(crate) fn len(&self) -> usize {
        self.previous.len()
    }

    pub(crate) fn clear(&mut self) {
        self.previous.clear();
        self.current.clear();
    }
}

/// Keys of one sorted slice that are absent from another.
#[derive(Clone, Debug)]
pub(crate) struct Difference<'a> {
    keep: &'a [PairKey],
    drop: &'a [PairKey],
}

impl<'a> Difference<'a> {
    fn new(keep: &'a [PairKey], drop: &'a [PairKey]) -> Self {
        Self { keep, drop }
    }
}

impl Iterator for Difference<'_> {
    type Item = PairKey;

    fn next(&mut self) -> Option<PairKey> {
        while let Some((&k, rest)) = self.keep.split_first() {
            // Skip everything in `drop` below `k`.
            while let Some((&d, tail)) = self.drop.split_first() {
                if d < k {
                    self.drop = tail;
                } else {
                    break;
                }
            }
            self.keep = rest;
            match self.drop.first() {
                Some(&d) if d == k => self.drop = &self.drop[1..],
                _ => return Some(k),
            }
        }
        None
    }
}
