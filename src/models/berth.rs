//! Berth availability tracking.
//!
//! A berth pool answers one question: which berth frees up first?
//! Ties always go to the lowest berth index, so both implementations
//! produce the same assignments for the same input.
//!
//! | Pool | `earliest_berth` | `mark_busy` |
//! |------|------------------|-------------|
//! | [`BerthTracker`] | O(b) scan | O(1) |
//! | [`BerthQueue`] | O(1) peek | O(log b) |

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A berth and the moment it next becomes free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BerthState {
    /// 0-based berth index, stable for the run.
    pub index: usize,
    /// Next free time.
    pub free_at: NaiveDateTime,
}

impl BerthState {
    /// Creates a berth free at `free_at`.
    pub fn new(index: usize, free_at: NaiveDateTime) -> Self {
        Self { index, free_at }
    }

    /// Display label, 1-based (`"Berth 1"` for index 0).
    pub fn label(&self) -> String {
        berth_label(self.index)
    }
}

/// Display label for a 0-based berth index.
pub fn berth_label(index: usize) -> String {
    format!("Berth {}", index + 1)
}

/// Earliest-free berth selection.
///
/// Implementations are local to one scheduling run and never shared.
pub trait BerthPool {
    /// Number of berths.
    fn len(&self) -> usize;

    /// Whether the pool has no berths.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Berth with the minimum `free_at`; lowest index on ties.
    ///
    /// Returns `None` only for an empty pool.
    fn earliest_berth(&self) -> Option<BerthState>;

    /// Sets the free time of berth `index`.
    ///
    /// Out-of-range indices are ignored.
    fn mark_busy(&mut self, index: usize, until: NaiveDateTime);

    /// Current state of berth `index`.
    fn berth(&self, index: usize) -> Option<BerthState>;
}

/// Linear-scan berth pool.
#[derive(Debug, Clone)]
pub struct BerthTracker {
    berths: Vec<BerthState>,
}

impl BerthTracker {
    /// Creates `count` berths, all free at `baseline`.
    pub fn new(count: usize, baseline: NaiveDateTime) -> Self {
        Self {
            berths: (0..count).map(|i| BerthState::new(i, baseline)).collect(),
        }
    }

    /// All berth states in index order.
    pub fn berths(&self) -> &[BerthState] {
        &self.berths
    }
}

impl BerthPool for BerthTracker {
    fn len(&self) -> usize {
        self.berths.len()
    }

    fn earliest_berth(&self) -> Option<BerthState> {
        // `min_by_key` returns the first of several equal minima.
        self.berths.iter().min_by_key(|b| b.free_at).copied()
    }

    fn mark_busy(&mut self, index: usize, until: NaiveDateTime) {
        if let Some(berth) = self.berths.get_mut(index) {
            berth.free_at = until;
        }
    }

    fn berth(&self, index: usize) -> Option<BerthState> {
        self.berths.get(index).copied()
    }
}

/// Heap-backed berth pool keyed by `(free_at, index)`.
///
/// The index is part of the key, so equal free times resolve to the
/// lowest index exactly like [`BerthTracker`].
#[derive(Debug, Clone)]
pub struct BerthQueue {
    heap: BinaryHeap<Reverse<(NaiveDateTime, usize)>>,
    free_at: Vec<NaiveDateTime>,
}

impl BerthQueue {
    /// Creates `count` berths, all free at `baseline`.
    pub fn new(count: usize, baseline: NaiveDateTime) -> Self {
        Self {
            heap: (0..count).map(|i| Reverse((baseline, i))).collect(),
            free_at: vec![baseline; count],
        }
    }
}

impl BerthPool for BerthQueue {
    fn len(&self) -> usize {
        self.free_at.len()
    }

    fn earliest_berth(&self) -> Option<BerthState> {
        self.heap
            .peek()
            .map(|Reverse((free_at, index))| BerthState::new(*index, *free_at))
    }

    fn mark_busy(&mut self, index: usize, until: NaiveDateTime) {
        let Some(slot) = self.free_at.get_mut(index) else {
            return;
        };
        let old = *slot;
        *slot = until;

        // Fast path: the scheduler always updates the berth it just peeked.
        if self.heap.peek() == Some(&Reverse((old, index))) {
            self.heap.pop();
        } else {
            self.heap.retain(|Reverse((_, i))| *i != index);
        }
        self.heap.push(Reverse((until, index)));
    }

    fn berth(&self, index: usize) -> Option<BerthState> {
        self.free_at
            .get(index)
            .map(|free_at| BerthState::new(index, *free_at))
    }
}
