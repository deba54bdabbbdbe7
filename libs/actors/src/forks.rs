//! Fork Ring
//!
//! One mutually exclusive fork per seat, arranged in a ring so seat `i` sits
//! between forks `i` and `(i + 1) % n`. Acquisition order is decided per seat
//! by parity, which keeps the waits-for graph acyclic.

use std::ops::Deref;
use tokio::sync::{Mutex, MutexGuard};

/// Forks a seat reaches for, in acquisition order
///
/// Even seats take their own fork first, odd seats take their neighbour's
/// first. Adjacent seats therefore approach the fork they share from opposite
/// ends and can never close a cycle of waiting.
pub fn fork_order(seat: usize, philosophers: usize) -> [usize; 2] {
    let own = seat;
    let next = (seat + 1) % philosophers;
    if seat % 2 == 0 {
        [own, next]
    } else {
        [next, own]
    }
}

/// A fork on the table; records who is holding it
#[derive(Debug, Default)]
pub struct Fork {
    holder: Option<usize>,
}

impl Fork {
    pub fn holder(&self) -> Option<usize> {
        self.holder
    }
}

/// Ring of N forks
#[derive(Debug)]
pub struct ForkSet {
    forks: Vec<Mutex<Fork>>,
}

impl ForkSet {
    pub fn new(count: usize) -> Self {
        Self {
            forks: (0..count).map(|_| Mutex::new(Fork::default())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    /// Wait until fork `index` is free and take it on behalf of `seat`
    ///
    /// The fork is put back when the returned guard is dropped.
    ///
    /// # Panics
    /// Panics if `index` is outside the ring.
    pub async fn acquire(&self, index: usize, seat: usize) -> HeldFork<'_> {
        let mut guard = self.forks[index].lock().await;
        debug_assert!(guard.holder.is_none(), "fork {index} already held");
        guard.holder = Some(seat);
        HeldFork { index, guard }
    }

    /// Current holder of fork `index`, if it is free to inspect right now
    pub fn try_holder(&self, index: usize) -> Option<Option<usize>> {
        self.forks[index].try_lock().ok().map(|fork| fork.holder)
    }
}

/// Exclusive hold on one fork
#[derive(Debug)]
pub struct HeldFork<'a> {
    index: usize,
    guard: MutexGuard<'a, Fork>,
}

impl HeldFork<'_> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Deref for HeldFork<'_> {
    type Target = Fork;

    fn deref(&self) -> &Fork {
        &self.guard
    }
}

impl Drop for HeldFork<'_> {
    fn drop(&mut self) {
        self.guard.holder = None;
    }
}
