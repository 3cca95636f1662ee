//! Tag/site matching table for one channel set.
//!
//! Each `(to, from, tag)` triple names one logical channel. A slot keeps a
//! FIFO of deposited values and a FIFO of waiting receivers so that sender
//! and receiver may arrive in either order:
//!
//! ```text
//! Deposit first:   set ──► queued ──► later get drains the queue
//! Receiver first:  get ──► waiter registered ──► later set fires oneshot
//! ```
//!
//! Single-threaded by design: interior mutability via `RefCell`, completion
//! via `tokio::sync::oneshot`, compatible with the current-thread runtime.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use tokio::sync::oneshot;

/// Address of one logical channel inside a channel set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    /// Receiving site.
    pub to: u32,
    /// Sending site.
    pub from: u32,
    /// Exchange discriminator.
    pub tag: i32,
}

/// Outcome of claiming a value from a slot.
pub(crate) enum Claimed {
    /// A value was already queued.
    Ready(Vec<u8>),
    /// No value yet; resolves when the matching deposit arrives.
    Pending(oneshot::Receiver<Vec<u8>>),
}

#[derive(Debug, Default)]
struct Slot {
    queued: VecDeque<Vec<u8>>,
    waiters: VecDeque<oneshot::Sender<Vec<u8>>>,
}

/// Matching table shared by every handle of one channel set.
#[derive(Debug, Default)]
pub(crate) struct MatchingTable {
    slots: RefCell<HashMap<SlotKey, Slot>>,
}

impl MatchingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Deposit a value: hand it to the oldest live waiter, else queue it.
    ///
    /// Waiters whose receiving side has been dropped are discarded on the
    /// way; the value is never lost to a dead waiter.
    pub(crate) fn deposit(&self, key: SlotKey, mut value: Vec<u8>) {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.entry(key).or_default();
        while let Some(waiter) = slot.waiters.pop_front() {
            match waiter.send(value) {
                Ok(()) => {
                    tracing::trace!(to = key.to, from = key.from, tag = key.tag, "value matched");
                    return;
                }
                // Receiver dropped; reclaim the value and try the next one.
                Err(v) => value = v,
            }
        }
        tracing::trace!(to = key.to, from = key.from, tag = key.tag, "value queued");
        slot.queued.push_back(value);
    }

    /// Claim a value: drain the queue if possible, else register a waiter.
    pub(crate) fn claim(&self, key: SlotKey) -> Claimed {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.entry(key).or_default();
        if let Some(value) = slot.queued.pop_front() {
            return Claimed::Ready(value);
        }
        let (tx, rx) = oneshot::channel();
        slot.waiters.push_back(tx);
        Claimed::Pending(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: SlotKey = SlotKey {
        to: 1,
        from: 0,
        tag: 0,
    };

    #[test]
    fn deposit_then_claim() {
        let table = MatchingTable::new();
        table.deposit(KEY, vec![1, 2, 3]);
        match table.claim(KEY) {
            Claimed::Ready(bytes) => assert_eq!(bytes, vec![1, 2, 3]),
            Claimed::Pending(_) => panic!("value should already be queued"),
        }
    }

    #[test]
    fn claim_then_deposit() {
        let table = MatchingTable::new();
        let mut rx = match table.claim(KEY) {
            Claimed::Pending(rx) => rx,
            Claimed::Ready(_) => panic!("nothing deposited yet"),
        };
        table.deposit(KEY, vec![9]);
        assert_eq!(rx.try_recv().unwrap(), vec![9]);
    }

    #[test]
    fn values_are_fifo_per_slot() {
        let table = MatchingTable::new();
        table.deposit(KEY, vec![1]);
        table.deposit(KEY, vec![2]);
        let first = match table.claim(KEY) {
            Claimed::Ready(bytes) => bytes,
            Claimed::Pending(_) => panic!("first value queued"),
        };
        let second = match table.claim(KEY) {
            Claimed::Ready(bytes) => bytes,
            Claimed::Pending(_) => panic!("second value queued"),
        };
        assert_eq!((first, second), (vec![1], vec![2]));
    }

    #[test]
    fn distinct_tags_do_not_cross_match() {
        let table = MatchingTable::new();
        let other = SlotKey { tag: 1, ..KEY };
        table.deposit(other, vec![7]);
        assert!(matches!(table.claim(KEY), Claimed::Pending(_)));
        assert!(matches!(table.claim(other), Claimed::Ready(v) if v == vec![7]));
    }

    #[test]
    fn dropped_waiter_does_not_eat_value() {
        let table = MatchingTable::new();
        let rx = match table.claim(KEY) {
            Claimed::Pending(rx) => rx,
            Claimed::Ready(_) => panic!("nothing deposited yet"),
        };
        drop(rx);
        table.deposit(KEY, vec![5]);
        assert!(matches!(table.claim(KEY), Claimed::Ready(v) if v == vec![5]));
    }
}
