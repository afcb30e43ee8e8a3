//! Domain identifiers.
//!
//! `CallbackId` は enqueue 時に採番される単調増加のシーケンス番号です。
//! drain は enqueue 順（= id 昇順）で行われるため、id を比べれば
//! 実行順序を検証できます。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number assigned to a callback when it enters the queue.
///
/// Ids are allocated under the queue lock, so for any two entries the one
/// with the smaller id was enqueued first and is drained first.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallbackId(u64);

impl CallbackId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        assert_eq!(CallbackId::new(7).to_string(), "cb-7");
    }

    #[test]
    fn ordering_follows_sequence() {
        assert!(CallbackId::new(1) < CallbackId::new(2));
        assert_eq!(CallbackId::new(3).as_u64(), 3);
    }
}
