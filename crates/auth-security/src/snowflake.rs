//! Snowflake-style session ids
//!
//! Layout, most significant bit first:
//!
//! ```text
//! | 1 bit zero | 41 bits ms since EPOCH_MS | 10 bits node | 12 bits sequence |
//! ```
//!
//! The last issued `(millisecond, sequence)` pair lives in one `AtomicU64`
//! and is advanced with compare-and-swap, so concurrent request handlers
//! never block on each other. When a millisecond's 4096 sequence numbers
//! are used up, or the wall clock steps backwards, the generator keeps
//! counting forward from the last issued millisecond instead of waiting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// 2020-01-01T00:00:00Z
pub const EPOCH_MS: u64 = 1_577_836_800_000;

const NODE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_NODE_ID: u16 = (1 << NODE_BITS) - 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnowflakeError {
    #[error("Node id {0} out of range (max 1023)")]
    NodeOutOfRange(u16),
}

#[derive(Debug)]
pub struct SnowflakeGenerator {
    node: u64,
    /// `(ms << SEQUENCE_BITS) | sequence` of the last id handed out.
    state: AtomicU64,
}

impl SnowflakeGenerator {
    pub fn new(node_id: u16) -> Result<Self, SnowflakeError> {
        if node_id > MAX_NODE_ID {
            return Err(SnowflakeError::NodeOutOfRange(node_id));
        }
        Ok(Self {
            node: u64::from(node_id),
            state: AtomicU64::new(0),
        })
    }

    pub fn generate(&self) -> i64 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let now = elapsed_ms();
            let last_ms = current >> SEQUENCE_BITS;
            let next = if now > last_ms {
                now << SEQUENCE_BITS
            } else if current & SEQUENCE_MASK < SEQUENCE_MASK {
                current + 1
            } else {
                (last_ms + 1) << SEQUENCE_BITS
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return self.compose(next),
                Err(actual) => current = actual,
            }
        }
    }

    fn compose(&self, state: u64) -> i64 {
        let ms = state >> SEQUENCE_BITS;
        let sequence = state & SEQUENCE_MASK;
        ((ms << (NODE_BITS + SEQUENCE_BITS)) | (self.node << SEQUENCE_BITS) | sequence) as i64
    }
}

fn elapsed_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
        .saturating_sub(EPOCH_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn node_of(id: i64) -> u16 {
        ((id as u64 >> SEQUENCE_BITS) & u64::from(MAX_NODE_ID)) as u16
    }

    #[test]
    fn test_rejects_node_out_of_range() {
        assert_eq!(
            SnowflakeGenerator::new(1024).unwrap_err(),
            SnowflakeError::NodeOutOfRange(1024)
        );
        assert!(SnowflakeGenerator::new(MAX_NODE_ID).is_ok());
    }

    #[test]
    fn test_ids_increase_and_carry_node() {
        let generator = SnowflakeGenerator::new(42).unwrap();
        let mut last = 0;
        for _ in 0..10_000 {
            let id = generator.generate();
            assert!(id > last, "ids must be strictly increasing");
            assert_eq!(node_of(id), 42);
            last = id;
        }
    }

    #[test]
    fn test_unique_across_threads() {
        let generator = Arc::new(SnowflakeGenerator::new(7).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..5_000).map(|_| generator.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 40_000);
    }
}
