use chrono::{DateTime, Utc};
use pcl_types::Record;

use crate::block::{compute_digest, Block, BlockData};

/// Produces the next block of a chain.
pub struct ChainBuilder;

impl ChainBuilder {
    /// Build the block that would follow `tail`.
    ///
    /// The timestamp is clamped to the tail's, so timestamps never decrease
    /// along the chain even if the wall clock steps backwards.
    pub fn next_block(tail: Option<&Block>, record: Record, now: DateTime<Utc>) -> Block {
        let previous_digest = tail.map(|b| b.digest);
        let index = tail.map_or(1, |b| b.index + 1);
        let timestamp = match tail {
            Some(prev) if prev.timestamp > now => prev.timestamp,
            _ => now,
        };
        let digest = compute_digest(&record, previous_digest.as_ref());

        Block {
            index,
            timestamp,
            data: BlockData { product: record },
            previous_digest,
            digest,
        }
    }

    /// Build the next block and push it onto `blocks`. The record must
    /// already have passed validation against `blocks`.
    ///
    /// # Panics
    ///
    /// If the tail's index is out of step with the length of `blocks`.
    pub fn append(blocks: &mut Vec<Block>, record: Record, now: DateTime<Utc>) -> Block {
        assert!(
            blocks.last().map_or(true, |b| b.index == blocks.len() as u64),
            "tail index out of step with ledger length"
        );
        let block = Self::next_block(blocks.last(), record, now);
        blocks.push(block.clone());
        block
    }
}
