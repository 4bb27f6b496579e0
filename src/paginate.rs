// Copyright © 2024 SitemapFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Pagination Module
//!
//! Deterministic partitioning of an ordered entry list into fixed-size
//! shards. Each entry's 0-based position divided by the shard size selects
//! its shard, so every shard except possibly the last holds exactly
//! `max_per_shard` entries. Shards are addressed 1-based externally.

use crate::entry::SitemapEntry;

/// Splits an ordered entry list into shards of at most `max_per_shard`
/// entries, preserving order within and across shards.
///
/// An empty input yields zero shards. A zero shard size is clamped to one;
/// configuration validation rejects it before generation ever gets here.
pub fn paginate(
    entries: Vec<SitemapEntry>,
    max_per_shard: usize,
) -> Vec<Vec<SitemapEntry>> {
    let max_per_shard = max_per_shard.max(1);
    let mut shards: Vec<Vec<SitemapEntry>> = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        if index / max_per_shard == shards.len() {
            shards.push(Vec::with_capacity(max_per_shard));
        }
        if let Some(shard) = shards.last_mut() {
            shard.push(entry);
        }
    }

    shards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::UpdateFrequency;
    use chrono::Utc;

    fn entries(count: usize) -> Vec<SitemapEntry> {
        (0..count)
            .map(|i| {
                SitemapEntry::new(
                    format!("https://www.example.com/page-{}", i),
                    Vec::new(),
                    UpdateFrequency::Weekly,
                    Utc::now(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_shards() {
        assert!(paginate(Vec::new(), 50).is_empty());
    }

    #[test]
    fn test_exact_multiple_fills_every_shard() {
        let shards = paginate(entries(100), 50);
        assert_eq!(shards.len(), 2);
        assert!(shards.iter().all(|shard| shard.len() == 50));
    }

    #[test]
    fn test_remainder_goes_into_last_shard() {
        let shards = paginate(entries(120), 50);
        assert_eq!(shards.len(), 3);
        assert_eq!(shards[0].len(), 50);
        assert_eq!(shards[1].len(), 50);
        assert_eq!(shards[2].len(), 20);
    }

    #[test]
    fn test_partition_preserves_order() {
        let original = entries(73);
        let shards = paginate(original.clone(), 10);

        let rejoined: Vec<SitemapEntry> =
            shards.into_iter().flatten().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_every_shard_but_last_is_full() {
        for (count, max) in [(1, 1), (7, 3), (50, 50), (51, 50)] {
            let shards = paginate(entries(count), max);
            for shard in shards.iter().take(shards.len() - 1) {
                assert_eq!(shard.len(), max);
            }
            assert!(shards.last().unwrap().len() <= max);
        }
    }

    #[test]
    fn test_zero_shard_size_is_clamped() {
        let shards = paginate(entries(3), 0);
        assert_eq!(shards.len(), 3);
    }
}
