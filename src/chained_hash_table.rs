use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
};

use log::{debug, trace};

use crate::{Bid, IndexError, KeyStrategy, RemovalPolicy, TableConfig};

/// One link in a bucket's collision chain.
struct Entry {
    /// Index of the bucket holding this entry
    key: usize,
    /// The stored bid
    bid: Bid,
    /// Next entry in the same bucket
    next: Option<Box<Entry>>,
}

impl Entry {
    /// Creates a chain tail for `bid` in bucket `key`
    fn new(key: usize, bid: Bid) -> Self {
        Self { key, bid, next: None }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("bid", &self.bid)
            .finish_non_exhaustive()
    }
}

/// A hash table of bids with separate chaining.
///
/// The table holds a fixed number of buckets chosen at construction and never
/// resizes. Each bucket is either empty or the head of a singly linked chain
/// of entries that hashed to it. New entries go to the tail of their chain, so
/// when the same id is inserted twice the first copy is the one found.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock to share it.
pub struct ChainedHashTable {
    /// The buckets, each the head of a collision chain
    buckets: Box<[Option<Box<Entry>>]>,
    /// Current number of bids in the table
    size: usize,
    /// Bucket count, key strategy and removal policy
    config: TableConfig,
}

impl Default for ChainedHashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChainedHashTable {
    /// Copies every chain front to back, keeping bucket and chain order.
    fn clone(&self) -> Self {
        let mut copy = Self::build(self.config);
        for (head, slot) in self.buckets.iter().zip(copy.buckets.iter_mut()) {
            let mut tail = slot;
            let mut current = head.as_deref();
            while let Some(entry) = current {
                let link = tail.insert(Box::new(Entry::new(entry.key, entry.bid.clone())));
                tail = &mut link.next;
                current = entry.next.as_deref();
            }
        }
        copy.size = self.size;
        copy
    }
}

impl fmt::Debug for ChainedHashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Drop for ChainedHashTable {
    fn drop(&mut self) {
        self.clear();
    }
}

impl ChainedHashTable {
    /// Creates a table with the default configuration (179 buckets, numeric keys)
    #[must_use]
    pub fn new() -> Self {
        Self::build(TableConfig::new())
    }

    /// Creates a table with `table_size` buckets and default settings otherwise
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ZeroTableSize`] when `table_size` is zero.
    pub fn with_capacity(table_size: usize) -> Result<Self, IndexError> {
        Self::with_config(TableConfig::new().with_table_size(table_size))
    }

    /// Creates a table from a full configuration
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ZeroTableSize`] when the configuration has no buckets.
    pub fn with_config(config: TableConfig) -> Result<Self, IndexError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Allocates the empty buckets for an already validated configuration
    fn build(config: TableConfig) -> Self {
        let buckets = std::iter::repeat_with(|| None).take(config.table_size()).collect();
        Self { buckets, size: 0, config }
    }

    /// The configuration this table was built with
    #[must_use]
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Maps a numeric key to its bucket: `key mod table_size`, always
    /// non-negative, so `hash(k) == hash(k + table_size)` for every `k`.
    #[must_use]
    pub fn hash(&self, key: i64) -> usize {
        bucket_for_integer(key, self.buckets.len())
    }

    /// Computes the bucket for a bid id under the configured key strategy
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidKey`] when the strategy is
    /// [`KeyStrategy::StrictNumeric`] and `id` is not an integer.
    pub fn bucket_of(&self, id: &str) -> Result<usize, IndexError> {
        match self.config.key_strategy() {
            KeyStrategy::Numeric => Ok(self.hash(leading_integer(id))),
            KeyStrategy::StrictNumeric => id
                .trim()
                .parse::<i64>()
                .map(|key| self.hash(key))
                .map_err(|_| IndexError::InvalidKey(id.to_string())),
            KeyStrategy::Text => Ok(bucket_for_text(id, self.buckets.len())),
        }
    }

    /// Inserts a bid at the tail of its bucket's chain. Duplicate ids are kept.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidKey`] when the id cannot be hashed under the
    /// configured key strategy. The table is left untouched in that case.
    pub fn insert(&mut self, bid: Bid) -> Result<(), IndexError> {
        let index = self.bucket_of(&bid.id)?;
        let table_size = self.buckets.len();
        let Some(mut cursor) = self.buckets.get_mut(index) else {
            return Err(IndexError::BucketOutOfRange { index, table_size });
        };

        while let Some(entry) = cursor {
            cursor = &mut entry.next;
        }
        trace!("inserting bid {} into bucket {index}", bid.id);
        *cursor = Some(Box::new(Entry::new(index, bid)));
        self.size = self.size.saturating_add(1);

        Ok(())
    }

    /// Looks up a bid by id, returning a reference to the first match
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Bid> {
        let index = self.bucket_of(id).ok()?;
        let mut current = self.buckets.get(index)?.as_deref();

        while let Some(entry) = current {
            if entry.bid.id == id {
                return Some(&entry.bid);
            }
            current = entry.next.as_deref();
        }

        None
    }

    /// Looks up a bid by id and returns a copy of it
    #[must_use]
    pub fn search(&self, id: &str) -> Option<Bid> {
        self.get(id).cloned()
    }

    /// Removes a bid by id according to the configured [`RemovalPolicy`].
    ///
    /// Returns the removed bid with that id, if there was one. Removing an id
    /// that is not stored changes nothing under [`RemovalPolicy::Unlink`].
    pub fn remove(&mut self, id: &str) -> Option<Bid> {
        let index = self.bucket_of(id).ok()?;
        match self.config.removal_policy() {
            RemovalPolicy::Unlink => self.unlink(index, id),
            RemovalPolicy::ClearBucket => self.clear_bucket(index, id),
        }
    }

    /// Unlinks the first entry matching `id` from the chain in bucket `index`
    fn unlink(&mut self, index: usize, id: &str) -> Option<Bid> {
        let mut cursor = self.buckets.get_mut(index)?;

        while cursor.as_ref().is_some_and(|entry| entry.bid.id != id) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let mut removed = cursor.take()?;
        *cursor = removed.next.take();
        self.size = self.size.saturating_sub(1);
        trace!("unlinked bid {id} from bucket {index}");

        Some(removed.bid)
    }

    /// Drops the whole chain in bucket `index`, returning the first bid
    /// matching `id` if the chain held one
    fn clear_bucket(&mut self, index: usize, id: &str) -> Option<Bid> {
        let mut next = self.buckets.get_mut(index)?.take();
        let mut found = None;
        let mut dropped: usize = 0;

        while let Some(mut entry) = next {
            next = entry.next.take();
            dropped = dropped.saturating_add(1);
            if found.is_none() && entry.bid.id == id {
                found = Some(entry.bid);
            }
        }

        self.size = self.size.saturating_sub(dropped);
        debug!("cleared bucket {index} for bid {id}, dropped {dropped} entries");

        found
    }

    /// Visits every bid in bucket order, then chain order
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&Bid),
    {
        for bid in self {
            visit(bid);
        }
    }

    /// Returns an iterator over the bids in bucket order, then chain order.
    /// This is not id order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { buckets: self.buckets.iter(), chain: None }
    }

    /// Returns every stored bid paired with the bucket it lives in
    #[must_use]
    pub fn entries(&self) -> Vec<(usize, &Bid)> {
        let mut entries = Vec::with_capacity(self.size);
        for head in &*self.buckets {
            let mut current = head.as_deref();
            while let Some(entry) = current {
                entries.push((entry.key, &entry.bid));
                current = entry.next.as_deref();
            }
        }
        entries
    }

    /// Returns the length of the chain in every bucket, in bucket order
    #[must_use]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|head| {
                let mut length: usize = 0;
                let mut current = head.as_deref();
                while let Some(entry) = current {
                    length = length.saturating_add(1);
                    current = entry.next.as_deref();
                }
                length
            })
            .collect()
    }

    /// Returns the number of bids in the table
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no bids
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the average chain length
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Removes every bid, keeping the buckets
    pub fn clear(&mut self) {
        for head in &mut *self.buckets {
            // Unlink chains one entry at a time so long chains do not recurse on drop.
            let mut next = head.take();
            while let Some(mut entry) = next {
                next = entry.next.take();
            }
        }
        self.size = 0;
    }
}

impl<'a> IntoIterator for &'a ChainedHashTable {
    type Item = &'a Bid;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bids of a [`ChainedHashTable`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Buckets not visited yet
    buckets: std::slice::Iter<'a, Option<Box<Entry>>>,
    /// Rest of the chain in the bucket being visited
    chain: Option<&'a Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.take() {
                self.chain = entry.next.as_deref();
                return Some(&entry.bid);
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }
}

/// Reads the leading integer of `id` the way C `atoi` does: leading
/// whitespace is skipped, one sign is accepted, digits are read until the
/// first non-digit. Returns `0` when there are no digits and saturates on
/// overflow.
#[must_use]
pub fn leading_integer(id: &str) -> i64 {
    let trimmed = id.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut value: i64 = 0;
    for digit in digits.chars().map_while(|c| c.to_digit(10)) {
        let digit = i64::from(digit);
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Maps an integer key onto `0..table_size` with Euclidean remainder
fn bucket_for_integer(key: i64, table_size: usize) -> usize {
    let modulus = i64::try_from(table_size).unwrap_or(i64::MAX);
    key.checked_rem_euclid(modulus).and_then(|bucket| usize::try_from(bucket).ok()).unwrap_or(0)
}

/// Maps an id onto `0..table_size` through the standard library string hash
fn bucket_for_text(id: &str, table_size: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let modulus = u64::try_from(table_size).unwrap_or(u64::MAX);
    hasher
        .finish()
        .checked_rem(modulus)
        .and_then(|bucket| usize::try_from(bucket).ok())
        .unwrap_or(0)
}
