//! Contract shared by the bid indexes and helpers built on it

use crate::{Bid, ChainedHashTable, IndexError, OrderedTree};

/// What the loader and reports need from a bid index. Implemented by both
/// [`OrderedTree`] and [`ChainedHashTable`].
pub trait BidStore {
    /// Stores a bid
    ///
    /// # Errors
    ///
    /// Fails when the index cannot derive a key from the bid id.
    fn insert_bid(&mut self, bid: Bid) -> Result<(), IndexError>;

    /// Returns a copy of the first bid stored under `id`
    fn search_bid(&self, id: &str) -> Option<Bid>;

    /// Removes a bid by id, returning it if it was stored
    fn remove_bid(&mut self, id: &str) -> Option<Bid>;

    /// Visits every stored bid once, in the index's natural order
    fn visit_all(&self, visit: &mut dyn FnMut(&Bid));

    /// Returns the number of stored bids
    fn len(&self) -> usize;

    /// Returns true if nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a bid with the given id is stored
    fn contains_id(&self, id: &str) -> bool {
        self.search_bid(id).is_some()
    }
}

impl BidStore for OrderedTree {
    fn insert_bid(&mut self, bid: Bid) -> Result<(), IndexError> {
        self.insert(bid);
        Ok(())
    }

    fn search_bid(&self, id: &str) -> Option<Bid> {
        self.search(id)
    }

    fn remove_bid(&mut self, id: &str) -> Option<Bid> {
        self.remove(id)
    }

    fn visit_all(&self, visit: &mut dyn FnMut(&Bid)) {
        self.in_order(visit);
    }

    fn len(&self) -> usize {
        self.len()
    }
}

impl BidStore for ChainedHashTable {
    fn insert_bid(&mut self, bid: Bid) -> Result<(), IndexError> {
        self.insert(bid)
    }

    fn search_bid(&self, id: &str) -> Option<Bid> {
        self.search(id)
    }

    fn remove_bid(&mut self, id: &str) -> Option<Bid> {
        self.remove(id)
    }

    fn visit_all(&self, visit: &mut dyn FnMut(&Bid)) {
        self.for_each(visit);
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Creates a bid index from an iterator of bids
///
/// # Errors
///
/// Stops at the first bid the index rejects.
pub fn from_iter<S, I>(iter: I) -> Result<S, IndexError>
where
    S: BidStore + Default,
    I: IntoIterator<Item = Bid>,
{
    let mut store = S::default();

    for bid in iter {
        store.insert_bid(bid)?;
    }

    Ok(store)
}

/// Collects the ids of every stored bid, in the index's natural order
#[must_use]
pub fn collect_ids<S: BidStore + ?Sized>(store: &S) -> Vec<String> {
    let mut ids = Vec::with_capacity(store.len());
    store.visit_all(&mut |bid| ids.push(bid.id.clone()));
    ids
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{KeyStrategy, TableConfig};

    fn bids(ids: &[&str]) -> Vec<Bid> {
        ids.iter().map(|id| Bid::new(*id, "Chair", "General Fund", 5.0)).collect()
    }

    #[test]
    fn test_from_iter() {
        let tree: OrderedTree = from_iter(bids(&["98109", "98112", "98001"])).unwrap();
        let table: ChainedHashTable = from_iter(bids(&["98109", "98112", "98001"])).unwrap();

        assert_eq!(BidStore::len(&tree), 3);
        assert_eq!(BidStore::len(&table), 3);
        assert!(tree.contains_id("98001"));
        assert!(table.contains_id("98001"));
        assert!(!table.contains_id("98002"));
    }

    #[test]
    fn test_collect_ids() {
        let tree: OrderedTree = from_iter(bids(&["98109", "98112", "98001"])).unwrap();
        assert_eq!(collect_ids(&tree), vec!["98001", "98109", "98112"]);

        let table: ChainedHashTable = from_iter(bids(&["189", "10", "5"])).unwrap();
        assert_eq!(collect_ids(&table), vec!["5", "189", "10"]);
    }

    #[test]
    fn test_same_contract_for_both() {
        let stores: Vec<Box<dyn BidStore>> =
            vec![Box::new(OrderedTree::new()), Box::new(ChainedHashTable::new())];

        for mut store in stores {
            assert!(store.is_empty());
            for bid in bids(&["10", "189", "5"]) {
                store.insert_bid(bid).unwrap();
            }
            assert_eq!(store.search_bid("189").map(|bid| bid.id), Some("189".to_string()));
            assert_eq!(store.remove_bid("189").map(|bid| bid.id), Some("189".to_string()));
            assert_eq!(store.remove_bid("189"), None);
            assert_eq!(store.search_bid("189"), None);
            assert!(store.contains_id("10"));
            assert_eq!(store.len(), 2);
        }
    }

    #[test]
    fn test_insert_bid_propagates_invalid_key() {
        let config = TableConfig::new().with_key_strategy(KeyStrategy::StrictNumeric);
        let mut table = ChainedHashTable::with_config(config).unwrap();
        let result = bids(&["10", "ten"]).into_iter().try_for_each(|bid| table.insert_bid(bid));

        assert!(matches!(result, Err(IndexError::InvalidKey(_))));
        assert_eq!(BidStore::len(&table), 1);
    }
}
