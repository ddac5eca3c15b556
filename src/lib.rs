//! # Bid Index
//!
//! Two in-memory indexes over auction bid records, keyed by bid id.
//!
//! This crate provides:
//!
//! - `OrderedTree`: an unbalanced binary search tree that keeps bids sorted by id
//! - `ChainedHashTable`: a fixed-size hash table that resolves collisions by chaining
//!
//! Both implement [`BidStore`], so the CSV loader and the helpers in this crate
//! work with either of them.
//!
//! ## Ordered Tree
//!
//! ```rust
//! use bid_index::{Bid, OrderedTree};
//!
//! let mut tree = OrderedTree::new();
//! tree.insert(Bid::new("98109", "Office Chair", "Enterprise", 35.0));
//! tree.insert(Bid::new("98001", "Desk", "General Fund", 120.0));
//! tree.insert(Bid::new("98112", "Lamp", "General Fund", 8.5));
//!
//! // In-order traversal visits bids sorted by id
//! let mut ids = Vec::new();
//! tree.in_order(|bid| ids.push(bid.id.clone()));
//! assert_eq!(ids, ["98001", "98109", "98112"]);
//!
//! assert_eq!(tree.remove("98001").map(|bid| bid.title), Some("Desk".to_string()));
//! assert_eq!(tree.search("98001"), None);
//! ```
//!
//! ## Chained Hash Table
//!
//! ```rust
//! use bid_index::{Bid, ChainedHashTable, TableConfig};
//!
//! let mut table = ChainedHashTable::with_config(TableConfig::new()).unwrap();
//!
//! // 10 and 189 share a bucket in a 179-bucket table
//! table.insert(Bid::new("10", "Chair", "General Fund", 5.0)).unwrap();
//! table.insert(Bid::new("189", "Desk", "General Fund", 9.0)).unwrap();
//! assert_eq!(table.bucket_of("10").unwrap(), table.bucket_of("189").unwrap());
//!
//! assert_eq!(table.search("189").map(|bid| bid.title), Some("Desk".to_string()));
//! assert_eq!(table.remove("10").map(|bid| bid.id), Some("10".to_string()));
//! assert_eq!(table.search("189").map(|bid| bid.id), Some("189".to_string()));
//! ```
//!
//! ## Loading Bids
//!
//! ```rust
//! use bid_index::{ColumnLayout, OrderedTree, load_bids};
//! use std::io::Cursor;
//!
//! let csv = "Title,Id,Dept,Close,Amount,Inv,Veh,Receipt,Fund\n\
//!            Desk,98001,Ent,1/1/2016,$12.50,,,1,General Fund\n";
//!
//! let mut tree = OrderedTree::new();
//! let report = load_bids(Cursor::new(csv), &ColumnLayout::default(), &mut tree).unwrap();
//! assert_eq!(report.loaded, 1);
//! assert_eq!(tree.search("98001").map(|bid| bid.fund), Some("General Fund".to_string()));
//! ```

/// The bid record and amount parsing
mod bid;
/// Fixed-size hash table with separate chaining
mod chained_hash_table;
/// Hash table settings and their environment overrides
mod config;
/// Error type shared by the whole crate
mod error;
/// Delimited-text loader
mod loader;
/// `env_logger` setup
mod logger;
/// Unbalanced binary search tree
mod ordered_tree;
/// The `BidStore` contract and helpers over it
mod utils;

pub use bid::{Bid, parse_amount};
pub use chained_hash_table::{ChainedHashTable, Iter as TableIter, leading_integer};
pub use config::{
    DEFAULT_TABLE_SIZE, KEY_STRATEGY_VAR, KeyStrategy, REMOVAL_POLICY_VAR, RemovalPolicy,
    TABLE_SIZE_VAR, TableConfig,
};
pub use error::IndexError;
pub use loader::{
    ColumnLayout, LoadReport, load_bids, load_bids_from_path, read_bids, split_row,
};
pub use logger::initialize_logger;
pub use ordered_tree::{Iter as TreeIter, OrderedTree};
pub use utils::{BidStore, collect_ids, from_iter};
