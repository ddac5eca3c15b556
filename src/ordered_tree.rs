//! An unbalanced binary search tree of bids, ordered by id.
//!
//! # Examples
//!
//! ```
//! use bid_index::{Bid, OrderedTree};
//!
//! let mut tree = OrderedTree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.search("98109"), None);
//!
//! tree.insert(Bid::new("98109", "Office Chair", "Enterprise", 35.0));
//! tree.insert(Bid::new("98001", "Desk", "General Fund", 120.0));
//! assert_eq!(tree.search("98001").map(|bid| bid.title), Some("Desk".to_string()));
//!
//! // Removing a bid returns it.
//! let removed = tree.remove("98109");
//! assert_eq!(removed.map(|bid| bid.id), Some("98109".to_string()));
//! assert_eq!(tree.search("98109"), None);
//! ```

use std::{cmp::Ordering, fmt};

use log::trace;

use crate::Bid;

/// Owning link to a subtree.
type Link = Option<Box<Node>>;

/// A tree node: one bid and the two subtrees hanging off it.
struct Node {
    /// The stored bid.
    bid: Bid,
    /// Bids with smaller ids.
    left: Link,
    /// Bids with larger or equal ids.
    right: Link,
}

impl Node {
    /// Creates a leaf holding `bid`.
    fn new(bid: Bid) -> Self {
        Self { bid, left: None, right: None }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("bid", &self.bid).finish_non_exhaustive()
    }
}

/// A Binary Search Tree of [`Bid`]s keyed by [`Bid::id`].
///
/// Ids are compared as strings, so `"98109"` sorts before `"99"`. The tree
/// does not rebalance itself: inserting ids in sorted order degrades it to a
/// list. Use [`OrderedTree::from_sorted`] to build a balanced tree from a
/// known data set.
///
/// Duplicate ids are accepted and go to the right of the existing one, so a
/// search always finds the copy inserted first.
#[derive(Default)]
pub struct OrderedTree {
    /// Root of the tree, `None` when empty.
    root: Link,
    /// Number of bids in the tree.
    size: usize,
}

impl Clone for OrderedTree {
    /// Rebuilds the same shape by inserting in pre-order, without recursion.
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        self.pre_order(|bid| copy.insert(bid.clone()));
        copy
    }
}

impl fmt::Debug for OrderedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Drop for OrderedTree {
    fn drop(&mut self) {
        teardown(self.root.take());
    }
}

impl OrderedTree {
    /// Generates a new, empty `OrderedTree`.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, size: 0 }
    }

    /// Builds a tree whose depth is logarithmic in the number of bids.
    ///
    /// The bids are sorted by id, then the median is inserted first and each
    /// half is filled the same way.
    ///
    /// Insertion order is no longer input order, so when several bids share
    /// an id, search finds the one placed highest in the tree rather than the
    /// first one given.
    ///
    /// ```
    /// use bid_index::{Bid, OrderedTree};
    ///
    /// let bids = (1..=7).map(|i| Bid::new(i.to_string(), "", "", 0.0));
    /// let tree = OrderedTree::from_sorted(bids);
    ///
    /// assert_eq!(tree.len(), 7);
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn from_sorted<I>(bids: I) -> Self
    where
        I: IntoIterator<Item = Bid>,
    {
        let mut bids: Vec<Bid> = bids.into_iter().collect();
        bids.sort_by(|a, b| a.id.cmp(&b.id));
        let mut tree = Self::new();
        tree.fill_balanced(&bids);
        tree
    }

    /// Recursive helper for [`OrderedTree::from_sorted`].
    fn fill_balanced(&mut self, bids: &[Bid]) {
        let (lower, rest) = bids.split_at(bids.len() / 2);
        if let Some((median, upper)) = rest.split_first() {
            self.insert(median.clone());
            self.fill_balanced(lower);
            self.fill_balanced(upper);
        }
    }

    /// Inserts a bid.
    ///
    /// The walk goes left while the current node's id is greater than the new
    /// id and right otherwise, so equal ids land in the right subtree.
    pub fn insert(&mut self, bid: Bid) {
        let mut cursor = &mut self.root;
        while let Some(node) = cursor {
            cursor = if node.bid.id > bid.id { &mut node.left } else { &mut node.right };
        }
        trace!("inserting bid {} into tree", bid.id);
        *cursor = Some(Box::new(Node::new(bid)));
        self.size = self.size.saturating_add(1);
    }

    /// Potentially finds the bid with the given id. If no node has the
    /// corresponding id, `None` is returned.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Bid> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(node.bid.id.as_str()) {
                Ordering::Equal => return Some(&node.bid),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Like [`OrderedTree::get`] but returns a copy of the bid.
    #[must_use]
    pub fn search(&self, id: &str) -> Option<Bid> {
        self.get(id).cloned()
    }

    /// Removes the bid with the given id and returns it. Removing an id that is
    /// not in the tree changes nothing.
    ///
    /// A node with two children takes over the bid of its in-order successor,
    /// which is then removed from the right subtree.
    pub fn remove(&mut self, id: &str) -> Option<Bid> {
        let removed = detach(find_slot(&mut self.root, id)?)?;
        self.size = self.size.saturating_sub(1);
        trace!("removed bid {id} from tree");
        Some(removed)
    }

    /// Visits every bid in ascending id order (left, node, right).
    pub fn in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&Bid),
    {
        for bid in self {
            visit(bid);
        }
    }

    /// Visits every bid node first, then its left and right subtrees.
    pub fn pre_order<F>(&self, mut visit: F)
    where
        F: FnMut(&Bid),
    {
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            visit(&node.bid);
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
    }

    /// Visits every bid after both of its subtrees (left, right, node).
    pub fn post_order<F>(&self, mut visit: F)
    where
        F: FnMut(&Bid),
    {
        // Node, right, left reversed is left, right, node.
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        let mut reversed = Vec::with_capacity(self.size);
        while let Some(node) = stack.pop() {
            reversed.push(&node.bid);
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
        for bid in reversed.into_iter().rev() {
            visit(bid);
        }
    }

    /// Returns an iterator over the bids in ascending id order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Returns the number of bids in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the tree holds no bids.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of nodes on the longest root-to-leaf path. An empty tree has
    /// height 0.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut stack: Vec<(&Node, usize)> =
            self.root.as_deref().into_iter().map(|node| (node, 1)).collect();
        let mut height = 0;
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            let child_depth = depth.saturating_add(1);
            stack.extend(node.left.as_deref().map(|child| (child, child_depth)));
            stack.extend(node.right.as_deref().map(|child| (child, child_depth)));
        }
        height
    }

    /// Removes every bid.
    pub fn clear(&mut self) {
        teardown(self.root.take());
        self.size = 0;
    }
}

/// Finds the link holding the first node with the given id, walking down
/// from `link` the same way a search does.
fn find_slot<'a>(mut link: &'a mut Link, id: &str) -> Option<&'a mut Link> {
    loop {
        let ordering = id.cmp(link.as_ref()?.bid.id.as_str());
        link = match ordering {
            Ordering::Equal => return Some(link),
            Ordering::Less => &mut link.as_mut()?.left,
            Ordering::Greater => &mut link.as_mut()?.right,
        };
    }
}

/// Unlinks the node held by `slot` and returns its bid, splicing a single
/// child into its place or refilling it from the in-order successor.
fn detach(slot: &mut Link) -> Option<Bid> {
    let mut node = slot.take()?;
    match (node.left.take(), node.right.take()) {
        (None, None) => Some(node.bid),
        (Some(child), None) | (None, Some(child)) => {
            *slot = Some(child);
            Some(node.bid)
        }
        (Some(left), Some(right)) => {
            let successor = leftmost(&right).bid.clone();
            let successor_id = successor.id.clone();
            let removed = std::mem::replace(&mut node.bid, successor);
            node.left = Some(left);
            node.right = Some(right);
            // The successor has no left child, so this never recurses further.
            if let Some(successor_slot) = find_slot(&mut node.right, &successor_id) {
                detach(successor_slot);
            }
            *slot = Some(node);
            Some(removed)
        }
    }
}

/// Returns the node with the smallest id in the subtree rooted at `node`.
fn leftmost(mut node: &Node) -> &Node {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node
}

/// Drops a subtree without recursing, children before their parent.
fn teardown(link: Link) {
    let mut stack: Vec<Box<Node>> = link.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<'a> IntoIterator for &'a OrderedTree {
    type Item = &'a Bid;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the bids of an [`OrderedTree`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Nodes whose bid and right subtree have not been visited yet.
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    /// Pushes `node` and every left descendant on the stack.
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.bid)
    }
}
