//! A single mutable statistics record in the search tree.
//!
//! Grounded on `hexwar-mcts/src/tree.rs`'s `MctsNode`/`NodeStats` (visit/win/virtual-loss
//! fields, `add_virtual_loss`/`remove_virtual_loss` walking to the root) and on
//! `native/mcts.h`'s `TreeNode<State>` (parent/child ownership, no cached state). Unlike the
//! teacher's arena (`Vec<MctsNode>` indexed by `NodeId`), nodes here own their children
//! directly through `Arc`, with a non-owning `Weak` back-edge to the parent — the tree is
//! read and grown concurrently by many workers, so ownership needs to survive re-rooting
//! without an arena-wide lock.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use rand::Rng;

use crate::state::GameState;
use crate::sync::{atomic_add_f64, atomic_load_f64, new_atomic_f64};

/// A node in the search tree, generic over the game it was grown for.
pub struct Node<S: GameState> {
    parent: Option<Weak<Node<S>>>,
    children: Mutex<Vec<(S::Move, Arc<Node<S>>)>>,
    n_visit: AtomicU64,
    w: AtomicU64,
    virtual_loss: AtomicI64,
    /// Probability assigned to the move leading to this node by the parent's expansion.
    /// The structural root's prior is 1.
    prior: f64,
}

impl<S: GameState> Node<S> {
    /// Construct a fresh, unexpanded root node.
    pub fn new_root() -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            children: Mutex::new(Vec::new()),
            n_visit: AtomicU64::new(0),
            w: new_atomic_f64(0.0),
            virtual_loss: AtomicI64::new(0),
            prior: 1.0,
        })
    }

    fn new_child(parent: &Arc<Self>, prior: f64) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(Arc::downgrade(parent)),
            children: Mutex::new(Vec::new()),
            n_visit: AtomicU64::new(0),
            w: new_atomic_f64(0.0),
            virtual_loss: AtomicI64::new(0),
            prior,
        })
    }

    pub fn parent(&self) -> Option<Arc<Self>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.lock().unwrap().is_empty()
    }

    pub fn n_visit(&self) -> u64 {
        self.n_visit.load(Ordering::Acquire)
    }

    pub fn w(&self) -> f64 {
        atomic_load_f64(&self.w)
    }

    pub fn virtual_loss(&self) -> i64 {
        self.virtual_loss.load(Ordering::Acquire)
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    /// Snapshot of `(move, child)` pairs, in expansion order. Empty iff unexpanded.
    pub fn children_snapshot(&self) -> Vec<(S::Move, Arc<Self>)> {
        self.children.lock().unwrap().clone()
    }

    /// Expand this node with the given `(move, prior)` pairs, unless another thread already
    /// won the race to expand it first. Returns `true` iff this call performed the expansion.
    ///
    /// The whole check-then-populate sequence runs under the node's lock, satisfying
    /// invariant I1 ("a node is expanded at most once").
    pub fn try_expand(self_arc: &Arc<Self>, priors: Vec<(S::Move, f64)>) -> bool {
        let mut children = self_arc.children.lock().unwrap();
        if !children.is_empty() {
            return false;
        }
        children.reserve(priors.len());
        for (mv, prior) in priors {
            children.push((mv, Node::new_child(self_arc, prior)));
        }
        true
    }

    /// Atomically record one visit with value `v`.
    pub fn update(&self, v: f64) {
        self.n_visit.fetch_add(1, Ordering::AcqRel);
        atomic_add_f64(&self.w, v);
    }

    pub fn add_virtual_loss(&self) {
        self.virtual_loss.fetch_add(1, Ordering::AcqRel);
    }

    pub fn remove_virtual_loss(&self) {
        self.virtual_loss.fetch_sub(1, Ordering::AcqRel);
    }

    /// PUCT score of this node from its parent's perspective, with `parent_n_visit` the
    /// parent's visit count. Virtual-loss-adjusted: the effective denominator is
    /// `1 + n_visit + virtual_loss`, and `virtual_loss` is subtracted from the numerator so
    /// in-flight descents bias other workers away from the same branch.
    fn puct_score(&self, c_puct: f64, parent_n_visit: u64) -> f64 {
        let n = self.n_visit() as f64;
        let vl = self.virtual_loss() as f64;
        let w = self.w();
        let q = if n + vl > 0.0 { (w - vl) / (n + vl) } else { 0.0 };
        let u = c_puct * self.prior * (parent_n_visit as f64).sqrt() / (1.0 + n + vl);
        q + u
    }

    /// Select the child maximizing the PUCT score, breaking ties uniformly at random among
    /// the exact argmax. Panics if called on a leaf — callers check `is_leaf()` first.
    pub fn select(self_arc: &Arc<Self>, c_puct: f64, rng: &mut impl Rng) -> (S::Move, Arc<Self>) {
        let children = self_arc.children.lock().unwrap().clone();
        if children.is_empty() {
            panic!("select() called on a leaf node");
        }
        let parent_n = self_arc.n_visit();
        let mut best_score = f64::NEG_INFINITY;
        let mut best: Vec<usize> = Vec::new();
        for (i, (_, child)) in children.iter().enumerate() {
            let score = child.puct_score(c_puct, parent_n);
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(i);
            } else if score == best_score {
                best.push(i);
            }
        }
        let chosen = best[rng.gen_range(0..best.len())];
        children[chosen].clone()
    }

    /// Sample a child in proportion to its prior (the environment mixture materialized at
    /// expansion time). Panics if called on a leaf.
    pub fn env_select(self_arc: &Arc<Self>, rng: &mut impl Rng) -> (S::Move, Arc<Self>) {
        let children = self_arc.children.lock().unwrap().clone();
        if children.is_empty() {
            panic!("env_select() called on a leaf node");
        }
        let total: f64 = children.iter().map(|(_, c)| c.prior).sum();
        let mut roll = rng.gen::<f64>() * total;
        for (mv, child) in &children {
            roll -= child.prior;
            if roll <= 0.0 {
                return (*mv, child.clone());
            }
        }
        children.last().unwrap().clone()
    }
}
