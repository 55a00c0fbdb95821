//! Visited registry: the single admission gate of the crawl
//!
//! All node identifiers the crawl has ever seen live in one map from title to
//! [`NodeState`] behind one mutex. Keeping a single map makes the three sets
//! (queued, scraped, failed) disjoint by construction, and the mutex makes
//! every transition linearizable regardless of which worker completes first.

use crate::state::NodeState;
use crate::title::Title;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The node was unseen and is now queued for the caller
    Claimed,

    /// The node is already queued, scraped or failed
    AlreadySeen(NodeState),

    /// The registry holds `max_total` nodes; the candidate is dropped
    AtCapacity,
}

impl ClaimOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

/// Number of nodes in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryCounts {
    pub queued: usize,
    pub scraped: usize,
    pub failed: usize,
}

impl RegistryCounts {
    pub fn total(&self) -> usize {
        self.queued + self.scraped + self.failed
    }
}

#[derive(Debug)]
struct RegistryInner {
    nodes: HashMap<Title, NodeState>,
    counts: RegistryCounts,
}

impl RegistryInner {
    fn bump(&mut self, state: NodeState, delta: isize) {
        let slot = match state {
            NodeState::Queued => &mut self.counts.queued,
            NodeState::Scraped => &mut self.counts.scraped,
            NodeState::Failed => &mut self.counts.failed,
        };
        *slot = slot.saturating_add_signed(delta);
    }

    fn resolve(&mut self, id: &Title, target: NodeState) -> bool {
        match self.nodes.get_mut(id) {
            Some(state) if *state == NodeState::Queued => {
                *state = target;
                self.bump(NodeState::Queued, -1);
                self.bump(target, 1);
                true
            }
            Some(state) => {
                tracing::debug!(
                    "Ignoring {} transition for {}: already {}",
                    target,
                    id,
                    state
                );
                false
            }
            None => {
                tracing::debug!("Ignoring {} transition for unclaimed node {}", target, id);
                false
            }
        }
    }
}

/// Thread-safe registry of every node the crawl has seen
///
/// Shared by the frontier expander and all fetch workers through an `Arc`.
#[derive(Debug)]
pub struct VisitedRegistry {
    inner: Mutex<RegistryInner>,
    max_total: usize,
}

impl VisitedRegistry {
    /// Creates a registry that admits at most `max_total` distinct nodes
    pub fn new(max_total: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                nodes: HashMap::new(),
                counts: RegistryCounts::default(),
            }),
            max_total,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attempts to admit a node, reporting why admission failed
    ///
    /// The capacity check and the insert happen under one lock, so concurrent
    /// callers can never push the registry past `max_total`.
    pub fn claim(&self, id: &Title) -> ClaimOutcome {
        let mut inner = self.lock();

        if let Some(state) = inner.nodes.get(id) {
            return ClaimOutcome::AlreadySeen(*state);
        }

        if inner.nodes.len() >= self.max_total {
            return ClaimOutcome::AtCapacity;
        }

        inner.nodes.insert(id.clone(), NodeState::Queued);
        inner.bump(NodeState::Queued, 1);
        ClaimOutcome::Claimed
    }

    /// Returns true exactly once per node: for the caller that queued it
    pub fn try_claim(&self, id: &Title) -> bool {
        self.claim(id).is_claimed()
    }

    /// Moves a queued node to `Scraped`
    ///
    /// Returns false (and changes nothing) if the node was not queued.
    pub fn mark_scraped(&self, id: &Title) -> bool {
        self.lock().resolve(id, NodeState::Scraped)
    }

    /// Moves a queued node to `Failed`
    ///
    /// Returns false (and changes nothing) if the node was not queued.
    pub fn mark_failed(&self, id: &Title) -> bool {
        self.lock().resolve(id, NodeState::Failed)
    }

    /// Records a node collected by an earlier run directly as `Scraped`
    ///
    /// Restored nodes count toward the total but bypass the capacity check.
    /// Returns false if the node was already known.
    pub fn restore_scraped(&self, id: &Title) -> bool {
        let mut inner = self.lock();
        if inner.nodes.contains_key(id) {
            return false;
        }
        inner.nodes.insert(id.clone(), NodeState::Scraped);
        inner.bump(NodeState::Scraped, 1);
        true
    }

    /// Returns the state of a node, if it has been seen
    pub fn state_of(&self, id: &Title) -> Option<NodeState> {
        self.lock().nodes.get(id).copied()
    }

    /// Number of distinct nodes ever seen (queued, scraped or failed)
    pub fn total_seen(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Per-state counts, taken atomically
    pub fn counts(&self) -> RegistryCounts {
        self.lock().counts
    }

    /// Returns true if no further node can be admitted
    pub fn is_at_capacity(&self) -> bool {
        self.total_seen() >= self.max_total
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }
}
