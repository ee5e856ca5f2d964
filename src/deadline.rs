use std::time::{Duration, Instant};

/// A wall-clock instant after which no new search work may begin.
///
/// Established once per top-level decision and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    /// A deadline at the given instant.
    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    /// A deadline that never passes.
    pub fn unlimited() -> Self {
        Self { at: None }
    }

    /// Returns `true` once the deadline instant has been reached.
    #[inline]
    pub fn has_passed(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }

    /// Time left until the deadline; `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` for a deadline created by [`Deadline::unlimited`].
    pub fn is_unlimited(&self) -> bool {
        self.at.is_none()
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::unlimited()
    }
}

/// Everything that bounds one top-level decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Wall-clock cutoff.
    pub deadline: Deadline,
    /// Deepest iteration the driver will start. `None` uses the engine's configured maximum.
    pub max_depth: Option<u8>,
    /// Number of visited nodes after which the search stops as if the deadline had passed.
    pub node_limit: Option<u64>,
}

impl SearchLimits {
    /// Limits with only a time budget.
    pub fn with_time(budget: Duration) -> Self {
        Self {
            deadline: Deadline::after(budget),
            ..Self::default()
        }
    }

    /// Limits with only a depth bound and no clock.
    pub fn with_depth(depth: u8) -> Self {
        Self {
            max_depth: Some(depth),
            ..Self::default()
        }
    }

    /// Adds a node budget.
    pub fn nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    /// Adds a depth bound.
    pub fn depth(mut self, depth: u8) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Returns `true` when either the clock or the node budget is exhausted.
    #[inline]
    pub fn exhausted(&self, nodes: u64) -> bool {
        if let Some(limit) = self.node_limit {
            if nodes >= limit {
                return true;
            }
        }
        self.deadline.has_passed()
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            deadline: Deadline::unlimited(),
            max_depth: None,
            node_limit: None,
        }
    }
}
