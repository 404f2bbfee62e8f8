//! # Alias Cycle Detection
//!
//! Follows `name → target` edges of `HighLevelParameterTypes`, one address
//! width at a time. A walk starts at every name defined in the width and
//! runs the following state machine:
//!
//! ```text
//!            target ∉ width keys
//! Walking ──────────────────────► Terminated
//!    │
//!    │ target already visited in this walk
//!    └──────────────────────────► CycleFound
//! ```
//!
//! Every starting name is walked independently, so a cycle reachable from
//! several names is reported once per starting name.
//!
//! The visited set of a walk is seeded with the whole starting symbol as a
//! single element. A cycle that closes on the starting name is therefore
//! detected on the first revisit.

use std::collections::BTreeSet;

use fndef_core::{AddressWidth, Symbol};

use crate::document::{AliasTable, HighLevelParameterTypes};
use crate::finding::{AliasCycle, Finding};

/// State of a single alias walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState<'a> {
    /// Currently positioned at a name defined in the width.
    Walking(&'a Symbol),
    /// Reached a name the width does not define.
    Terminated(&'a Symbol),
    /// Followed an edge back to a name visited earlier in this walk.
    CycleFound {
        /// Name whose edge closes the ring.
        from: &'a Symbol,
        /// Revisited name.
        to: &'a Symbol,
    },
}

/// One walk through the alias table of a single address width.
struct AliasWalk<'a> {
    aliases: &'a AliasTable,
    visited: BTreeSet<&'a Symbol>,
    chain: Vec<&'a Symbol>,
    state: WalkState<'a>,
}

impl<'a> AliasWalk<'a> {
    fn start(aliases: &'a AliasTable, start: &'a Symbol) -> Self {
        let state = if aliases.contains_key(start) {
            WalkState::Walking(start)
        } else {
            WalkState::Terminated(start)
        };
        Self {
            aliases,
            visited: BTreeSet::from([start]),
            chain: vec![start],
            state,
        }
    }

    fn step(&mut self) {
        let WalkState::Walking(current) = self.state else {
            return;
        };
        let Some(target) = self.aliases.get(current) else {
            self.state = WalkState::Terminated(current);
            return;
        };

        self.chain.push(target);
        self.state = if !self.visited.insert(target) {
            WalkState::CycleFound {
                from: current,
                to: target,
            }
        } else if self.aliases.contains_key(target) {
            WalkState::Walking(target)
        } else {
            WalkState::Terminated(target)
        };
    }

    fn run(mut self) -> (WalkState<'a>, Vec<&'a Symbol>) {
        while matches!(self.state, WalkState::Walking(_)) {
            self.step();
        }
        (self.state, self.chain)
    }
}

/// Walk the alias chain from `start` within one address width.
///
/// Returns the cycle if the walk revisits a name, `None` if it reaches a
/// name the width does not define.
pub fn walk_alias_chain(
    address_width: &AddressWidth,
    aliases: &AliasTable,
    start: &Symbol,
) -> Option<AliasCycle> {
    match AliasWalk::start(aliases, start).run() {
        (WalkState::CycleFound { from, to }, chain) => Some(AliasCycle {
            address_width: address_width.clone(),
            start: start.clone(),
            from: from.clone(),
            to: to.clone(),
            chain: chain.into_iter().cloned().collect(),
        }),
        _ => None,
    }
}

/// Walk from every name of every address width and report each cycle found.
pub fn detect_alias_cycles(high_level: &HighLevelParameterTypes) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (address_width, aliases) in high_level {
        for start in aliases.keys() {
            if let Some(cycle) = walk_alias_chain(address_width, aliases, start) {
                tracing::debug!(
                    address_width = %address_width,
                    start = %start,
                    from = %cycle.from,
                    to = %cycle.to,
                    "alias cycle"
                );
                findings.push(Finding::Cycle(cycle));
            }
        }
    }
    findings
}
