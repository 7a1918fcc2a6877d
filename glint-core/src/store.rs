//! Per-probe decision storage with change listeners.

use indexmap::IndexMap;

use glint_theme::decision::ThemeDecision;

use crate::geometry::ProbeId;

/// Callback invoked when a probe's decision changes.
pub type DecisionListener = Box<dyn Fn(&ProbeId, ThemeDecision)>;

/// Holds the current decision per probe and notifies listeners on change.
///
/// Probes keep their insertion order, so iterating the store visits chrome
/// elements in the order the host registered them. Listeners fire only on
/// actual changes; re-setting the same decision is silent.
#[derive(Default)]
pub struct DecisionStore {
    decisions: IndexMap<ProbeId, ThemeDecision>,
    listeners: Vec<DecisionListener>,
}

impl DecisionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current decision for a probe, if one has been made.
    pub fn get(&self, probe: &ProbeId) -> Option<ThemeDecision> {
        self.decisions.get(probe).copied()
    }

    /// Record a decision. Returns `true` (and notifies listeners) when the
    /// decision differs from what was stored.
    pub fn set(&mut self, probe: ProbeId, decision: ThemeDecision) -> bool {
        let changed = self.decisions.insert(probe.clone(), decision) != Some(decision);
        if changed {
            for listener in &self.listeners {
                listener(&probe, decision);
            }
        }
        changed
    }

    /// Drop the stored decision for a probe.
    pub fn remove(&mut self, probe: &ProbeId) {
        self.decisions.shift_remove(probe);
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl Fn(&ProbeId, ThemeDecision) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Iterate over all stored decisions in probe registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProbeId, ThemeDecision)> {
        self.decisions.iter().map(|(id, decision)| (id, *decision))
    }

    /// Number of probes with a stored decision.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Whether the store holds no decisions.
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}
