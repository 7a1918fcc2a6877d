//! Frame-coalesced orchestration of theme passes.
//!
//! Scroll, resize and mutation events arrive at arbitrary rates; the
//! orchestrator only marks a pass as pending and remembers why. The host
//! calls [ThemeOrchestrator::frame] once per frame, and however many events
//! piled up since the last frame collapse into a single resolution pass
//! over all tracked probes.

use bitflags::bitflags;
use indexmap::IndexMap;
use nalgebra::Point2;

use glint_theme::config::ResolverConfig;
use glint_theme::decision::ThemeDecision;

use crate::engine::{DecisionEngine, EngineMetrics};
use crate::geometry::{ProbeId, ProbePoint, Rect};
use crate::resolver::BackgroundProvider;
use crate::sampler::ImageSampler;
use crate::store::DecisionStore;

bitflags! {
    /// Reasons a theme pass is pending.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// The viewport scrolled.
        const SCROLL = 0b001;
        /// The viewport or an element was resized.
        const RESIZE = 0b010;
        /// The content tree changed.
        const MUTATION = 0b100;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PassState {
    Idle,
    Pending(Invalidation),
}

#[derive(Clone, Copy, Debug)]
struct TrackedProbe {
    position: Point2<f64>,
    region: Option<Rect>,
}

/// Drives the decision engine over a set of tracked probes.
///
/// One orchestrator owns one engine and one [DecisionStore]; hosts read
/// decisions from the store or subscribe to its change listeners.
pub struct ThemeOrchestrator {
    engine: DecisionEngine,
    probes: IndexMap<ProbeId, TrackedProbe>,
    store: DecisionStore,
    state: PassState,
    passes: u64,
}

impl ThemeOrchestrator {
    /// Create an orchestrator with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            engine: DecisionEngine::new(config),
            probes: IndexMap::new(),
            store: DecisionStore::new(),
            state: PassState::Idle,
            passes: 0,
        }
    }

    /// Track a probe point. Tracking (or re-tracking) schedules a pass.
    pub fn track(&mut self, probe: ProbePoint) {
        self.probes.insert(
            probe.id,
            TrackedProbe {
                position: probe.position,
                region: None,
            },
        );
        self.invalidate(Invalidation::MUTATION);
    }

    /// Track a probe covering a whole region. The pass averages the solid
    /// backdrops behind the region's spread points when its center resolves
    /// nothing.
    pub fn track_region(&mut self, id: ProbeId, region: Rect) {
        self.probes.insert(
            id,
            TrackedProbe {
                position: region.center(),
                region: Some(region),
            },
        );
        self.invalidate(Invalidation::MUTATION);
    }

    /// Stop tracking a probe and drop all state held for it.
    pub fn untrack(&mut self, id: &ProbeId) {
        if self.probes.shift_remove(id).is_some() {
            self.engine.forget(id);
            self.store.remove(id);
            self.invalidate(Invalidation::MUTATION);
        }
    }

    /// Update a probe's position after layout moved it.
    pub fn reposition(&mut self, id: &ProbeId, position: Point2<f64>) {
        if let Some(tracked) = self.probes.get_mut(id) {
            tracked.position = position;
            tracked.region = None;
            self.invalidate(Invalidation::RESIZE);
        }
    }

    /// Note a scroll event.
    pub fn on_scroll(&mut self) {
        self.invalidate(Invalidation::SCROLL);
    }

    /// Note a resize event.
    pub fn on_resize(&mut self) {
        self.invalidate(Invalidation::RESIZE);
    }

    /// Note a content mutation.
    pub fn on_mutation(&mut self) {
        self.invalidate(Invalidation::MUTATION);
    }

    /// Mark a pass as pending for the given reasons.
    pub fn invalidate(&mut self, reason: Invalidation) {
        self.state = match self.state {
            PassState::Idle => PassState::Pending(reason),
            PassState::Pending(pending) => PassState::Pending(pending | reason),
        };
    }

    /// Whether a pass will run on the next frame.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, PassState::Pending(_))
    }

    /// Run at most one resolution pass, plus fold in any finished async
    /// samples. Returns `true` when any stored decision changed.
    pub fn frame<P: BackgroundProvider + ?Sized>(&mut self, provider: &P) -> bool {
        let mut changed = false;
        for (probe, decision) in self.engine.apply_finished_samples() {
            // Only refine probes that are still tracked.
            if self.probes.contains_key(&probe) {
                changed |= self.store.set(probe, decision);
            }
        }

        let PassState::Pending(reasons) = self.state else {
            return changed;
        };
        log::debug!("theme pass over {} probes ({reasons:?})", self.probes.len());

        for index in 0..self.probes.len() {
            let Some((id, tracked)) = self.probes.get_index(index) else {
                break;
            };
            let id = id.clone();
            let tracked = *tracked;
            let decision = match tracked.region {
                Some(region) => self.engine.decide_spread(&id, region, provider),
                None => self
                    .engine
                    .decide(&ProbePoint::new(id.clone(), tracked.position), provider),
            };
            changed |= self.store.set(id, decision);
        }

        self.state = PassState::Idle;
        self.passes += 1;
        changed
    }

    /// The current decision for a probe, if a pass has produced one.
    pub fn decision(&self, id: &ProbeId) -> Option<ThemeDecision> {
        self.store.get(id)
    }

    /// Register a listener on the underlying decision store.
    pub fn subscribe(&mut self, listener: impl Fn(&ProbeId, ThemeDecision) + 'static) {
        self.store.subscribe(listener);
    }

    /// The underlying decision store.
    pub fn store(&self) -> &DecisionStore {
        &self.store
    }

    /// The engine's image sampler, e.g. for preloading decoded pixels.
    pub fn sampler(&self) -> &ImageSampler {
        self.engine.sampler()
    }

    /// The engine's async sampling metrics.
    pub fn metrics(&self) -> EngineMetrics {
        self.engine.metrics()
    }

    /// Number of resolution passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
