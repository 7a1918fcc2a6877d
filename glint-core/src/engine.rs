//! The theme decision engine.
//!
//! Turns a [Backdrop] into a [ThemeDecision] using a fixed priority order:
//! author tags beat everything, the raster heuristic beats computed color,
//! a dark overlay wash beats sampling, solid colors decide synchronously by
//! luminance, and image backdrops decide asynchronously while the previous
//! decision (or configured default) holds the fort.
//!
//! Every synchronous decision bumps the probe's epoch; async samples carry
//! the epoch they were spawned under and are discarded on mismatch, so a
//! slow sample can never overwrite a newer decision.

use std::collections::HashMap;

use nalgebra::Point2;
use smol::channel::{self, Receiver, Sender};
use vello::peniko::Color;

use glint_theme::color::{average_color, luminance};
use glint_theme::config::{RasterAssumption, ResolverConfig};
use glint_theme::decision::ThemeDecision;

use crate::geometry::{ProbeId, ProbePoint, Rect};
use crate::resolver::{Backdrop, Background, BackgroundProvider};
use crate::sampler::ImageSampler;
use crate::tree::ImageRef;

/// Image backdrops overlaid with a wash darker than this luminance decide
/// `dark` without sampling; the wash dominates whatever the image shows.
const DARK_OVERLAY_LUMINANCE: f64 = 0.4;

struct SampleOutcome {
    probe: ProbeId,
    epoch: u64,
    color: Option<Color>,
}

/// Counters describing the engine's async sampling traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Async samples spawned for image backdrops.
    pub samples_spawned: u64,
    /// Samples whose color refined a probe's decision.
    pub samples_applied: u64,
    /// Samples discarded because a newer decision superseded them.
    pub samples_discarded: u64,
    /// Samples that finished without a usable color.
    pub samples_unresolved: u64,
}

/// Decides the theme for probe points against a [BackgroundProvider].
///
/// The engine is synchronous at its surface: [DecisionEngine::decide] always
/// returns a usable decision immediately. Image sampling happens on detached
/// tasks whose outcomes are folded back in via
/// [DecisionEngine::apply_finished_samples].
pub struct DecisionEngine {
    config: ResolverConfig,
    sampler: ImageSampler,
    previous: HashMap<ProbeId, ThemeDecision>,
    epochs: HashMap<ProbeId, u64>,
    outcome_tx: Sender<SampleOutcome>,
    outcome_rx: Receiver<SampleOutcome>,
    metrics: EngineMetrics,
}

impl DecisionEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        let config = config.normalized();
        let sampler = ImageSampler::new(config.image_cache_capacity);
        let (outcome_tx, outcome_rx) = channel::unbounded();
        Self {
            config,
            sampler,
            previous: HashMap::new(),
            epochs: HashMap::new(),
            outcome_tx,
            outcome_rx,
            metrics: EngineMetrics::default(),
        }
    }

    /// Decide the theme for one probe point.
    pub fn decide<P: BackgroundProvider + ?Sized>(
        &mut self,
        probe: &ProbePoint,
        provider: &P,
    ) -> ThemeDecision {
        let epoch = self.bump_epoch(&probe.id);
        let backdrop = provider.backdrop_at(probe.position);
        let decision = self
            .classify(&probe.id, epoch, &backdrop, probe.position)
            .unwrap_or(self.config.default_decision);
        self.previous.insert(probe.id.clone(), decision);
        decision
    }

    /// Decide the theme for a probe covering a whole region, averaging the
    /// solid backdrops behind the region's spread points. Tag, raster and
    /// image handling still apply at the region's center.
    pub fn decide_spread<P: BackgroundProvider + ?Sized>(
        &mut self,
        probe: &ProbeId,
        region: Rect,
        provider: &P,
    ) -> ThemeDecision {
        let epoch = self.bump_epoch(probe);
        let center = region.center();
        let backdrop = provider.backdrop_at(center);
        let decision = self
            .classify(probe, epoch, &backdrop, center)
            .or_else(|| {
                let colors: Vec<Color> = region
                    .spread()
                    .iter()
                    .filter_map(|point| match provider.backdrop_at(*point).background {
                        Some(Background::Solid(color)) => Some(color),
                        _ => None,
                    })
                    .collect();
                average_color(&colors).map(|color| {
                    ThemeDecision::from_luminance(
                        luminance(color),
                        self.config.luminance_threshold,
                    )
                })
            })
            .unwrap_or(self.config.default_decision);
        self.previous.insert(probe.clone(), decision);
        decision
    }

    fn classify(
        &mut self,
        probe: &ProbeId,
        epoch: u64,
        backdrop: &Backdrop,
        position: Point2<f64>,
    ) -> Option<ThemeDecision> {
        if let Some(tag) = backdrop.tag {
            return Some(tag.decision());
        }
        if backdrop.raster_content {
            match self.config.raster_assumption {
                RasterAssumption::AssumeDark => return Some(ThemeDecision::Dark),
                RasterAssumption::AssumeLight => return Some(ThemeDecision::Light),
                RasterAssumption::Sample => {}
            }
        }
        match &backdrop.background {
            Some(Background::Solid(color)) => Some(ThemeDecision::from_luminance(
                luminance(*color),
                self.config.luminance_threshold,
            )),
            Some(Background::Image(reference)) => {
                if let Some(overlay) = backdrop.overlay {
                    if luminance(overlay) < DARK_OVERLAY_LUMINANCE {
                        return Some(ThemeDecision::Dark);
                    }
                }
                let surface = backdrop
                    .surface
                    .unwrap_or_else(|| Rect::new(position.x, position.y, 0.0, 0.0));
                self.spawn_sample(probe.clone(), epoch, reference.clone(), surface, position);
                Some(self.previous_or_default(probe))
            }
            None => None,
        }
    }

    fn spawn_sample(
        &mut self,
        probe: ProbeId,
        epoch: u64,
        reference: ImageRef,
        surface: Rect,
        position: Point2<f64>,
    ) {
        self.metrics.samples_spawned += 1;
        let sampler = self.sampler.clone();
        let tx = self.outcome_tx.clone();
        smol::spawn(async move {
            let color = sampler.sample(&reference, surface, position).await;
            let _ = tx
                .send(SampleOutcome {
                    probe,
                    epoch,
                    color,
                })
                .await;
        })
        .detach();
    }

    /// Fold finished async samples into probe decisions.
    ///
    /// Returns the probes whose decisions changed. Outcomes spawned under a
    /// stale epoch are dropped; outcomes with no color leave the previous
    /// decision in place.
    pub fn apply_finished_samples(&mut self) -> Vec<(ProbeId, ThemeDecision)> {
        let mut changed = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            let current_epoch = self.epochs.get(&outcome.probe).copied().unwrap_or(0);
            if outcome.epoch != current_epoch {
                log::debug!(
                    "discarding stale sample for {} (epoch {} != {})",
                    outcome.probe,
                    outcome.epoch,
                    current_epoch
                );
                self.metrics.samples_discarded += 1;
                continue;
            }
            let Some(color) = outcome.color else {
                self.metrics.samples_unresolved += 1;
                continue;
            };
            self.metrics.samples_applied += 1;
            let decision = ThemeDecision::from_luminance(
                luminance(color),
                self.config.luminance_threshold,
            );
            let before = self.previous.insert(outcome.probe.clone(), decision);
            if before != Some(decision) {
                changed.push((outcome.probe, decision));
            }
        }
        changed
    }

    /// The last decision made for a probe, if any.
    pub fn last_decision(&self, probe: &ProbeId) -> Option<ThemeDecision> {
        self.previous.get(probe).copied()
    }

    /// Drop all state held for a probe.
    pub fn forget(&mut self, probe: &ProbeId) {
        self.previous.remove(probe);
        self.epochs.remove(probe);
    }

    /// The engine's sampling metrics so far.
    pub fn metrics(&self) -> EngineMetrics {
        self.metrics
    }

    /// The shared image sampler, e.g. for preloading decoded pixels.
    pub fn sampler(&self) -> &ImageSampler {
        &self.sampler
    }

    /// The normalized configuration in effect.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn bump_epoch(&mut self, probe: &ProbeId) -> u64 {
        let epoch = self.epochs.entry(probe.clone()).or_insert(0);
        *epoch += 1;
        *epoch
    }

    fn previous_or_default(&self, probe: &ProbeId) -> ThemeDecision {
        self.previous
            .get(probe)
            .copied()
            .unwrap_or(self.config.default_decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{PaintProps, PaintTree};
    use glint_theme::decision::ThemeTag;

    fn screen() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    fn probe(id: &str) -> ProbePoint {
        ProbePoint::new(ProbeId::new(id), Point2::new(500.0, 500.0))
    }

    #[test]
    fn tags_override_computed_color() {
        let mut tree = PaintTree::new();
        tree.insert(
            None,
            PaintProps::new(screen())
                .with_background(Color::WHITE)
                .with_tag(ThemeTag::Dark),
        );
        let mut engine = DecisionEngine::new(ResolverConfig::default());
        assert_eq!(engine.decide(&probe("logo"), &tree), ThemeDecision::Dark);
    }

    #[test]
    fn solid_backdrops_decide_by_luminance() {
        let mut tree = PaintTree::new();
        let root = tree.insert(
            None,
            PaintProps::new(screen()).with_background(Color::WHITE),
        );
        let mut engine = DecisionEngine::new(ResolverConfig::default());
        assert_eq!(engine.decide(&probe("logo"), &tree), ThemeDecision::Light);

        if let Some(props) = tree.props_mut(root) {
            props.background = Some(Color::from_rgb8(10, 10, 10));
        }
        assert_eq!(engine.decide(&probe("logo"), &tree), ThemeDecision::Dark);
    }

    #[test]
    fn raster_content_follows_the_configured_assumption() {
        let mut tree = PaintTree::new();
        tree.insert(
            None,
            PaintProps::new(screen())
                .with_background(Color::WHITE)
                .with_raster_content(),
        );

        let mut dark = DecisionEngine::new(ResolverConfig::default());
        assert_eq!(dark.decide(&probe("logo"), &tree), ThemeDecision::Dark);

        let mut light = DecisionEngine::new(
            ResolverConfig::default().with_raster_assumption(RasterAssumption::AssumeLight),
        );
        assert_eq!(light.decide(&probe("logo"), &tree), ThemeDecision::Light);

        let mut sample = DecisionEngine::new(
            ResolverConfig::default().with_raster_assumption(RasterAssumption::Sample),
        );
        // No assumption; the solid white backdrop decides instead.
        assert_eq!(sample.decide(&probe("logo"), &tree), ThemeDecision::Light);
    }

    #[test]
    fn nothing_resolved_falls_back_to_default() {
        let tree = PaintTree::new();
        let mut engine = DecisionEngine::new(
            ResolverConfig::default().with_default_decision(ThemeDecision::Dark),
        );
        assert_eq!(engine.decide(&probe("logo"), &tree), ThemeDecision::Dark);
    }

    #[test]
    fn spread_averages_solid_backdrops_when_the_center_resolves_nothing() {
        // Two light panels with a transparent gap between them; the region's
        // center lands in the gap, so only the averaged spread points decide.
        let mut tree = PaintTree::new();
        tree.insert(
            None,
            PaintProps::new(Rect::new(0.0, 0.0, 480.0, 1000.0))
                .with_background(Color::from_rgb8(250, 250, 250)),
        );
        tree.insert(
            None,
            PaintProps::new(Rect::new(520.0, 0.0, 480.0, 1000.0))
                .with_background(Color::from_rgb8(240, 240, 240)),
        );
        let mut engine = DecisionEngine::new(ResolverConfig::default());
        let region = Rect::new(0.0, 450.0, 1000.0, 100.0);
        let decision = engine.decide_spread(&ProbeId::new("nav"), region, &tree);
        assert_eq!(decision, ThemeDecision::Light);

        // With no panels at all the spread resolves nothing and the default
        // applies.
        let empty = PaintTree::new();
        let fallback = engine.decide_spread(&ProbeId::new("nav"), region, &empty);
        assert_eq!(fallback, ThemeDecision::Light);
    }
}
