// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two ways pointer input turns into ink.

use kurbo::{Point, Size, Vec2};
use tracewise_coverage::{CorridorMask, CoverageTracker, InkBitmap, ProgressState};
use tracewise_path::{ProjectedPoint, SampledPath, StartGate};

use crate::config::SessionConfig;

/// Which tracer a session uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceMode {
    /// Strokes start at the gate and ink snaps onto the path.
    #[default]
    PathLocked,
    /// Ink goes wherever the pointer goes; progress counts points.
    Freeform,
}

/// Gate, projection and corridor coverage.
#[derive(Debug)]
pub struct ConstrainedTracer {
    gate: StartGate,
    coverage: CoverageTracker,
}

impl ConstrainedTracer {
    /// Builds the corridor for `path` and an empty ink layer.
    #[must_use]
    pub fn new(
        path: &SampledPath,
        corridor_width: f64,
        gate: StartGate,
        config: &SessionConfig,
    ) -> Self {
        let corridor = CorridorMask::build(path, corridor_width);
        let coverage = CoverageTracker::new(corridor, corridor_width, &config.brush)
            .with_threshold(config.completion_threshold);
        Self { gate, coverage }
    }

    /// The start gate.
    #[must_use]
    pub fn gate(&self) -> StartGate {
        self.gate
    }

    /// The coverage tracker.
    #[must_use]
    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }
}

/// Unconstrained ink with a point-count heuristic for progress.
///
/// Its [`ProgressState`] counts stroke points rather than pixels:
/// `painted_pixels` is the number of points since the last clear and
/// `total_pixels` is the target point count.
#[derive(Debug)]
pub struct FreeformTracer {
    ink: InkBitmap,
    points: usize,
    target_points: usize,
    threshold: f64,
    progress: ProgressState,
}

impl FreeformTracer {
    /// Creates an empty freeform layer covering `frame`.
    #[must_use]
    pub fn new(frame: Size, config: &SessionConfig) -> Self {
        Self {
            ink: InkBitmap::new(frame, config.freeform_brush_width),
            points: 0,
            target_points: config.freeform_target_points,
            threshold: config.completion_threshold,
            progress: ProgressState::empty(config.freeform_target_points),
        }
    }

    /// Points inked since the last clear.
    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    fn compute_progress(&mut self) -> ProgressState {
        let percent = if self.target_points == 0 {
            100.0
        } else {
            (self.points as f64 * 100.0 / self.target_points as f64).min(100.0)
        };
        self.progress = ProgressState {
            painted_pixels: self.points,
            total_pixels: self.target_points,
            percent,
            completed: self.progress.completed || percent >= self.threshold,
        };
        self.progress
    }
}

/// The tracer selected for the current glyph and mode.
#[derive(Debug)]
pub enum Tracer {
    /// Path-locked tracing.
    Constrained(ConstrainedTracer),
    /// Free drawing.
    Freeform(FreeformTracer),
}

impl Tracer {
    /// Builds the tracer for `mode`.
    #[must_use]
    pub fn build(
        mode: TraceMode,
        path: &SampledPath,
        corridor_width: f64,
        gate: StartGate,
        config: &SessionConfig,
    ) -> Self {
        match mode {
            TraceMode::PathLocked => {
                Self::Constrained(ConstrainedTracer::new(path, corridor_width, gate, config))
            }
            TraceMode::Freeform => Self::Freeform(FreeformTracer::new(path.frame(), config)),
        }
    }

    /// The mode this tracer implements.
    #[must_use]
    pub fn mode(&self) -> TraceMode {
        match self {
            Self::Constrained(_) => TraceMode::PathLocked,
            Self::Freeform(_) => TraceMode::Freeform,
        }
    }

    /// Returns `true` if a stroke may begin at `pt`.
    #[must_use]
    pub fn admits(&self, path: &SampledPath, pt: Point) -> bool {
        match self {
            Self::Constrained(t) => !t.coverage.corridor().is_empty() && t.gate.admits(path, pt),
            Self::Freeform(_) => true,
        }
    }

    /// Where the ink for pointer position `pt` goes.
    ///
    /// Path-locked tracing snaps onto `path` and yields `None` only for an empty
    /// path. Freeform keeps `pt` as is.
    #[must_use]
    pub fn locate(&self, path: &SampledPath, pt: Point) -> Option<ProjectedPoint> {
        match self {
            Self::Constrained(_) => path.project(pt),
            Self::Freeform(_) => Some(ProjectedPoint {
                position: pt,
                tangent: Vec2::new(1.0, 0.0),
                normal: Vec2::new(0.0, 1.0),
                distance_from_path: 0.0,
                path_index: 0,
            }),
        }
    }

    /// Inks from `from` to `to`, or a dot at `to` when a stroke starts.
    pub fn paint(&mut self, from: Option<Point>, to: Point) {
        match self {
            Self::Constrained(t) => t.coverage.paint_segment(from, to),
            Self::Freeform(t) => {
                t.ink.paint_segment(from, to);
                t.points += 1;
            }
        }
    }

    /// Recomputes progress. This is the expensive call in path-locked mode.
    pub fn compute_progress(&mut self) -> ProgressState {
        match self {
            Self::Constrained(t) => t.coverage.compute_progress(),
            Self::Freeform(t) => t.compute_progress(),
        }
    }

    /// Progress as last computed.
    #[must_use]
    pub fn progress(&self) -> ProgressState {
        match self {
            Self::Constrained(t) => t.coverage.progress(),
            Self::Freeform(t) => t.progress,
        }
    }

    /// Erases the ink and resets progress.
    pub fn clear(&mut self) {
        match self {
            Self::Constrained(t) => t.coverage.clear(),
            Self::Freeform(t) => {
                t.ink.clear();
                t.points = 0;
                t.progress = ProgressState::empty(t.target_points);
            }
        }
    }

    /// The visible ink as alpha in row-major order.
    ///
    /// Path-locked ink is clipped to the corridor.
    pub fn composite_alpha(&mut self) -> Vec<u8> {
        match self {
            Self::Constrained(t) => t.coverage.composite_alpha(),
            Self::Freeform(t) => t.ink.alpha().to_vec(),
        }
    }
}
