// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session tuning.

use core::time::Duration;

use tracewise_coverage::{BrushConfig, COMPLETION_THRESHOLD};
use tracewise_path::SamplerConfig;

/// Knobs shared by every glyph a [`TracingSession`](crate::TracingSession) shows.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Path sampling and fitting.
    pub sampler: SamplerConfig,
    /// Ink brush sizing in path-locked mode.
    pub brush: BrushConfig,
    /// Minimum time between two progress scans while dragging.
    pub progress_interval: Duration,
    /// Coverage percentage at which a glyph is complete.
    pub completion_threshold: f64,
    /// A path-locked stroke needs more points than this to count as a stroke.
    pub min_stroke_points: usize,
    /// Ink brush width in freeform mode, in pixels.
    pub freeform_brush_width: f64,
    /// Points needed in freeform mode to reach 100%.
    pub freeform_target_points: usize,
    /// A freeform stroke needs more points than this to count as a stroke.
    pub freeform_min_stroke_points: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            brush: BrushConfig::default(),
            progress_interval: Duration::from_millis(100),
            completion_threshold: COMPLETION_THRESHOLD,
            min_stroke_points: 3,
            freeform_brush_width: 10.0,
            freeform_target_points: 50,
            freeform_min_stroke_points: 5,
        }
    }
}

impl SessionConfig {
    /// Returns a copy with different sampling.
    #[must_use]
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Returns a copy with a different brush.
    #[must_use]
    pub fn with_brush(mut self, brush: BrushConfig) -> Self {
        self.brush = brush;
        self
    }

    /// Returns a copy with a different progress throttle interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Returns a copy with a different completion threshold, in percent.
    #[must_use]
    pub fn with_completion_threshold(mut self, threshold: f64) -> Self {
        self.completion_threshold = threshold;
        self
    }
}
