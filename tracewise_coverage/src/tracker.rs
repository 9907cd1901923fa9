// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage progress: how much of the corridor has been inked.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::corridor::CorridorMask;
use crate::ink::{BrushConfig, InkBitmap};

/// Percentage at which a glyph counts as traced.
pub const COMPLETION_THRESHOLD: f64 = 98.0;

/// Snapshot of coverage for the current glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressState {
    /// Corridor pixels that carry ink.
    pub painted_pixels: usize,
    /// Corridor pixels in total.
    pub total_pixels: usize,
    /// `painted_pixels / total_pixels` as a percentage in `0..=100`; `0` for an empty corridor.
    pub percent: f64,
    /// Set once `percent` reaches the completion threshold; stays set until cleared.
    pub completed: bool,
}

impl ProgressState {
    /// Nothing painted yet against a corridor of `total_pixels`.
    #[must_use]
    pub const fn empty(total_pixels: usize) -> Self {
        Self {
            painted_pixels: 0,
            total_pixels,
            percent: 0.0,
            completed: false,
        }
    }
}

/// Paints ink at path-snapped points and measures it against the corridor.
///
/// Painting is cheap and queues drawing; [`compute_progress`](Self::compute_progress)
/// rasterizes and scans both layers, so callers should throttle it.
#[derive(Debug)]
pub struct CoverageTracker {
    corridor: CorridorMask,
    ink: InkBitmap,
    progress: ProgressState,
    threshold: f64,
}

impl CoverageTracker {
    /// Creates a tracker over `corridor` with an ink brush sized by `brush`.
    #[must_use]
    pub fn new(corridor: CorridorMask, corridor_width: f64, brush: &BrushConfig) -> Self {
        let frame = Size::new(f64::from(corridor.width()), f64::from(corridor.height()));
        let ink = InkBitmap::new(frame, brush.width_for(corridor_width));
        let progress = ProgressState::empty(corridor.total_pixel_count());
        Self {
            corridor,
            ink,
            progress,
            threshold: COMPLETION_THRESHOLD,
        }
    }

    /// Returns the tracker with a different completion threshold, in percent.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Stamps ink from `from` to `to`, or a dot at `to` when `from` is `None`.
    ///
    /// Does not update progress.
    pub fn paint_segment(&mut self, from: Option<Point>, to: Point) {
        self.ink.paint_segment(from, to);
    }

    /// Scans ink and corridor, updates the running progress and returns it.
    ///
    /// `completed` is sticky. An empty corridor always reports 0% and never completes.
    pub fn compute_progress(&mut self) -> ProgressState {
        let total = self.corridor.total_pixel_count();
        let painted = self
            .ink
            .alpha()
            .iter()
            .zip(self.corridor.alpha())
            .filter(|&(&ink, &mask)| ink > 0 && mask > 0)
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            (painted as f64 * 100.0 / total as f64).min(100.0)
        };
        self.progress = ProgressState {
            painted_pixels: painted,
            total_pixels: total,
            percent,
            completed: self.progress.completed || (total > 0 && percent >= self.threshold),
        };
        self.progress
    }

    /// Erases all ink and resets progress.
    pub fn clear(&mut self) {
        self.ink.clear();
        self.progress = ProgressState::empty(self.corridor.total_pixel_count());
    }

    /// Progress as of the last [`compute_progress`](Self::compute_progress) or [`clear`](Self::clear).
    #[must_use]
    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    /// The corridor this tracker measures against.
    #[must_use]
    pub fn corridor(&self) -> &CorridorMask {
        &self.corridor
    }

    /// Ink brush width in pixels.
    #[must_use]
    pub fn brush_width(&self) -> f64 {
        self.ink.brush_width()
    }

    /// Completion threshold in percent.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Ink clipped to the corridor, as alpha in row-major order.
    ///
    /// Each pixel is `ink * mask / 255` rounded up, so a pixel is visible exactly
    /// when it would count toward progress.
    pub fn composite_alpha(&mut self) -> Vec<u8> {
        self.ink
            .alpha()
            .iter()
            .zip(self.corridor.alpha())
            .map(|(&ink, &mask)| {
                u8::try_from((u16::from(ink) * u16::from(mask)).div_ceil(255)).unwrap_or(u8::MAX)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tracewise_path::{GlyphPath, SampledPath, SamplerConfig};

    use super::*;

    const CORRIDOR: f64 = 30.0;

    /// A 160 px horizontal corridor, about 5500 px in area.
    fn horizontal() -> SampledPath {
        SampledPath::new(
            &GlyphPath::parse("M0 0 L100 0"),
            Size::new(200.0, 200.0),
            &SamplerConfig::default(),
        )
    }

    fn tracker(path: &SampledPath, brush: &BrushConfig) -> CoverageTracker {
        CoverageTracker::new(CorridorMask::build(path, CORRIDOR), CORRIDOR, brush)
    }

    /// A brush a little wider than the corridor, so tracing the centerline covers all of it.
    fn wide_brush() -> BrushConfig {
        BrushConfig::default()
            .with_corridor_ratio(1.2)
            .with_max_width(100.0)
    }

    fn trace_centerline(tracker: &mut CoverageTracker, path: &SampledPath, stamps: usize) {
        let mut prev = None;
        for i in 0..stamps {
            let l = path.total_length() * i as f64 / (stamps - 1) as f64;
            let p = path.point_at_length(l).unwrap().position;
            tracker.paint_segment(prev, p);
            prev = Some(p);
        }
    }

    #[test]
    fn tracing_the_centerline_completes() {
        let path = horizontal();
        let mut tracker = tracker(&path, &wide_brush());
        assert!(tracker.corridor().total_pixel_count() > 5000);

        trace_centerline(&mut tracker, &path, 40);
        let progress = tracker.compute_progress();
        assert!(progress.percent >= 98.0, "{progress:?}");
        assert!(progress.completed);
        assert_eq!(progress.total_pixels, tracker.corridor().total_pixel_count());
    }

    #[test]
    fn clear_resets_and_the_same_trace_completes_again() {
        let path = horizontal();
        let mut tracker = tracker(&path, &wide_brush());
        trace_centerline(&mut tracker, &path, 40);
        let first = tracker.compute_progress();

        tracker.clear();
        assert_eq!(tracker.progress().percent, 0.0);
        assert!(!tracker.progress().completed);
        assert_eq!(tracker.compute_progress().painted_pixels, 0);

        trace_centerline(&mut tracker, &path, 40);
        assert_eq!(tracker.compute_progress(), first);
    }

    #[test]
    fn default_brush_leaves_the_corridor_edges() {
        let path = horizontal();
        let mut tracker = tracker(&path, &BrushConfig::default());
        assert!((tracker.brush_width() - 27.0).abs() < 1e-9);
        trace_centerline(&mut tracker, &path, 40);
        let progress = tracker.compute_progress();
        assert!(progress.percent > 60.0, "{progress:?}");
        assert!(!progress.completed, "{progress:?}");
    }

    #[test]
    fn painted_pixels_never_decrease() {
        let path = horizontal();
        let mut tracker = tracker(&path, &BrushConfig::default());
        let mut last = 0;
        let mut prev = None;
        for i in 0..20 {
            let p = path.point_at_length(f64::from(i) * 8.0).unwrap().position;
            tracker.paint_segment(prev, p);
            prev = Some(p);
            let painted = tracker.compute_progress().painted_pixels;
            assert!(painted >= last);
            last = painted;
        }
        assert!(last > 0);
    }

    #[test]
    fn completion_is_sticky() {
        let path = horizontal();
        let mut tracker = tracker(&path, &wide_brush()).with_threshold(10.0);
        trace_centerline(&mut tracker, &path, 40);
        assert!(tracker.compute_progress().completed);
        tracker.threshold = 101.0;
        assert!(tracker.compute_progress().completed);
    }

    #[test]
    fn painting_off_canvas_is_clipped() {
        let path = horizontal();
        let mut tracker = tracker(&path, &BrushConfig::default());
        tracker.paint_segment(None, Point::new(-500.0, -500.0));
        tracker.paint_segment(Some(Point::new(-500.0, -500.0)), Point::new(-300.0, 900.0));
        let progress = tracker.compute_progress();
        assert_eq!(progress.painted_pixels, 0);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn empty_corridor_reports_zero() {
        let path = SampledPath::new(
            &GlyphPath::parse(""),
            Size::new(50.0, 50.0),
            &SamplerConfig::default(),
        );
        let mut tracker = tracker(&path, &BrushConfig::default()).with_threshold(0.0);
        tracker.paint_segment(None, Point::new(25.0, 25.0));
        let progress = tracker.compute_progress();
        assert_eq!(progress, ProgressState::empty(0));
        assert!(progress.percent.is_finite());
    }

    #[test]
    fn composite_is_visible_exactly_where_progress_counts() {
        let path = horizontal();
        let mut tracker = tracker(&path, &BrushConfig::default());
        tracker.paint_segment(None, Point::new(100.0, 100.0));
        tracker.paint_segment(Some(Point::new(100.0, 100.0)), Point::new(100.0, 10.0));
        let painted = tracker.compute_progress().painted_pixels;
        let composite = tracker.composite_alpha();
        assert_eq!(composite.iter().filter(|&&a| a > 0).count(), painted);
        // Ink above the corridor is not shown.
        assert_eq!(composite[20 * 200 + 100], 0);
    }
}
