// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense polyline sampling of a glyph path, fitted into a target frame.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::command::{GlyphPath, unit_or_x};

/// Number of parameter steps used to estimate the raw path length.
const LENGTH_ESTIMATE_STEPS: usize = 200;

/// Upper bound on the number of sample steps for a single path.
const MAX_SAMPLE_STEPS: usize = 1 << 16;

/// Tuning for [`SampledPath::new`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Desired distance between consecutive samples, in path-source units.
    pub spacing: f64,
    /// Minimum number of parameter steps, however short the path.
    pub min_samples: usize,
    /// Fraction of the frame the fitted path may occupy along its tighter axis.
    pub fit_margin: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            spacing: 3.0,
            min_samples: 50,
            fit_margin: 0.8,
        }
    }
}

impl SamplerConfig {
    /// Returns a copy with a different sample spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Returns a copy with a different fit margin.
    #[must_use]
    pub fn with_fit_margin(mut self, fit_margin: f64) -> Self {
        self.fit_margin = fit_margin;
        self
    }

    fn step_count(&self, raw_length: f64) -> usize {
        let wanted = raw_length / self.spacing;
        let wanted = if wanted.is_finite() && wanted > 0.0 {
            wanted.ceil().min(MAX_SAMPLE_STEPS as f64)
        } else {
            0.0
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "non-negative and at most MAX_SAMPLE_STEPS"
        )]
        let steps = wanted as usize;
        steps.max(self.min_samples).clamp(1, MAX_SAMPLE_STEPS)
    }
}

/// One point of the sampled polyline, in frame coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Position in the target frame.
    pub position: Point,
    /// Unit direction of travel.
    pub tangent: Vec2,
    /// Unit perpendicular, the tangent turned 90°.
    pub normal: Vec2,
    /// Distance travelled along the polyline from the first sample.
    pub arc_length: f64,
    /// Global path parameter this sample was evaluated at.
    pub t: f64,
    /// Position of this sample in the polyline.
    pub index: usize,
}

/// A glyph path sampled into a dense polyline and fitted into a frame.
///
/// Built once per glyph and frame size; replaced wholesale when either changes.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledPath {
    samples: Vec<Sample>,
    total_length: f64,
    bounds: Rect,
    frame: Size,
    transform: Affine,
}

impl SampledPath {
    /// Samples `path` and fits it, centered and aspect-preserving, into `frame`.
    ///
    /// The path is evaluated at evenly spaced global parameters, the raw points are
    /// scaled uniformly so the tighter axis fills `fit_margin` of the frame, and arc
    /// length is accumulated over the transformed points. An empty path yields an
    /// empty polyline with zero length.
    #[must_use]
    pub fn new(path: &GlyphPath, frame: Size, config: &SamplerConfig) -> Self {
        if path.is_empty() {
            return Self::empty(frame);
        }

        let raw_length = polyline_length(
            &raw_points(path, LENGTH_ESTIMATE_STEPS)
                .map(|(_, p)| p)
                .collect::<Vec<_>>(),
        );
        let steps = config.step_count(raw_length);
        let raw: Vec<(f64, Point)> = raw_points(path, steps).collect();

        let raw_bounds = raw
            .iter()
            .skip(1)
            .fold(Rect::from_points(raw[0].1, raw[0].1), |r, (_, p)| {
                r.union_pt(*p)
            });
        let transform = fit_transform(raw_bounds, frame, config.fit_margin);
        if !transform.is_finite() {
            // Extents too large to measure in f64 have no usable fit.
            return Self::empty(frame);
        }

        let mut samples = Vec::with_capacity(raw.len());
        let mut arc_length = 0.0;
        let mut prev: Option<Point> = None;
        for (index, (t, raw_pt)) in raw.into_iter().enumerate() {
            let position = transform * raw_pt;
            if let Some(prev) = prev {
                arc_length += prev.distance(position);
            }
            prev = Some(position);
            // A uniform scale keeps directions, so the raw tangent only needs renormalizing.
            let tangent = unit_or_x(path.tangent_at(t));
            samples.push(Sample {
                position,
                tangent,
                normal: tangent.turn_90(),
                arc_length,
                t,
                index,
            });
        }

        let bounds = samples.iter().skip(1).fold(
            Rect::from_points(samples[0].position, samples[0].position),
            |r, s| r.union_pt(s.position),
        );

        Self {
            samples,
            total_length: arc_length,
            bounds,
            frame,
            transform,
        }
    }

    /// A polyline with no samples: no corridor, nothing to trace.
    #[must_use]
    pub fn empty(frame: Size) -> Self {
        Self {
            samples: Vec::new(),
            total_length: 0.0,
            bounds: Rect::from_origin_size(Point::ORIGIN, frame),
            frame,
            transform: Affine::IDENTITY,
        }
    }

    /// The samples in traversal order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns `true` if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Arc length of the whole polyline in frame units.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Bounds of the sampled positions, or the whole frame when empty.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The frame the path was fitted into.
    #[must_use]
    pub fn frame(&self) -> Size {
        self.frame
    }

    /// The path-source to frame transform (uniform scale plus translation).
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// The sample positions, for building strokes from the polyline.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.samples.iter().map(|s| s.position)
    }
}

/// `steps + 1` points at evenly spaced global parameters, both ends included.
fn raw_points(path: &GlyphPath, steps: usize) -> impl Iterator<Item = (f64, Point)> + '_ {
    (0..=steps).map(move |i| {
        let t = i as f64 / steps as f64;
        (t, path.evaluate_at(t))
    })
}

fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Scale-to-fit and center `bounds` inside `frame`, keeping the aspect ratio.
///
/// Degenerate extents count as one unit so a straight vertical or horizontal
/// stroke still fits along its other axis.
fn fit_transform(bounds: Rect, frame: Size, margin: f64) -> Affine {
    let sx = frame.width / bounds.width().max(1.0);
    let sy = frame.height / bounds.height().max(1.0);
    let scale = sx.min(sy) * margin;
    let offset = Vec2::new(
        (frame.width - bounds.width() * scale) / 2.0 - bounds.x0 * scale,
        (frame.height - bounds.height() * scale) / 2.0 - bounds.y0 * scale,
    );
    Affine::translate(offset) * Affine::scale(scale)
}
