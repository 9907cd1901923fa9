// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Start gate: strokes may only begin near a chosen point on the path.

use kurbo::Point;

use crate::sampler::{Sample, SampledPath};

/// A disc of `radius` around the point `arc_length` along the path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartGate {
    /// Distance along the path of the gate center, in frame units.
    pub arc_length: f64,
    /// Gate radius in frame units. The boundary is inside the gate.
    pub radius: f64,
}

impl StartGate {
    /// Creates a gate.
    #[must_use]
    pub const fn new(arc_length: f64, radius: f64) -> Self {
        Self { arc_length, radius }
    }

    /// The gate center on `path`, if the path has any samples.
    #[must_use]
    pub fn anchor(&self, path: &SampledPath) -> Option<Sample> {
        path.point_at_length(self.arc_length)
    }

    /// Returns `true` if `pt` is within the gate radius of its anchor.
    #[must_use]
    pub fn admits(&self, path: &SampledPath, pt: Point) -> bool {
        self.anchor(path)
            .is_some_and(|anchor| anchor.position.distance(pt) <= self.radius)
    }
}

impl SampledPath {
    /// Returns `true` if `pt` is within `radius` of the point `start_arc_length`
    /// along the path. Always `false` for an empty path.
    #[must_use]
    pub fn is_in_start_region(&self, pt: Point, start_arc_length: f64, radius: f64) -> bool {
        StartGate::new(start_arc_length, radius).admits(self, pt)
    }
}
