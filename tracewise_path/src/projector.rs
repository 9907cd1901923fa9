// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-point projection onto a sampled path, and lookup by arc length.

use kurbo::{Point, Vec2};

use crate::command::unit_or_x;
use crate::sampler::{Sample, SampledPath};

/// How far the projection leans toward the closer neighbour of the nearest sample.
pub const NEIGHBOR_BLEND: f64 = 0.3;

/// A query point snapped onto the sampled path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedPoint {
    /// The chosen point on the path.
    pub position: Point,
    /// Unit tangent at the chosen point.
    pub tangent: Vec2,
    /// Unit normal at the chosen point.
    pub normal: Vec2,
    /// Distance from the query point to [`position`](Self::position).
    pub distance_from_path: f64,
    /// Index of the nearest raw sample.
    pub path_index: usize,
}

impl SampledPath {
    /// Snaps `pt` onto the path.
    ///
    /// Finds the nearest sample by linear scan, then tries a point 30% of the way
    /// toward whichever neighbour is closer to `pt`; that blended point wins only
    /// if it is strictly closer than the sample. `distance_from_path` measures the
    /// point that was chosen. Returns `None` only when there are no samples; points
    /// far from the path still project.
    #[must_use]
    pub fn project(&self, pt: Point) -> Option<ProjectedPoint> {
        let (index, nearest) = self.nearest_sample(pt)?;
        let mut position = nearest.position;
        let mut tangent = nearest.tangent;
        let mut normal = nearest.normal;
        let mut distance = position.distance(pt);

        let samples = self.samples();
        let prev = index.checked_sub(1).map(|i| &samples[i]);
        let next = samples.get(index + 1);
        let neighbor = match (prev, next) {
            (Some(p), Some(n)) => {
                if p.position.distance_squared(pt) <= n.position.distance_squared(pt) {
                    Some(p)
                } else {
                    Some(n)
                }
            }
            (p, n) => p.or(n),
        };
        if let Some(neighbor) = neighbor {
            let blended = nearest.position.lerp(neighbor.position, NEIGHBOR_BLEND);
            let blended_distance = blended.distance(pt);
            if blended_distance < distance {
                position = blended;
                tangent = blend_unit(nearest.tangent, neighbor.tangent, NEIGHBOR_BLEND);
                normal = blend_unit(nearest.normal, neighbor.normal, NEIGHBOR_BLEND);
                distance = blended_distance;
            }
        }

        Some(ProjectedPoint {
            position,
            tangent,
            normal,
            distance_from_path: distance,
            path_index: index,
        })
    }

    /// The sample closest to `pt`; ties go to the earlier sample.
    #[must_use]
    pub fn nearest_sample(&self, pt: Point) -> Option<(usize, &Sample)> {
        let mut best: Option<(usize, &Sample, f64)> = None;
        for (i, s) in self.samples().iter().enumerate() {
            let d = s.position.distance_squared(pt);
            if best.is_none_or(|(_, _, best_d)| d < best_d) {
                best = Some((i, s, d));
            }
        }
        best.map(|(i, s, _)| (i, s))
    }

    /// The point `length` along the path, interpolated between samples.
    ///
    /// `length` is clamped to `[0, total_length]`. Returns `None` when there are
    /// no samples.
    #[must_use]
    pub fn point_at_length(&self, length: f64) -> Option<Sample> {
        let samples = self.samples();
        let first = samples.first()?;
        let length = if length.is_nan() {
            0.0
        } else {
            length.clamp(0.0, self.total_length())
        };

        let upper = samples.partition_point(|s| s.arc_length <= length);
        let seg = upper.saturating_sub(1);
        let a = samples.get(seg).unwrap_or(first);
        let Some(b) = samples.get(seg + 1) else {
            return Some(*a);
        };
        let span = b.arc_length - a.arc_length;
        let f = if span > 0.0 {
            (length - a.arc_length) / span
        } else {
            0.0
        };
        if f <= 0.0 {
            return Some(*a);
        }

        Some(Sample {
            position: a.position.lerp(b.position, f),
            tangent: blend_unit(a.tangent, b.tangent, f),
            normal: blend_unit(a.normal, b.normal, f),
            arc_length: length,
            t: a.t + (b.t - a.t) * f,
            index: seg,
        })
    }
}

/// Linear blend of two unit vectors, renormalized; falls back to `a` when they cancel.
fn blend_unit(a: Vec2, b: Vec2, f: f64) -> Vec2 {
    let v = a.lerp(b, f);
    if v.hypot2() > 0.0 { unit_or_x(v) } else { a }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::{GlyphPath, SamplerConfig};

    fn vertical_line() -> SampledPath {
        SampledPath::new(
            &GlyphPath::parse("M10 10 L10 90"),
            Size::new(100.0, 100.0),
            &SamplerConfig::default(),
        )
    }

    #[test]
    fn projects_onto_vertical_line() {
        let path = vertical_line();
        let p = path.project(Point::new(50.0, 50.0)).unwrap();
        assert!(p.distance_from_path < 1.0, "{p:?}");
        assert!((p.position.y - 50.0).abs() < 1.0);
        assert!((p.position.x - 50.0).abs() < 1e-9);
        assert!((p.tangent.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn far_points_still_project() {
        let path = vertical_line();
        let p = path.project(Point::new(-400.0, 30.0)).unwrap();
        assert!((p.position.x - 50.0).abs() < 1e-9);
        assert!((p.distance_from_path - 450.0).abs() < 1.0);
    }

    #[test]
    fn projection_of_a_sample_stays_within_spacing() {
        let path = SampledPath::new(
            &GlyphPath::parse("M0 0 C0 100 100 100 100 0"),
            Size::new(200.0, 200.0),
            &SamplerConfig::default(),
        );
        let spacing = path
            .samples()
            .windows(2)
            .map(|w| w[0].position.distance(w[1].position))
            .fold(0.0, f64::max);
        for s in path.samples() {
            let nudged = s.position + Vec2::new(0.25, -0.25);
            let p = path.project(nudged).unwrap();
            assert!(p.distance_from_path <= spacing, "{p:?}");
            assert!(p.distance_from_path <= nudged.distance(s.position) + 1e-12);
        }
    }

    #[test]
    fn blended_point_is_used_only_when_closer() {
        let path = vertical_line();
        let s = path.samples()[40];
        let exact = path.project(s.position).unwrap();
        assert_eq!(exact.position, s.position);
        assert_eq!(exact.distance_from_path, 0.0);
        assert_eq!(exact.path_index, 40);
    }

    #[test]
    fn empty_path_projects_to_nothing() {
        let path = SampledPath::empty(Size::new(10.0, 10.0));
        assert!(path.project(Point::new(1.0, 1.0)).is_none());
        assert!(path.point_at_length(0.0).is_none());
    }

    #[test]
    fn point_at_length_interpolates_and_clamps() {
        let path = vertical_line();
        let start = path.point_at_length(-5.0).unwrap();
        assert_eq!(start.position, path.samples()[0].position);

        let end = path.point_at_length(1e9).unwrap();
        assert_eq!(end.position, path.samples()[path.len() - 1].position);

        let mid = path.point_at_length(41.0).unwrap();
        assert!((mid.position.y - 51.0).abs() < 1e-6, "{mid:?}");
        assert!((mid.position.x - 50.0).abs() < 1e-9);
        assert_eq!(mid.arc_length, 41.0);
    }
}
