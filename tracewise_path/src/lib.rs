// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tracewise_path --heading-base-level=0

//! Tracewise Path: the geometric model behind path-locked letter tracing.
//!
//! This crate turns a glyph outline written in a small path-command language
//! into something a tracing exercise can query cheaply:
//! - [`GlyphPath`]: parses `M`/`L`/`Q`/`C` commands and evaluates the path at a
//!   global parameter, including a central-difference tangent.
//! - [`SampledPath`]: a dense polyline fitted (uniform scale, centered) into a
//!   target frame, with per-sample tangent, normal and cumulative arc length.
//! - [`SampledPath::project`]: snaps an arbitrary point onto the polyline.
//! - [`SampledPath::point_at_length`]: binary search over arc length.
//! - [`StartGate`]: whether a point is close enough to the designated start.
//!
//! It does **not** rasterize anything or own pointer state; see
//! `tracewise_coverage` and `tracewise_session` for those layers.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use tracewise_path::{GlyphPath, SampledPath, SamplerConfig, StartGate};
//!
//! let glyph = GlyphPath::parse("M10 10 L10 90");
//! let path = SampledPath::new(&glyph, Size::new(100.0, 100.0), &SamplerConfig::default());
//!
//! // Snap a wandering pointer back onto the stroke.
//! let snapped = path.project(Point::new(60.0, 50.0)).unwrap();
//! assert!((snapped.position.x - 50.0).abs() < 1e-6);
//!
//! // Strokes must start at the top of the line.
//! let gate = StartGate::new(0.0, 18.0);
//! assert!(gate.admits(&path, Point::new(52.0, 12.0)));
//! assert!(!gate.admits(&path, Point::new(50.0, 90.0)));
//! ```
//!
//! Malformed input never fails: unusable commands are dropped and reported
//! through [`GlyphPath::parse_with_issues`], and an empty path samples to an
//! empty polyline that projects to nothing.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod command;
mod gate;
mod projector;
mod sampler;

pub use command::{
    CommandKind, GlyphPath, ParseIssue, ParseIssueKind, PathCommand, TANGENT_EPSILON,
};
pub use gate::StartGate;
pub use projector::{NEIGHBOR_BLEND, ProjectedPoint};
pub use sampler::{Sample, SampledPath, SamplerConfig};
