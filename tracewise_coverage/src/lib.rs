// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tracewise_coverage --heading-base-level=0

//! Tracewise Coverage: raster coverage measurement for path-locked tracing.
//!
//! Two alpha rasters the size of the drawing frame are kept side by side:
//! - [`CorridorMask`]: the sampled path stroked as a thick round-capped band,
//!   built once per glyph and frame. Its pixel count is the progress denominator.
//! - [`InkBitmap`]: what the learner has painted, append-only until cleared.
//!
//! [`CoverageTracker`] owns both. Painting only queues drawing on the
//! sparse-strips [`vello_cpu::RenderContext`]; [`CoverageTracker::compute_progress`]
//! rasterizes and scans both planes and is the call to throttle.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use tracewise_coverage::{BrushConfig, CorridorMask, CoverageTracker};
//! use tracewise_path::{GlyphPath, SampledPath, SamplerConfig};
//!
//! let path = SampledPath::new(
//!     &GlyphPath::parse("M0 0 L100 0"),
//!     Size::new(200.0, 200.0),
//!     &SamplerConfig::default(),
//! );
//! let corridor = CorridorMask::build(&path, 30.0);
//! let mut tracker = CoverageTracker::new(corridor, 30.0, &BrushConfig::default());
//!
//! tracker.paint_segment(None, Point::new(20.0, 100.0));
//! tracker.paint_segment(Some(Point::new(20.0, 100.0)), Point::new(100.0, 100.0));
//! let progress = tracker.compute_progress();
//! assert!(progress.percent > 30.0 && !progress.completed);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod canvas;
mod corridor;
mod ink;
mod tracker;

pub use canvas::{AlphaCanvas, raster_dims};
pub use corridor::CorridorMask;
pub use ink::{BrushConfig, InkBitmap};
pub use tracker::{COMPLETION_THRESHOLD, CoverageTracker, ProgressState};
