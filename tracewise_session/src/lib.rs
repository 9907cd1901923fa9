// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tracewise_session --heading-base-level=0

//! Tracewise Session: the pointer-driven core of a letter-tracing exercise.
//!
//! A [`TracingSession`] wires pointer input to the geometry of
//! `tracewise_path` and the coverage rasters of `tracewise_coverage`:
//!
//! - A stroke may only start inside the glyph's start region.
//! - Every pointer position is snapped onto the path before it is inked, so a
//!   wandering pointer is pulled back into the corridor instead of rejected.
//! - Coverage is rescanned at most once per [`SessionConfig::progress_interval`]
//!   while dragging, and always when a stroke ends.
//!
//! Each call returns the [`TraceEvent`]s it produced. The session never reads a
//! clock: hosts pass the event time, and call [`TracingSession::poll`] when
//! [`TracingSession::next_deadline`] passes.
//!
//! ```rust
//! use std::time::{Duration, Instant};
//!
//! use kurbo::{Point, Size};
//! use tracewise_session::{GlyphRecord, SessionConfig, TraceEvent, TracingSession};
//!
//! let glyph = GlyphRecord::new("I", "M10 10 L10 90").with_trace_width(20.0);
//! let mut session =
//!     TracingSession::from_glyph(&glyph, Size::new(100.0, 100.0), SessionConfig::default());
//!
//! // Too far from the start of the stroke.
//! let t0 = Instant::now();
//! let events = session.pointer_down(Point::new(50.0, 80.0), t0);
//! assert!(matches!(events[0], TraceEvent::GateRejected { .. }));
//!
//! // Start at the top and drag to the bottom, wobbling sideways.
//! session.pointer_down(Point::new(52.0, 12.0), t0);
//! for i in 1..=16 {
//!     let wobble = if i % 2 == 0 { 6.0 } else { -6.0 };
//!     let at = t0 + Duration::from_millis(16 * i);
//!     session.pointer_move(Point::new(50.0 + wobble, 10.0 + 5.0 * i as f64), at);
//! }
//! let events = session.pointer_up(t0 + Duration::from_millis(300));
//! assert!(events.iter().any(|e| matches!(e, TraceEvent::StrokeCompleted(_))));
//! assert!(session.progress().percent > 50.0);
//! ```
//!
//! The freeform mode ([`TraceMode::Freeform`]) inks raw input without a gate and
//! measures progress by point count.

mod clear;
mod config;
mod glyph;
mod session;
mod throttle;
mod tracer;

pub use clear::ClearHandle;
pub use config::SessionConfig;
pub use glyph::GlyphRecord;
pub use session::{GlyphStatus, PointerState, TraceEvent, TraceEvents, TracingSession};
pub use throttle::ProgressThrottle;
pub use tracer::{ConstrainedTracer, FreeformTracer, TraceMode, Tracer};

// Re-exported so hosts can configure sessions and name event payloads without extra dependencies.
pub use tracewise_coverage::{BrushConfig, ProgressState};
pub use tracewise_path::{ProjectedPoint, SamplerConfig};
