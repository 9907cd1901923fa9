// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracing state machine.

use std::time::Instant;

use kurbo::{Point, Size};
use smallvec::SmallVec;
use tracewise_coverage::ProgressState;
use tracewise_path::{GlyphPath, ProjectedPoint, SampledPath, StartGate};

use crate::clear::ClearHandle;
use crate::config::SessionConfig;
use crate::glyph::GlyphRecord;
use crate::throttle::ProgressThrottle;
use crate::tracer::{TraceMode, Tracer};

/// Events produced by one call into the session, in the order they happened.
pub type TraceEvents = SmallVec<[TraceEvent; 4]>;

/// Something the host should react to.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// A pointer-down outside the start region; no stroke began.
    GateRejected {
        /// Where the pointer went down.
        at: Point,
    },
    /// A point was added to the current stroke; see [`TracingSession::stroke`].
    StrokeUpdated {
        /// The snapped point that was added.
        point: ProjectedPoint,
        /// Points in the stroke so far.
        len: usize,
    },
    /// A stroke ended with enough points, or after the glyph was completed.
    StrokeCompleted(Vec<ProjectedPoint>),
    /// Fresh coverage figures.
    Progress(ProgressState),
    /// Coverage reached the completion threshold. Sent once per completion.
    GlyphCompleted,
    /// A clear requested through a [`ClearHandle`] was applied.
    Cleared,
}

/// Whether a stroke is in progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerState {
    /// No stroke.
    #[default]
    Idle,
    /// A stroke is being drawn.
    Drawing,
}

/// Whether the current glyph can be traced at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GlyphStatus {
    /// The glyph has a usable corridor.
    Ready,
    /// The path had no usable geometry or the frame has no area; progress stays at 0%.
    Unavailable,
}

/// One learner tracing one glyph at a time.
///
/// Feed it pointer events in frame coordinates along with the time they
/// happened. Progress scans during a drag are throttled; a scan that falls due
/// between events is run by [`poll`](Self::poll), so hosts should call it from
/// a timer at [`next_deadline`](Self::next_deadline). A scan always runs when a
/// stroke ends.
///
/// Changing the glyph, the frame or the mode rebuilds everything; a clear only
/// erases ink. Each of these starts a new generation, and a scheduled scan from
/// an older generation is discarded instead of reported.
#[derive(Debug)]
pub struct TracingSession {
    config: SessionConfig,
    glyph: GlyphPath,
    frame: Size,
    corridor_width: f64,
    start_fraction: f64,
    start_radius: f64,
    path: SampledPath,
    tracer: Tracer,
    status: GlyphStatus,
    state: PointerState,
    stroke: Vec<ProjectedPoint>,
    last_point: Option<Point>,
    throttle: ProgressThrottle,
    generation: u64,
    clear_requests: ClearHandle,
}

impl TracingSession {
    /// Creates a path-locked session.
    ///
    /// `path` is parsed leniently; `start_arc_length` is in frame units along the
    /// fitted path and is kept proportional to the path length across resizes.
    #[must_use]
    pub fn new(
        path: &str,
        frame: Size,
        corridor_width: f64,
        start_arc_length: f64,
        start_radius: f64,
        config: SessionConfig,
    ) -> Self {
        let glyph = parse_logged(path);
        let sampled = SampledPath::new(&glyph, frame, &config.sampler);
        let start_fraction = if sampled.total_length() > 0.0 {
            start_arc_length / sampled.total_length()
        } else {
            0.0
        };
        Self::assemble(
            config,
            glyph,
            sampled,
            corridor_width,
            start_fraction,
            start_radius,
        )
    }

    /// Creates a path-locked session for a glyph record.
    #[must_use]
    pub fn from_glyph(glyph: &GlyphRecord, frame: Size, config: SessionConfig) -> Self {
        let path = parse_logged(&glyph.svg_path);
        let sampled = SampledPath::new(&path, frame, &config.sampler);
        Self::assemble(
            config,
            path,
            sampled,
            glyph.trace_width,
            glyph.start_arc_length_fraction,
            glyph.start_region_radius,
        )
    }

    fn assemble(
        config: SessionConfig,
        glyph: GlyphPath,
        path: SampledPath,
        corridor_width: f64,
        start_fraction: f64,
        start_radius: f64,
    ) -> Self {
        let frame = path.frame();
        let gate = StartGate::new(start_fraction * path.total_length(), start_radius);
        let tracer = Tracer::build(TraceMode::PathLocked, &path, corridor_width, gate, &config);
        let mut session = Self {
            config,
            glyph,
            frame,
            corridor_width,
            start_fraction,
            start_radius,
            path,
            tracer,
            status: GlyphStatus::Unavailable,
            state: PointerState::Idle,
            stroke: Vec::new(),
            last_point: None,
            throttle: ProgressThrottle::new(config.progress_interval),
            generation: 0,
            clear_requests: ClearHandle::default(),
        };
        session.status = session.evaluate_status();
        session
    }

    /// Replaces the glyph, keeping the frame and mode.
    pub fn set_glyph(&mut self, glyph: &GlyphRecord) {
        self.glyph = parse_logged(&glyph.svg_path);
        self.corridor_width = glyph.trace_width;
        self.start_fraction = glyph.start_arc_length_fraction;
        self.start_radius = glyph.start_region_radius;
        self.rebuild(self.tracer.mode());
    }

    /// Rebuilds path, corridor and ink at a new frame size. Existing ink is discarded.
    pub fn resize(&mut self, frame: Size) {
        self.frame = frame;
        self.rebuild(self.tracer.mode());
    }

    /// Switches between path-locked and freeform tracing, starting from a clean slate.
    pub fn set_mode(&mut self, mode: TraceMode) {
        self.rebuild(mode);
    }

    fn rebuild(&mut self, mode: TraceMode) {
        self.path = SampledPath::new(&self.glyph, self.frame, &self.config.sampler);
        let gate = StartGate::new(
            self.start_fraction * self.path.total_length(),
            self.start_radius,
        );
        self.tracer = Tracer::build(mode, &self.path, self.corridor_width, gate, &self.config);
        self.status = self.evaluate_status();
        self.state = PointerState::Idle;
        self.stroke.clear();
        self.last_point = None;
        self.next_generation();
    }

    fn evaluate_status(&self) -> GlyphStatus {
        let corridor_empty = match &self.tracer {
            Tracer::Constrained(t) => t.coverage().corridor().is_empty(),
            Tracer::Freeform(_) => false,
        };
        if self.path.total_length() > 0.0 && !corridor_empty {
            GlyphStatus::Ready
        } else {
            log::warn!(
                "glyph unavailable: {} commands, path length {}, frame {}x{}",
                self.glyph.commands().len(),
                self.path.total_length(),
                self.frame.width,
                self.frame.height,
            );
            GlyphStatus::Unavailable
        }
    }

    fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Erases the ink, resets progress and empties the stroke.
    ///
    /// The pointer state is kept: a stroke in progress continues from the last
    /// point once the pointer moves again.
    pub fn clear(&mut self) {
        self.tracer.clear();
        self.stroke.clear();
        self.next_generation();
    }

    /// A handle that lets other parts of the application clear this session.
    #[must_use]
    pub fn clear_handle(&self) -> ClearHandle {
        self.clear_requests.clone()
    }

    /// Returns `true` if a pointer-down at `pt` would start a stroke.
    ///
    /// Always `false` while a stroke is in progress.
    #[must_use]
    pub fn hover(&self, pt: Point) -> bool {
        self.state == PointerState::Idle && self.admits(pt)
    }

    fn admits(&self, pt: Point) -> bool {
        match self.tracer.mode() {
            TraceMode::PathLocked => {
                self.status == GlyphStatus::Ready && self.tracer.admits(&self.path, pt)
            }
            TraceMode::Freeform => self.tracer.admits(&self.path, pt),
        }
    }

    /// Starts a stroke if `pt` is inside the start region.
    pub fn pointer_down(&mut self, pt: Point, now: Instant) -> TraceEvents {
        let mut events = self.drain(now);
        if self.state == PointerState::Drawing {
            return events;
        }
        if !self.admits(pt) {
            log::trace!("pointer down at ({}, {}) rejected by start gate", pt.x, pt.y);
            events.push(TraceEvent::GateRejected { at: pt });
            return events;
        }
        let Some(point) = self.tracer.locate(&self.path, pt) else {
            events.push(TraceEvent::GateRejected { at: pt });
            return events;
        };
        self.tracer.paint(None, point.position);
        self.state = PointerState::Drawing;
        self.push_point(point, &mut events);
        events
    }

    /// Extends the current stroke toward `pt`, snapped onto the path.
    ///
    /// Does nothing while idle. Far-away input is still snapped rather than
    /// rejected.
    pub fn pointer_move(&mut self, pt: Point, now: Instant) -> TraceEvents {
        let mut events = self.drain(now);
        if self.state != PointerState::Drawing {
            return events;
        }
        let Some(point) = self.tracer.locate(&self.path, pt) else {
            return events;
        };
        self.tracer.paint(self.last_point, point.position);
        self.push_point(point, &mut events);
        self.throttle.schedule(now, self.generation);
        events
    }

    /// Ends the current stroke. The release position is not inked.
    ///
    /// A pending throttled scan is dropped in favour of the final scan, so a
    /// release runs exactly one.
    pub fn pointer_up(&mut self, now: Instant) -> TraceEvents {
        if self.state != PointerState::Drawing {
            return self.drain(now);
        }
        let mut events = TraceEvents::new();
        self.apply_clear_request(&mut events);
        self.throttle.cancel();
        let progress = self.run_progress(&mut events);
        let stroke = core::mem::take(&mut self.stroke);
        if stroke.len() > self.min_stroke_points() || progress.completed {
            events.push(TraceEvent::StrokeCompleted(stroke));
        }
        self.state = PointerState::Idle;
        self.last_point = None;
        events
    }

    /// The pointer left the surface; ends the stroke like [`pointer_up`](Self::pointer_up).
    pub fn pointer_leave(&mut self, now: Instant) -> TraceEvents {
        self.pointer_up(now)
    }

    /// Applies pending clear requests and runs a progress scan that has fallen due.
    pub fn poll(&mut self, now: Instant) -> TraceEvents {
        self.drain(now)
    }

    /// When [`poll`](Self::poll) next has work to do, if a scan is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    fn drain(&mut self, now: Instant) -> TraceEvents {
        let mut events = TraceEvents::new();
        self.apply_clear_request(&mut events);
        if let Some(generation) = self.throttle.take_due(now) {
            if generation == self.generation {
                self.run_progress(&mut events);
            } else {
                log::trace!(
                    "discarding progress scan from generation {generation}, now at {}",
                    self.generation
                );
            }
        }
        events
    }

    fn apply_clear_request(&mut self, events: &mut TraceEvents) {
        if self.clear_requests.take() {
            self.clear();
            events.push(TraceEvent::Cleared);
        }
    }

    fn run_progress(&mut self, events: &mut TraceEvents) -> ProgressState {
        let was_completed = self.tracer.progress().completed;
        let progress = self.tracer.compute_progress();
        events.push(TraceEvent::Progress(progress));
        if progress.completed && !was_completed {
            log::info!("glyph completed at {:.1}%", progress.percent);
            events.push(TraceEvent::GlyphCompleted);
        }
        progress
    }

    fn push_point(&mut self, point: ProjectedPoint, events: &mut TraceEvents) {
        self.last_point = Some(point.position);
        self.stroke.push(point);
        events.push(TraceEvent::StrokeUpdated {
            point,
            len: self.stroke.len(),
        });
    }

    fn min_stroke_points(&self) -> usize {
        match self.tracer.mode() {
            TraceMode::PathLocked => self.config.min_stroke_points,
            TraceMode::Freeform => self.config.freeform_min_stroke_points,
        }
    }

    /// Progress as last computed.
    #[must_use]
    pub fn progress(&self) -> ProgressState {
        self.tracer.progress()
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Points of the current stroke.
    #[must_use]
    pub fn stroke(&self) -> &[ProjectedPoint] {
        &self.stroke
    }

    /// The fitted path of the current glyph.
    #[must_use]
    pub fn path(&self) -> &SampledPath {
        &self.path
    }

    /// Whether the current glyph can be traced.
    #[must_use]
    pub fn status(&self) -> GlyphStatus {
        self.status
    }

    /// The active tracing mode.
    #[must_use]
    pub fn mode(&self) -> TraceMode {
        self.tracer.mode()
    }

    /// The frame size paths are fitted into.
    #[must_use]
    pub fn frame(&self) -> Size {
        self.frame
    }

    /// The start gate in frame units, as currently derived from the path length.
    #[must_use]
    pub fn start_gate(&self) -> StartGate {
        StartGate::new(
            self.start_fraction * self.path.total_length(),
            self.start_radius,
        )
    }

    /// The active tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Visible ink for compositing over the glyph, as alpha in row-major order.
    ///
    /// Cheap enough to call on every input event; it does not touch progress.
    pub fn composite_alpha(&mut self) -> Vec<u8> {
        self.tracer.composite_alpha()
    }
}

fn parse_logged(source: &str) -> GlyphPath {
    let (glyph, issues) = GlyphPath::parse_with_issues(source);
    for issue in &issues {
        log::warn!("glyph path: {issue}");
    }
    glyph
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn vertical() -> TracingSession {
        TracingSession::new(
            "M10 10 L10 90",
            Size::new(100.0, 100.0),
            20.0,
            0.0,
            18.0,
            SessionConfig::default(),
        )
    }

    #[test]
    fn starts_idle_and_ready() {
        let session = vertical();
        assert_eq!(session.state(), PointerState::Idle);
        assert_eq!(session.status(), GlyphStatus::Ready);
        assert_eq!(session.mode(), TraceMode::PathLocked);
        assert_eq!(session.progress(), ProgressState::empty(session.progress().total_pixels));
        assert!(session.progress().total_pixels > 0);
    }

    #[test]
    fn hover_reports_start_region_only_while_idle() {
        let mut session = vertical();
        let now = Instant::now();
        assert!(session.hover(Point::new(50.0, 15.0)));
        assert!(!session.hover(Point::new(50.0, 60.0)));
        session.pointer_down(Point::new(50.0, 15.0), now);
        assert!(!session.hover(Point::new(50.0, 15.0)));
    }

    #[test]
    fn pointer_down_while_drawing_is_ignored() {
        let mut session = vertical();
        let now = Instant::now();
        session.pointer_down(Point::new(50.0, 10.0), now);
        assert!(session.pointer_down(Point::new(50.0, 10.0), now).is_empty());
        assert_eq!(session.stroke().len(), 1);
    }

    #[test]
    fn start_gate_scales_with_resize() {
        let mut session = TracingSession::new(
            "M10 10 L10 90",
            Size::new(100.0, 100.0),
            20.0,
            40.0,
            5.0,
            SessionConfig::default(),
        );
        assert!((session.start_gate().arc_length - 40.0).abs() < 1e-9);
        session.resize(Size::new(200.0, 200.0));
        assert!((session.start_gate().arc_length - 80.0).abs() < 1e-9);
        assert!(session.hover(Point::new(100.0, 100.0)));
    }

    #[test]
    fn clear_keeps_drawing_from_last_point() {
        let mut session = vertical();
        let t0 = Instant::now();
        session.pointer_down(Point::new(50.0, 10.0), t0);
        session.pointer_move(Point::new(50.0, 30.0), t0 + Duration::from_millis(10));
        session.clear();
        assert_eq!(session.state(), PointerState::Drawing);
        assert!(session.stroke().is_empty());

        let events = session.pointer_move(Point::new(50.0, 40.0), t0 + Duration::from_millis(20));
        assert!(matches!(events[0], TraceEvent::StrokeUpdated { len: 1, .. }));
        let events = session.pointer_up(t0 + Duration::from_millis(30));
        let TraceEvent::Progress(progress) = events[0] else {
            panic!("expected progress, got {events:?}");
        };
        // Only the 30..40 segment was inked after the clear.
        assert!(progress.percent > 5.0 && progress.percent < 30.0, "{progress:?}");
    }
}
