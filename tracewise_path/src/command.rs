// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compact path-command language: parsing and parametric evaluation.
//!
//! A glyph outline is written as a sequence of command letters, each followed
//! by its coordinates:
//!
//! - `M x y`: move to a point.
//! - `L x y`: straight line to a point.
//! - `Q cx cy x y`: quadratic Bézier through one control point.
//! - `C c1x c1y c2x c2y x y`: cubic Bézier through two control points.
//!
//! All coordinates are absolute. Parsing never fails: malformed commands are
//! dropped and reported as [`ParseIssue`]s, and the remaining commands are kept.

use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{CubicBez, Line, ParamCurve, Point, QuadBez, Vec2};

/// Parameter step used for the central-difference tangent estimate.
pub const TANGENT_EPSILON: f64 = 0.001;

/// The kind of a parsed path command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    /// Start a new point without drawing.
    Move,
    /// Straight line from the previous end point.
    Line,
    /// Quadratic Bézier from the previous end point.
    Quadratic,
    /// Cubic Bézier from the previous end point.
    Cubic,
}

impl CommandKind {
    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'M' => Some(Self::Move),
            'L' => Some(Self::Line),
            'Q' => Some(Self::Quadratic),
            'C' => Some(Self::Cubic),
            _ => None,
        }
    }

    /// Number of points (not coordinates) carried by this kind of command.
    #[must_use]
    pub const fn point_count(self) -> usize {
        match self {
            Self::Move | Self::Line => 1,
            Self::Quadratic => 2,
            Self::Cubic => 3,
        }
    }

    /// The upper-case command letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Line => 'L',
            Self::Quadratic => 'Q',
            Self::Cubic => 'C',
        }
    }
}

/// One parsed command: its kind plus one to three points in path-source units.
///
/// The last point is always the end point of the segment; any points before it
/// are Bézier control points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathCommand {
    kind: CommandKind,
    points: [Point; 3],
}

impl PathCommand {
    /// A move to `p`.
    #[must_use]
    pub const fn move_to(p: Point) -> Self {
        Self {
            kind: CommandKind::Move,
            points: [p, Point::ORIGIN, Point::ORIGIN],
        }
    }

    /// A line to `p`.
    #[must_use]
    pub const fn line_to(p: Point) -> Self {
        Self {
            kind: CommandKind::Line,
            points: [p, Point::ORIGIN, Point::ORIGIN],
        }
    }

    /// A quadratic Bézier with control point `c` ending at `p`.
    #[must_use]
    pub const fn quad_to(c: Point, p: Point) -> Self {
        Self {
            kind: CommandKind::Quadratic,
            points: [c, p, Point::ORIGIN],
        }
    }

    /// A cubic Bézier with control points `c1`, `c2` ending at `p`.
    #[must_use]
    pub const fn cubic_to(c1: Point, c2: Point, p: Point) -> Self {
        Self {
            kind: CommandKind::Cubic,
            points: [c1, c2, p],
        }
    }

    fn from_coords(kind: CommandKind, coords: &[f64]) -> Self {
        let pt = |i: usize| Point::new(coords[2 * i], coords[2 * i + 1]);
        match kind {
            CommandKind::Move => Self::move_to(pt(0)),
            CommandKind::Line => Self::line_to(pt(0)),
            CommandKind::Quadratic => Self::quad_to(pt(0), pt(1)),
            CommandKind::Cubic => Self::cubic_to(pt(0), pt(1), pt(2)),
        }
    }

    /// The kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The points of this command, control points first.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points[..self.kind.point_count()]
    }

    /// The point this command ends at.
    #[must_use]
    pub fn end_point(&self) -> Point {
        self.points[self.kind.point_count() - 1]
    }

    /// Evaluates this command at local parameter `t` in `[0, 1]`, starting from `start`.
    fn eval(&self, start: Point, t: f64) -> Point {
        let p = &self.points;
        match self.kind {
            CommandKind::Move => p[0],
            CommandKind::Line => Line::new(start, p[0]).eval(t),
            CommandKind::Quadratic => QuadBez::new(start, p[0], p[1]).eval(t),
            CommandKind::Cubic => CubicBez::new(start, p[0], p[1], p[2]).eval(t),
        }
    }
}

/// Why a command was dropped or flagged while parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseIssueKind {
    /// A coordinate token was not a finite number; the whole command was dropped.
    MalformedNumber,
    /// Fewer coordinates than the command needs; the incomplete group was dropped.
    MissingCoordinates,
    /// A letter other than `M`, `L`, `Q`, `C` ended the path.
    UnsupportedCommand,
    /// A lower-case (relative) letter was read as absolute.
    RelativeCommand,
}

/// A non-fatal diagnostic produced while parsing a path string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseIssue {
    /// Zero-based position of the command letter among all letters in the source.
    pub command_index: usize,
    /// The command letter as written.
    pub letter: char,
    /// What went wrong.
    pub kind: ParseIssueKind,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ParseIssueKind::MalformedNumber => "has a malformed coordinate and was dropped",
            ParseIssueKind::MissingCoordinates => "is missing coordinates",
            ParseIssueKind::UnsupportedCommand => "is not supported and ends the path",
            ParseIssueKind::RelativeCommand => "is relative and was read as absolute",
        };
        write!(f, "command {} (`{}`) {what}", self.command_index, self.letter)
    }
}

impl core::error::Error for ParseIssue {}

/// A parsed glyph outline.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphPath {
    commands: Vec<PathCommand>,
}

impl GlyphPath {
    /// Wraps an already-built command list.
    #[must_use]
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Parses a path string, discarding diagnostics.
    #[must_use]
    pub fn parse(src: &str) -> Self {
        Self::parse_with_issues(src).0
    }

    /// Parses a path string, returning the usable commands and every diagnostic.
    ///
    /// Command boundaries are ASCII letters other than `e`/`E` (which belong to
    /// exponents). Tokens inside a command are separated by whitespace or commas.
    /// Coordinates beyond the first group repeat the command implicitly, with a
    /// repeated move becoming a line.
    pub fn parse_with_issues(src: &str) -> (Self, Vec<ParseIssue>) {
        let mut commands = Vec::new();
        let mut issues = Vec::new();

        for (command_index, (letter, body)) in split_commands(src).enumerate() {
            let Some(kind) = CommandKind::from_letter(letter) else {
                if !letter.eq_ignore_ascii_case(&'z') {
                    issues.push(ParseIssue {
                        command_index,
                        letter,
                        kind: ParseIssueKind::UnsupportedCommand,
                    });
                }
                break;
            };
            let issue = |kind| ParseIssue {
                command_index,
                letter,
                kind,
            };
            if letter.is_ascii_lowercase() {
                issues.push(issue(ParseIssueKind::RelativeCommand));
            }

            let mut coords = Vec::new();
            let mut malformed = false;
            for token in body
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
            {
                match token.parse::<f64>() {
                    Ok(v) if v.is_finite() => coords.push(v),
                    _ => {
                        malformed = true;
                        break;
                    }
                }
            }
            if malformed {
                issues.push(issue(ParseIssueKind::MalformedNumber));
                continue;
            }

            let group = 2 * kind.point_count();
            let mut groups = coords.chunks_exact(group);
            let mut repeat_kind = kind;
            let mut emitted = false;
            for chunk in groups.by_ref() {
                commands.push(PathCommand::from_coords(repeat_kind, chunk));
                if repeat_kind == CommandKind::Move {
                    repeat_kind = CommandKind::Line;
                }
                emitted = true;
            }
            if !emitted || !groups.remainder().is_empty() {
                issues.push(issue(ParseIssueKind::MissingCoordinates));
            }
        }

        (Self { commands }, issues)
    }

    /// The parsed commands in path order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Returns `true` if no usable command was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The point each command starts from: the previous end point, or the origin.
    fn segment_start(&self, index: usize) -> Point {
        index
            .checked_sub(1)
            .map_or(Point::ORIGIN, |prev| self.commands[prev].end_point())
    }

    /// Evaluates the path at global parameter `t` in `[0, 1]`.
    ///
    /// The parameter is split into equal spans, one per command, regardless of
    /// how long each command is. This is a coarse mapping; arc length is derived
    /// afterwards from the sampled points.
    #[must_use]
    pub fn evaluate_at(&self, t: f64) -> Point {
        let Some(last) = self.commands.last() else {
            return Point::ORIGIN;
        };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.commands.len();
        let scaled = t * n as f64;
        let index = scaled.floor();
        if index >= n as f64 {
            return last.end_point();
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "index is a non-negative integer below the command count"
        )]
        let i = index as usize;
        self.commands[i].eval(self.segment_start(i), scaled - index)
    }

    /// Unit tangent at global parameter `t`, by central difference.
    ///
    /// The difference window is clamped to `[0, 1]`. A zero-length difference
    /// (for example inside a move) yields unit +X.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vec2 {
        let p1 = self.evaluate_at((t - TANGENT_EPSILON).max(0.0));
        let p2 = self.evaluate_at((t + TANGENT_EPSILON).min(1.0));
        unit_or_x(p2 - p1)
    }
}

/// Normalizes `v`, falling back to unit +X for zero or non-finite vectors.
pub(crate) fn unit_or_x(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Vec2::new(1.0, 0.0)
    }
}

/// Splits the source into `(letter, body)` pairs. Text before the first letter is ignored.
fn split_commands(src: &str) -> impl Iterator<Item = (char, &str)> {
    let is_boundary = |c: char| c.is_ascii_alphabetic() && !c.eq_ignore_ascii_case(&'e');
    let mut rest = src.find(is_boundary).map_or("", |start| &src[start..]);
    core::iter::from_fn(move || {
        let letter = rest.chars().next()?;
        let body = &rest[letter.len_utf8()..];
        let end = body.find(is_boundary).unwrap_or(body.len());
        rest = &body[end..];
        Some((letter, &body[..end]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_supported_commands() {
        let path = GlyphPath::parse("M10 10 L20,20 Q30 30 40 40 C1 2 3 4 5 6");
        let kinds: Vec<_> = path.commands().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [
                CommandKind::Move,
                CommandKind::Line,
                CommandKind::Quadratic,
                CommandKind::Cubic
            ]
        );
        assert_eq!(path.commands()[3].end_point(), Point::new(5.0, 6.0));
        assert_eq!(
            path.commands()[2].points(),
            &[Point::new(30.0, 30.0), Point::new(40.0, 40.0)]
        );
    }

    #[test]
    fn malformed_number_drops_only_that_command() {
        let (path, issues) = GlyphPath::parse_with_issues("M0 0 L1 1.2.3 L5 5");
        assert_eq!(path.commands().len(), 2);
        assert_eq!(path.commands()[1].end_point(), Point::new(5.0, 5.0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, ParseIssueKind::MalformedNumber);
        assert_eq!(issues[0].command_index, 1);
    }

    #[test]
    fn non_finite_numbers_are_malformed() {
        let (path, issues) = GlyphPath::parse_with_issues("M0 0 L1 1 L 1 1");
        assert_eq!(path.commands().len(), 3);
        assert!(issues.is_empty());

        // Overflows to infinity.
        let (path, issues) = GlyphPath::parse_with_issues("M0 0 L1e999 1");
        assert_eq!(path.commands().len(), 1);
        assert_eq!(issues[0].kind, ParseIssueKind::MalformedNumber);
    }

    #[test]
    fn exponents_are_numbers_not_commands() {
        let path = GlyphPath::parse("M1e1 2E1");
        assert_eq!(path.commands()[0].end_point(), Point::new(10.0, 20.0));
    }

    #[test]
    fn unsupported_letter_ends_the_path() {
        let (path, issues) = GlyphPath::parse_with_issues("M0 0 L1 1 H5 L9 9");
        assert_eq!(path.commands().len(), 2);
        assert_eq!(issues[0].kind, ParseIssueKind::UnsupportedCommand);
        assert_eq!(issues[0].letter, 'H');

        let (path, issues) = GlyphPath::parse_with_issues("M0 0 L1 1 Z");
        assert_eq!(path.commands().len(), 2);
        assert!(issues.is_empty());
    }

    #[test]
    fn relative_letters_are_read_as_absolute_and_flagged() {
        let (path, issues) = GlyphPath::parse_with_issues("m1 1 l2 2");
        assert_eq!(path.commands()[1].end_point(), Point::new(2.0, 2.0));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == ParseIssueKind::RelativeCommand));
    }

    #[test]
    fn extra_coordinates_repeat_the_command() {
        let (path, issues) = GlyphPath::parse_with_issues("M0 0 10 10 20 20 5");
        let kinds: Vec<_> = path.commands().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [CommandKind::Move, CommandKind::Line, CommandKind::Line]
        );
        assert_eq!(issues[0].kind, ParseIssueKind::MissingCoordinates);
    }

    #[test]
    fn empty_and_garbage_inputs_parse_to_nothing() {
        assert!(GlyphPath::parse("").is_empty());
        assert!(GlyphPath::parse("   12 34 ").is_empty());
        assert!(GlyphPath::parse("Mfoo bar").is_empty());
        assert!(GlyphPath::parse("X1 2 3").is_empty());
    }

    #[test]
    fn evaluate_splits_parameter_evenly_per_command() {
        let path = GlyphPath::parse("M0 0 L10 0 L10 100");
        // Three commands: [0, 1/3) is the move, [1/3, 2/3) the short line.
        assert_eq!(path.evaluate_at(0.1), Point::new(0.0, 0.0));
        let mid_first_line = path.evaluate_at(0.5);
        assert!((mid_first_line.x - 5.0).abs() < 1e-9);
        assert_eq!(path.evaluate_at(1.0), Point::new(10.0, 100.0));
        assert_eq!(path.evaluate_at(7.0), Point::new(10.0, 100.0));
    }

    #[test]
    fn evaluates_curves_with_bernstein_basis() {
        let path = GlyphPath::parse("M0 0 Q50 100 100 0");
        // t = 0.75 is the middle of the quadratic.
        let p = path.evaluate_at(0.75);
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);

        let cubic = GlyphPath::parse("M0 0 C0 100 100 100 100 0");
        let p = cubic.evaluate_at(0.75);
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn tangent_follows_segment_direction() {
        let path = GlyphPath::parse("M0 0 L0 50");
        let t = path.tangent_at(0.75);
        assert!(t.x.abs() < 1e-9);
        assert!((t.y - 1.0).abs() < 1e-9);
        // Inside the move nothing changes, so the tangent defaults to +X.
        assert_eq!(path.tangent_at(0.2), Vec2::new(1.0, 0.0));
        assert_eq!(GlyphPath::default().tangent_at(0.5), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn issue_display_names_the_command() {
        let issue = ParseIssue {
            command_index: 2,
            letter: 'q',
            kind: ParseIssueKind::RelativeCommand,
        };
        assert_eq!(
            alloc::format!("{issue}"),
            "command 2 (`q`) is relative and was read as absolute"
        );
    }
}
