// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ink layer and the brush that paints it.

use kurbo::{Point, Size};

use crate::canvas::AlphaCanvas;

/// How wide the ink brush is relative to the corridor.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrushConfig {
    /// Brush width as a fraction of the corridor width.
    pub corridor_ratio: f64,
    /// Absolute cap on the brush width, in pixels.
    pub max_width: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            corridor_ratio: 0.9,
            max_width: 35.0,
        }
    }
}

impl BrushConfig {
    /// Returns a copy with a different corridor ratio.
    #[must_use]
    pub fn with_corridor_ratio(mut self, corridor_ratio: f64) -> Self {
        self.corridor_ratio = corridor_ratio;
        self
    }

    /// Returns a copy with a different width cap.
    #[must_use]
    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = max_width;
        self
    }

    /// Brush width for a corridor of `corridor_width` pixels.
    #[must_use]
    pub fn width_for(&self, corridor_width: f64) -> f64 {
        (corridor_width * self.corridor_ratio).min(self.max_width)
    }
}

/// Append-only ink raster painted with a fixed-width round brush.
#[derive(Debug)]
pub struct InkBitmap {
    canvas: AlphaCanvas,
    brush_width: f64,
}

impl InkBitmap {
    /// Creates a transparent ink layer covering `frame`.
    #[must_use]
    pub fn new(frame: Size, brush_width: f64) -> Self {
        Self {
            canvas: AlphaCanvas::with_size(frame),
            brush_width,
        }
    }

    /// Brush width in pixels.
    #[must_use]
    pub fn brush_width(&self) -> f64 {
        self.brush_width
    }

    /// Paints from `from` to `to`, or a single dot at `to` when a stroke starts.
    ///
    /// Anything outside the raster is clipped.
    pub fn paint_segment(&mut self, from: Option<Point>, to: Point) {
        match from {
            Some(from) if from != to => {
                self.canvas.stroke_polyline([from, to], self.brush_width);
            }
            _ => self.canvas.fill_disc(to, self.brush_width / 2.0),
        }
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Ink alpha in row-major order.
    pub fn alpha(&mut self) -> &[u8] {
        self.canvas.alpha()
    }

    /// Number of pixels carrying any ink.
    pub fn count_nonzero(&mut self) -> usize {
        self.canvas.count_nonzero()
    }
}
