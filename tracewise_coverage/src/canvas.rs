// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Off-screen alpha raster drawn with the sparse-strips CPU renderer.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size};
use peniko::Color;
use vello_cpu::kurbo::{
    BezPath, Cap as CpuCap, Circle, Join as CpuJoin, Point as CpuPoint, Shape, Stroke,
};
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

/// Flattening tolerance for round shapes, in pixels.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Converts a frame size to raster dimensions, rounding and clamping into `u16`.
#[must_use]
pub fn raster_dims(size: Size) -> (u16, u16) {
    fn dim(v: f64) -> u16 {
        if v.is_nan() {
            return 0;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "clamped into the u16 range first"
        )]
        let d = v.round().clamp(0.0, f64::from(u16::MAX)) as u16;
        d
    }
    (dim(size.width), dim(size.height))
}

/// A width×height alpha plane that accumulates round-capped strokes and discs.
///
/// Drawing is queued on a `vello_cpu` [`RenderContext`] and only rasterized when
/// the alpha plane is read. Each resolve merges the new coverage into the plane
/// with `max`, so the plane only ever gains alpha until [`clear`](Self::clear).
/// A zero-area canvas accepts drawing and stays empty.
///
/// The render context and its target pixmap are allocated once and reused by
/// every resolve and clear.
pub struct AlphaCanvas {
    width: u16,
    height: u16,
    surface: Option<Surface>,
    alpha: Vec<u8>,
    dirty: bool,
}

/// Render context plus the pixmap it resolves into.
struct Surface {
    ctx: RenderContext,
    pixmap: Pixmap,
}

impl Surface {
    fn new(width: u16, height: u16) -> Self {
        let settings = RenderSettings {
            // Pin the u8 pipeline so coverage counts do not depend on enabled features.
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        let mut surface = Self {
            ctx: RenderContext::new_with(width, height, settings),
            pixmap: Pixmap::new(width, height),
        };
        surface.reset();
        surface
    }

    /// Drops queued drawing and restores the white paint.
    fn reset(&mut self) {
        self.ctx.reset();
        self.ctx.set_paint(Color::WHITE);
    }
}

impl fmt::Debug for AlphaCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl AlphaCanvas {
    /// Creates a fully transparent canvas.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let surface = (width > 0 && height > 0).then(|| Surface::new(width, height));
        Self {
            width,
            height,
            surface,
            alpha: vec![0; usize::from(width) * usize::from(height)],
            dirty: false,
        }
    }

    /// Creates a canvas covering `size`, see [`raster_dims`].
    #[must_use]
    pub fn with_size(size: Size) -> Self {
        let (w, h) = raster_dims(size);
        Self::new(w, h)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Strokes one connected polyline with round caps and joins.
    ///
    /// Consecutive duplicate points are collapsed; fewer than two distinct
    /// points draw nothing.
    pub fn stroke_polyline(&mut self, points: impl IntoIterator<Item = Point>, width: f64) {
        if !(width > 0.0 && width.is_finite()) {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let mut path = BezPath::new();
        let mut last: Option<Point> = None;
        let mut segments = 0_usize;
        for p in points {
            match last {
                None => path.move_to(CpuPoint::new(p.x, p.y)),
                Some(prev) if prev == p => continue,
                Some(_) => {
                    path.line_to(CpuPoint::new(p.x, p.y));
                    segments += 1;
                }
            }
            last = Some(p);
        }
        if segments == 0 {
            return;
        }
        surface.ctx.set_stroke(
            Stroke::new(width)
                .with_caps(CpuCap::Round)
                .with_join(CpuJoin::Round),
        );
        surface.ctx.stroke_path(&path);
        self.dirty = true;
    }

    /// Fills a disc.
    pub fn fill_disc(&mut self, center: Point, radius: f64) {
        if !(radius > 0.0 && radius.is_finite()) {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let circle = Circle::new(CpuPoint::new(center.x, center.y), radius);
        surface.ctx.fill_path(&circle.to_path(SHAPE_TOLERANCE));
        self.dirty = true;
    }

    /// Resets every pixel to transparent and drops queued drawing.
    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.reset();
        }
        self.alpha.fill(0);
        self.dirty = false;
    }

    /// The alpha plane in row-major order, rasterizing any queued drawing first.
    pub fn alpha(&mut self) -> &[u8] {
        self.resolve();
        &self.alpha
    }

    /// Number of pixels with non-zero alpha.
    pub fn count_nonzero(&mut self) -> usize {
        self.alpha().iter().filter(|&&a| a > 0).count()
    }

    fn resolve(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.ctx.flush();
        surface.ctx.render_to_pixmap(&mut surface.pixmap);
        // Premultiplication leaves alpha untouched.
        for (dst, px) in self.alpha.iter_mut().zip(surface.pixmap.data()) {
            *dst = (*dst).max(px.a);
        }
        // Everything queued so far now lives in the alpha plane.
        surface.reset();
    }
}
