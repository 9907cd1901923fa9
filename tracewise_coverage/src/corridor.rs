// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The corridor: a thick round-capped stroke through every sample of the path.

use alloc::vec::Vec;

use kurbo::Size;
use tracewise_path::SampledPath;

use crate::canvas::{AlphaCanvas, raster_dims};

/// Rasterized corridor around a sampled path, sized to the path's frame.
///
/// Read-only once built. Rebuild it whenever the samples, the frame or the
/// corridor width change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorridorMask {
    width: u16,
    height: u16,
    alpha: Vec<u8>,
    total_pixel_count: usize,
}

impl CorridorMask {
    /// Strokes the sample positions in order with round caps and joins.
    ///
    /// Fewer than two samples, or a path whose samples all coincide, give an
    /// all-transparent mask with a zero pixel count.
    #[must_use]
    pub fn build(path: &SampledPath, corridor_width: f64) -> Self {
        let mut canvas = AlphaCanvas::with_size(path.frame());
        if path.len() >= 2 {
            canvas.stroke_polyline(path.positions(), corridor_width);
        }
        let alpha = canvas.alpha().to_vec();
        let total_pixel_count = alpha.iter().filter(|&&a| a > 0).count();
        log::debug!(
            "built corridor: {} samples, length {:.1}, width {corridor_width}, {total_pixel_count} px in {}x{}",
            path.len(),
            path.total_length(),
            canvas.width(),
            canvas.height(),
        );
        Self {
            width: canvas.width(),
            height: canvas.height(),
            alpha,
            total_pixel_count,
        }
    }

    /// An all-transparent mask covering `frame` with no corridor pixels.
    #[must_use]
    pub fn empty(frame: Size) -> Self {
        let (width, height) = raster_dims(frame);
        Self {
            width,
            height,
            alpha: alloc::vec![0; usize::from(width) * usize::from(height)],
            total_pixel_count: 0,
        }
    }

    /// Corridor alpha in row-major order.
    #[must_use]
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Number of pixels inside the corridor; the denominator for progress.
    #[must_use]
    pub fn total_pixel_count(&self) -> usize {
        self.total_pixel_count
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

    /// Returns `true` if no pixel is inside the corridor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_pixel_count == 0
    }
}

#[cfg(test)]
mod tests {
    use tracewise_path::{GlyphPath, SamplerConfig};

    use super::*;

    fn sampled(source: &str, frame: Size) -> SampledPath {
        SampledPath::new(&GlyphPath::parse(source), frame, &SamplerConfig::default())
    }

    #[test]
    fn horizontal_corridor_pixel_count_is_close_to_its_area() {
        // 160 px long after fitting into 200x200, 30 px wide, with two round caps.
        let path = sampled("M0 0 L100 0", Size::new(200.0, 200.0));
        let mask = CorridorMask::build(&path, 30.0);
        let area = 160.0 * 30.0 + core::f64::consts::PI * 15.0 * 15.0;
        let count = mask.total_pixel_count() as f64;
        assert!((count - area).abs() < area * 0.05, "count = {count}, area = {area}");
        assert_eq!(mask.alpha().len(), 200 * 200);
    }

    #[test]
    fn corridor_is_centered_on_the_path() {
        let path = sampled("M0 0 L100 0", Size::new(200.0, 200.0));
        let mask = CorridorMask::build(&path, 30.0);
        let at = |x: usize, y: usize| mask.alpha()[y * 200 + x];
        assert_eq!(at(100, 100), 255);
        assert_eq!(at(100, 60), 0);
        assert_eq!(at(100, 140), 0);
    }

    #[test]
    fn empty_and_degenerate_paths_have_no_corridor() {
        let frame = Size::new(64.0, 64.0);
        for source in ["", "Z", "M5 5 L5 5"] {
            let mask = CorridorMask::build(&sampled(source, frame), 20.0);
            assert!(mask.is_empty(), "{source:?}");
            assert!(mask.alpha().iter().all(|&a| a == 0));
        }
    }

    #[test]
    fn empty_mask_matches_frame() {
        let mask = CorridorMask::empty(Size::new(30.0, 20.0));
        assert_eq!((mask.width(), mask.height()), (30, 20));
        assert_eq!(mask.alpha().len(), 600);
        assert_eq!(mask.total_pixel_count(), 0);
    }
}
