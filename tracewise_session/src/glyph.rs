// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph content records as supplied by the host application.

/// One traceable glyph: its outline and how it should be traced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GlyphRecord {
    /// The character being taught, for display only.
    pub character: String,
    /// Outline in the `M`/`L`/`Q`/`C` path language.
    pub svg_path: String,
    /// Corridor width in frame pixels.
    pub trace_width: f64,
    /// Where strokes must start, as a fraction of the total path length.
    pub start_arc_length_fraction: f64,
    /// Radius of the start region in frame pixels.
    pub start_region_radius: f64,
}

impl Default for GlyphRecord {
    fn default() -> Self {
        Self {
            character: String::new(),
            svg_path: String::new(),
            trace_width: 40.0,
            start_arc_length_fraction: 0.0,
            start_region_radius: 18.0,
        }
    }
}

impl GlyphRecord {
    /// A record with default tracing parameters.
    #[must_use]
    pub fn new(character: impl Into<String>, svg_path: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            svg_path: svg_path.into(),
            ..Self::default()
        }
    }

    /// Returns the record with a different corridor width.
    #[must_use]
    pub fn with_trace_width(mut self, trace_width: f64) -> Self {
        self.trace_width = trace_width;
        self
    }

    /// Returns the record with strokes starting at a different fraction of the path.
    #[must_use]
    pub fn with_start_fraction(mut self, fraction: f64) -> Self {
        self.start_arc_length_fraction = fraction;
        self
    }

    /// Returns the record with a different start region radius.
    #[must_use]
    pub fn with_start_radius(mut self, radius: f64) -> Self {
        self.start_region_radius = radius;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_tracing_parameters() {
        let g = GlyphRecord::new("I", "M10 10 L10 90");
        assert_eq!(g.character, "I");
        assert_eq!(g.trace_width, 40.0);
        assert_eq!(g.start_arc_length_fraction, 0.0);
        assert_eq!(g.start_region_radius, 18.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let g: GlyphRecord =
            serde_json::from_str(r#"{ "character": "L", "svg_path": "M0 0 L0 10 L8 10" }"#)
                .unwrap();
        assert_eq!(g, GlyphRecord::new("L", "M0 0 L0 10 L8 10"));
    }
}
