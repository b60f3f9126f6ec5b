// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill colors for the normal and highlighted states.

use peniko::Color;

/// Fill configuration of an icon.
///
/// Plain colors are chosen per state. When both gradient colors are set the
/// gradient takes precedence in *both* states and the plain colors are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FillStyle {
    /// Solid fill for the normal state.
    pub color: Option<Color>,
    /// Solid fill for the highlighted state.
    pub highlighted_color: Option<Color>,
    /// Gradient color at the top edge.
    pub gradient_start: Option<Color>,
    /// Gradient color at the bottom edge.
    pub gradient_end: Option<Color>,
}

/// The fill resolved for a single paint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Fill {
    /// Nothing is filled.
    None,
    /// A single color.
    Solid(Color),
    /// A vertical linear gradient from `start` at the top to `end` at the bottom.
    Linear {
        /// Color at the top edge.
        start: Color,
        /// Color at the bottom edge.
        end: Color,
    },
}

impl FillStyle {
    /// A style with the same solid color in both states.
    pub fn solid(color: Color) -> Self {
        Self {
            color: Some(color),
            highlighted_color: Some(color),
            ..Self::default()
        }
    }

    /// A gradient style, shared by both states.
    pub fn gradient(start: Color, end: Color) -> Self {
        Self {
            gradient_start: Some(start),
            gradient_end: Some(end),
            ..Self::default()
        }
    }

    /// Replaces the highlighted color.
    #[must_use]
    pub fn with_highlighted(mut self, color: Color) -> Self {
        self.highlighted_color = Some(color);
        self
    }

    /// The gradient pair, if both colors are set.
    pub fn gradient_pair(&self) -> Option<(Color, Color)> {
        Some((self.gradient_start?, self.gradient_end?))
    }

    /// Picks the fill for the given highlight state.
    pub fn resolve(&self, highlighted: bool) -> Fill {
        if let Some((start, end)) = self.gradient_pair() {
            return Fill::Linear { start, end };
        }
        let color = if highlighted {
            self.highlighted_color
        } else {
            self.color
        };
        color.map_or(Fill::None, Fill::Solid)
    }
}
