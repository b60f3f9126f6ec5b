// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay bitmaps and blend-mode mapping.

use core::fmt;

use image::DynamicImage;
use peniko::{BlendMode, Compose, Mix};
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapMut, PixmapPaint, PixmapRef, Transform};

/// A bitmap composited over the filled mask.
///
/// The overlay is stretched over the full view bounds and is not clipped to
/// the mask. Cloning copies the pixels.
#[derive(Clone, PartialEq)]
pub struct Overlay {
    pixmap: Pixmap,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Wraps a premultiplied pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Converts an in-memory image.
    ///
    /// Returns `None` for an image with no pixels.
    pub fn from_image(image: &DynamicImage) -> Option<Self> {
        let rgba = image.to_rgba8();
        let mut pixmap = Pixmap::new(rgba.width(), rgba.height())?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Some(Self { pixmap })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The overlay pixels.
    pub fn as_pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }

    /// Draws the overlay stretched over the whole surface.
    #[allow(
        clippy::cast_precision_loss,
        reason = "pixel dimensions are well inside f32's exact integer range"
    )]
    pub(crate) fn composite(&self, surface: &mut PixmapMut<'_>, blend: BlendMode) {
        let same_size = (surface.width(), surface.height()) == (self.width(), self.height());
        let paint = PixmapPaint {
            blend_mode: map_blend_mode(&blend),
            quality: if same_size {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bilinear
            },
            ..PixmapPaint::default()
        };
        let transform = Transform::from_scale(
            surface.width() as f32 / self.width() as f32,
            surface.height() as f32 / self.height() as f32,
        );
        surface.draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, transform, None);
    }
}

/// Maps a `peniko` blend mode onto the closest `tiny_skia` operator.
pub(crate) fn map_blend_mode(mode: &BlendMode) -> tiny_skia::BlendMode {
    use tiny_skia::BlendMode as Sk;

    match (mode.mix, mode.compose) {
        // Composition takes precedence when it is not the default SrcOver.
        (_, Compose::Clear) => Sk::Clear,
        (_, Compose::Copy) => Sk::Source,
        (_, Compose::Dest) => Sk::Destination,
        (_, Compose::SrcOver) => match mode.mix {
            Mix::Normal => Sk::SourceOver,
            Mix::Multiply => Sk::Multiply,
            Mix::Screen => Sk::Screen,
            Mix::Overlay => Sk::Overlay,
            Mix::Darken => Sk::Darken,
            Mix::Lighten => Sk::Lighten,
            Mix::ColorDodge => Sk::ColorDodge,
            Mix::ColorBurn => Sk::ColorBurn,
            Mix::HardLight => Sk::HardLight,
            Mix::SoftLight => Sk::SoftLight,
            Mix::Difference => Sk::Difference,
            Mix::Exclusion => Sk::Exclusion,
            Mix::Hue => Sk::Hue,
            Mix::Saturation => Sk::Saturation,
            Mix::Color => Sk::Color,
            Mix::Luminosity => Sk::Luminosity,
            #[allow(deprecated, reason = "Mix::Clip has no operator of its own")]
            Mix::Clip => Sk::SourceOver,
        },
        (_, Compose::DestOver) => Sk::DestinationOver,
        (_, Compose::SrcIn) => Sk::SourceIn,
        (_, Compose::DestIn) => Sk::DestinationIn,
        (_, Compose::SrcOut) => Sk::SourceOut,
        (_, Compose::DestOut) => Sk::DestinationOut,
        (_, Compose::SrcAtop) => Sk::SourceAtop,
        (_, Compose::DestAtop) => Sk::DestinationAtop,
        (_, Compose::Xor) => Sk::Xor,
        (_, Compose::Plus) => Sk::Plus,
        // No plus-lighter in tiny-skia.
        (_, Compose::PlusLighter) => Sk::Plus,
    }
}
