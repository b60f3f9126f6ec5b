// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage masks and their rasterization.

use core::fmt;
use std::sync::{Arc, OnceLock};

use image::DynamicImage;
use kurbo::Size;
use resvg::usvg;
use tiny_skia::{
    ColorU8, FilterQuality, Mask, MaskType, Pixmap, PixmapPaint, PixmapRef, Transform,
};

use crate::asset::{AssetKind, AssetSource, resolve};
use crate::error::MaskError;

/// Which channel of a rasterized source becomes mask coverage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaskChannel {
    /// Coverage is the source alpha.
    #[default]
    Alpha,
    /// Coverage is the source luminance (Rec. 709 weights) multiplied by alpha.
    Luminance,
}

/// An owned single-channel coverage bitmap.
///
/// Internally the coverage lives in the alpha channel of a premultiplied white
/// [`Pixmap`], which lets the mask be resampled and handed to `tiny_skia`
/// as a clip without another conversion.
///
/// Cloning copies the pixels.
#[derive(Clone, PartialEq)]
pub struct MaskImage {
    pixmap: Pixmap,
}

impl fmt::Debug for MaskImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl MaskImage {
    /// Builds a mask from raw row-major coverage values.
    ///
    /// Returns `None` when either dimension is zero or `coverage` does not hold
    /// exactly `width * height` values.
    pub fn from_coverage(width: u32, height: u32, coverage: &[u8]) -> Option<Self> {
        if coverage.len() != (width as usize) * (height as usize) {
            return None;
        }
        let mut pixmap = Pixmap::new(width, height)?;
        for (px, &c) in pixmap.data_mut().chunks_exact_mut(4).zip(coverage) {
            px.copy_from_slice(&[c, c, c, c]);
        }
        Some(Self { pixmap })
    }

    /// Rasterizes an in-memory image.
    pub fn from_image(
        image: &DynamicImage,
        size: Option<Size>,
        channel: MaskChannel,
    ) -> Result<Self, MaskError> {
        let source = premultiplied_pixmap(image)?;
        let (width, height) = target_pixels(size, (source.width(), source.height()));
        let raster = resample(source, width, height)?;
        Ok(Self::from_raster(&raster, channel))
    }

    /// Decodes and rasterizes encoded bitmap bytes.
    pub fn from_bitmap_bytes(
        bytes: &[u8],
        size: Option<Size>,
        channel: MaskChannel,
    ) -> Result<Self, MaskError> {
        let image = image::load_from_memory(bytes)?;
        Self::from_image(&image, size, channel)
    }

    /// Parses and rasterizes an SVG document.
    ///
    /// The document is scaled to fill the target size exactly, which defaults
    /// to its natural size rounded up.
    pub fn from_vector_bytes(
        bytes: &[u8],
        size: Option<Size>,
        channel: MaskChannel,
    ) -> Result<Self, MaskError> {
        let tree = usvg::Tree::from_data(bytes, &svg_options())?;
        let natural = tree.size();
        let natural_px = (ceil_px(natural.width()), ceil_px(natural.height()));
        let (width, height) = target_pixels(size, natural_px);

        let mut raster = Pixmap::new(width, height).ok_or(MaskError::Allocation { width, height })?;
        let transform = Transform::from_scale(
            px_to_f32(width) / natural.width(),
            px_to_f32(height) / natural.height(),
        );
        resvg::render(&tree, transform, &mut raster.as_mut());
        Ok(Self::from_raster(&raster, channel))
    }

    /// Looks up `name` in `assets` and rasterizes it.
    ///
    /// `kind` narrows the extensions probed for a bare name; see
    /// [`resolve`](crate::resolve).
    pub fn load(
        assets: &dyn AssetSource,
        name: &str,
        kind: Option<AssetKind>,
        size: Option<Size>,
        channel: MaskChannel,
    ) -> Result<Self, MaskError> {
        let asset = resolve(assets, name, kind).ok_or_else(|| MaskError::NotFound {
            name: name.to_owned(),
        })?;
        log::debug!(
            "loading {:?} mask from {} ({} bytes)",
            asset.kind,
            asset.name,
            asset.bytes.len()
        );
        match asset.kind {
            AssetKind::Bitmap => Self::from_bitmap_bytes(&asset.bytes, size, channel),
            AssetKind::Vector => Self::from_vector_bytes(&asset.bytes, size, channel),
        }
    }

    fn from_raster(raster: &Pixmap, channel: MaskChannel) -> Self {
        let mut pixmap = raster.clone();
        for px in pixmap.data_mut().chunks_exact_mut(4) {
            let c = match channel {
                MaskChannel::Alpha => px[3],
                // Premultiplied RGB already carries the alpha factor.
                MaskChannel::Luminance => luma(px[0], px[1], px[2]),
            };
            px.copy_from_slice(&[c, c, c, c]);
        }
        Self { pixmap }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Coverage at `(x, y)`; zero outside the mask.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        self.pixmap.pixel(x, y).map_or(0, |p| p.alpha())
    }

    /// Whether every pixel has zero coverage.
    pub fn is_empty(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// The mask as a premultiplied white pixmap.
    pub fn as_pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }

    /// Stretches the mask over a `width` x `height` surface and converts it to a
    /// `tiny_skia` clip mask.
    ///
    /// Returns `None` for an empty target.
    pub fn to_clip_mask(&self, width: u32, height: u32) -> Option<Mask> {
        if (width, height) == (self.width(), self.height()) {
            return Some(Mask::from_pixmap(self.pixmap.as_ref(), MaskType::Alpha));
        }
        let stretched = resample(self.pixmap.clone(), width, height).ok()?;
        Some(Mask::from_pixmap(stretched.as_ref(), MaskType::Alpha))
    }
}

/// Parse options sharing one system font database, loaded on first use.
fn svg_options() -> usvg::Options<'static> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    let fontdb = FONTS.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} font faces for SVG text", db.len());
        Arc::new(db)
    });
    usvg::Options {
        fontdb: Arc::clone(fontdb),
        ..usvg::Options::default()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is rounded and clamped to the u8 range"
)]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// Converts any image to a premultiplied RGBA pixmap at its natural size.
fn premultiplied_pixmap(image: &DynamicImage) -> Result<Pixmap, MaskError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(MaskError::EmptySize);
    }
    let mut pixmap = Pixmap::new(width, height).ok_or(MaskError::Allocation { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Resamples `source` to exactly `width` x `height`, reusing it when the size matches.
fn resample(source: Pixmap, width: u32, height: u32) -> Result<Pixmap, MaskError> {
    if (source.width(), source.height()) == (width, height) {
        return Ok(source);
    }
    let mut target = Pixmap::new(width, height).ok_or(MaskError::Allocation { width, height })?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_scale(
        px_to_f32(width) / px_to_f32(source.width()),
        px_to_f32(height) / px_to_f32(source.height()),
    );
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    Ok(target)
}

/// Rounds a requested size to whole pixels.
///
/// Returns `None` for non-finite sizes and for sizes that round to zero in
/// either dimension; loaders use the source's natural size in that case.
#[allow(clippy::cast_possible_truncation, reason = "range is checked before casting")]
pub fn requested_pixels(size: Size) -> Option<(u32, u32)> {
    let (w, h) = (size.width.round(), size.height.round());
    let max = f64::from(u32::MAX);
    if !(w.is_finite() && h.is_finite()) || w < 1.0 || h < 1.0 || w > max || h > max {
        return None;
    }
    Some((w as u32, h as u32))
}

/// Resolves the pixel size to rasterize at.
fn target_pixels(requested: Option<Size>, natural: (u32, u32)) -> (u32, u32) {
    requested.and_then(requested_pixels).unwrap_or(natural)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "SVG sizes are positive and far below u32::MAX"
)]
fn ceil_px(v: f32) -> u32 {
    v.ceil().max(1.0) as u32
}

#[allow(
    clippy::cast_precision_loss,
    reason = "pixel dimensions are well inside f32's exact integer range"
)]
fn px_to_f32(v: u32) -> f32 {
    v as f32
}
