// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static bitmaps produced by off-screen renders.

use core::fmt;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use peniko::color::Rgba8;
use peniko::{Blob, ImageAlphaType, ImageData};
use thiserror::Error;
use tiny_skia::{Pixmap, PixmapRef};

/// Errors produced while exporting a rendered icon.
#[derive(Debug, Error)]
pub enum RenderError {
    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// A flat premultiplied RGBA8 bitmap of a rendered icon.
#[derive(Clone, PartialEq)]
pub struct RenderedIcon {
    pixmap: Pixmap,
}

impl fmt::Debug for RenderedIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedIcon")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl RenderedIcon {
    pub(crate) fn new(pixmap: Pixmap) -> Self {
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

    /// The demultiplied color at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba8 {
            r: c.red(),
            g: c.green(),
            b: c.blue(),
            a: c.alpha(),
        })
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// The underlying pixmap.
    pub fn as_pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }

    /// Consumes the icon, returning its pixmap.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Copies the pixels into a `peniko` image, e.g. for an image brush in
    /// another widget.
    pub fn to_image_data(&self) -> ImageData {
        ImageData {
            data: Blob::from(self.pixmap.data().to_vec()),
            format: peniko::ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::AlphaPremultiplied,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Copies the pixels into a straight-alpha [`RgbaImage`].
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let px = self.pixel(x, y).unwrap_or(Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            });
            Rgba([px.r, px.g, px.b, px.a])
        })
    }

    /// Encodes the icon as a PNG file.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
