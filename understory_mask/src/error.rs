// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors produced while loading or rasterizing a mask.
#[derive(Debug, Error)]
pub enum MaskError {
    /// No asset matched the requested name.
    #[error("asset not found: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },
    /// The bitmap bytes could not be decoded.
    #[error("failed to decode bitmap: {0}")]
    Decode(#[from] image::ImageError),
    /// The SVG document could not be parsed.
    #[error("failed to parse vector image: {0}")]
    Vector(#[from] resvg::usvg::Error),
    /// The source has no pixels to rasterize.
    #[error("source image has an empty size")]
    EmptySize,
    /// A raster surface of the given size could not be created.
    #[error("cannot allocate a {width}x{height} raster surface")]
    Allocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}
