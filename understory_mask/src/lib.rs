// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Mask: coverage masks rasterized from bitmap and SVG assets.
//!
//! A [`MaskImage`] is a single-channel coverage bitmap: every pixel holds a
//! value in `0..=255` saying how much of a fill is allowed through at that
//! position. Masks are produced once, at load time, from one of:
//!
//! - an in-memory [`image::DynamicImage`],
//! - encoded bitmap bytes (PNG, JPEG, GIF, BMP, WebP),
//! - SVG documents, rasterized through `resvg` at the requested size,
//! - a named resource looked up through an [`AssetSource`].
//!
//! Coverage is derived from the rasterized source according to a
//! [`MaskChannel`]: either the alpha channel, or luminance weighted by alpha.
//!
//! # Sizes
//!
//! Every constructor takes an optional target size in pixels. When it is
//! `None`, or rounds to zero in either dimension, the source's natural size is
//! used. The resulting mask's dimensions always equal the effective target.
//!
//! ```
//! use kurbo::Size;
//! use understory_mask::{MaskChannel, MaskImage, MemoryAssets};
//!
//! let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16">
//!     <rect width="16" height="16" fill="black"/>
//! </svg>"#;
//! let assets = MemoryAssets::new().with("square.svg", svg.to_vec());
//!
//! let mask = MaskImage::load(&assets, "square", None, Some(Size::new(32.0, 24.0)), MaskChannel::Alpha)
//!     .unwrap();
//! assert_eq!((mask.width(), mask.height()), (32, 24));
//! assert_eq!(mask.coverage(10, 10), 255);
//! ```
//!
//! # Asset lookup
//!
//! [`resolve`] maps a resource name with or without extension to bytes and an
//! [`AssetKind`]. Names ending in one of [`VECTOR_EXTENSIONS`] are vectors,
//! names ending in one of [`BITMAP_EXTENSIONS`] are bitmaps. Any other name,
//! including one with an unknown dotted suffix such as `icon.small`, is a base
//! name and is probed against the known extensions.
//!
//! # SVG features
//!
//! Embedded raster images are decoded. `<text>` is shaped with the system
//! fonts, loaded once per process on the first vector load; text renders
//! nothing on a system without fonts.

mod asset;
mod error;
mod mask;

pub use asset::{
    AssetKind, AssetSource, BITMAP_EXTENSIONS, DirAssets, MemoryAssets, ResolvedAsset,
    VECTOR_EXTENSIONS, resolve,
};
pub use error::MaskError;
pub use mask::{MaskChannel, MaskImage, requested_pixels};
