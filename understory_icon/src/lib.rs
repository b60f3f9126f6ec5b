// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Icon: tinted mask icons.
//!
//! An [`IconView`] paints a coverage mask (see `understory_mask`) filled with a
//! solid color or a vertical two-stop gradient, composites an optional
//! [`Overlay`] bitmap on top with a `peniko` [`BlendMode`](peniko::BlendMode),
//! and finally runs an optional [`DrawCallback`] for custom drawing.
//!
//! The view has two fill presentations, normal and highlighted, selected by a
//! single flag. A gradient, once both of its colors are set, is used for both.
//!
//! Painting targets a `tiny_skia` surface. Hosts either call
//! [`IconView::repaint`] on their own surface whenever
//! [`IconView::needs_repaint`] is set, or take a flat bitmap with
//! [`IconView::render_image`] / [`IconView::render_highlighted_image`] and use
//! it elsewhere, for example as a `peniko` image brush via
//! [`RenderedIcon::to_image_data`].
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use peniko::color::palette::css;
//! use understory_icon::{FillStyle, IconView};
//!
//! // A 64x64 disc.
//! let disc = RgbaImage::from_fn(64, 64, |x, y| {
//!     let (dx, dy) = (x as f32 - 31.5, y as f32 - 31.5);
//!     if dx * dx + dy * dy <= 28.0 * 28.0 {
//!         Rgba([0, 0, 0, 255])
//!     } else {
//!         Rgba([0, 0, 0, 0])
//!     }
//! });
//!
//! let mut icon = IconView::from_image(&DynamicImage::ImageRgba8(disc));
//! icon.set_fill_style(FillStyle::solid(css::RED).with_highlighted(css::BLUE));
//!
//! let normal = icon.render_image();
//! let pressed = icon.render_highlighted_image();
//! assert_eq!((normal.width(), normal.height()), (64, 64));
//! assert_eq!(normal.pixel(32, 32).unwrap().r, 255);
//! assert_eq!(pressed.pixel(32, 32).unwrap().b, 255);
//! assert_eq!(normal.pixel(0, 0).unwrap().a, 0);
//! assert!(!icon.is_highlighted());
//! ```
//!
//! # Failures
//!
//! Loading follows a silent-degrade policy: a missing or undecodable asset is
//! logged and leaves the view without a mask, so it paints nothing except the
//! draw callback. Use [`IconView::try_configure`] to get the error instead.
//!
//! # Threading
//!
//! Views are single-threaded; the callback and invalidation hook are not
//! required to be `Send`.

mod fill;
mod overlay;
mod render;
mod view;

pub use fill::{Fill, FillStyle};
pub use overlay::Overlay;
pub use render::{RenderError, RenderedIcon};
pub use view::{DrawCallback, IconView, InvalidateHook, MaskSource};

pub use understory_mask::{
    AssetKind, AssetSource, DirAssets, MaskChannel, MaskError, MaskImage, MemoryAssets,
};
