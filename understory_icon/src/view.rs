// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The icon view.

use core::fmt;
use std::rc::Rc;

use image::DynamicImage;
use kurbo::{Rect, Size};
use peniko::{BlendMode, Color};
use tiny_skia::{
    GradientStop, LinearGradient, Mask, Paint, Pixmap, PixmapMut, Point, Shader, SpreadMode,
    Transform,
};
use understory_mask::{
    AssetKind, AssetSource, MaskChannel, MaskError, MaskImage, requested_pixels,
};

use crate::fill::{Fill, FillStyle};
use crate::overlay::Overlay;
use crate::render::RenderedIcon;

/// Custom drawing layered above everything else at the end of each paint.
///
/// Called with the live surface and the painted bounds.
pub type DrawCallback = Rc<dyn Fn(&mut PixmapMut<'_>, Rect)>;

/// Host hook called whenever the view needs to be repainted.
pub type InvalidateHook = Box<dyn Fn()>;

/// Where a mask comes from.
#[derive(Clone, Copy)]
pub enum MaskSource<'a> {
    /// An in-memory bitmap.
    Image(&'a DynamicImage),
    /// A named bitmap resource.
    NamedImage(&'a dyn AssetSource, &'a str),
    /// A named vector resource.
    NamedVector(&'a dyn AssetSource, &'a str),
    /// A named resource of either kind, told apart by its extension.
    Named(&'a dyn AssetSource, &'a str),
}

impl fmt::Debug for MaskSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(image) => f
                .debug_tuple("Image")
                .field(&(image.width(), image.height()))
                .finish(),
            Self::NamedImage(_, name) => f.debug_tuple("NamedImage").field(name).finish(),
            Self::NamedVector(_, name) => f.debug_tuple("NamedVector").field(name).finish(),
            Self::Named(_, name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl MaskSource<'_> {
    fn load(self, size: Option<Size>, channel: MaskChannel) -> Result<MaskImage, MaskError> {
        match self {
            Self::Image(image) => MaskImage::from_image(image, size, channel),
            Self::NamedImage(assets, name) => {
                MaskImage::load(assets, name, Some(AssetKind::Bitmap), size, channel)
            }
            Self::NamedVector(assets, name) => {
                MaskImage::load(assets, name, Some(AssetKind::Vector), size, channel)
            }
            Self::Named(assets, name) => MaskImage::load(assets, name, None, size, channel),
        }
    }
}

/// An icon that tints a mask with a solid color or a gradient.
///
/// The view owns everything it paints: the mask, the fill colors, an optional
/// overlay and an optional draw callback. Nothing composited is cached; every
/// paint runs the whole pipeline again:
///
/// 1. the mask, stretched to the surface, becomes the clip;
/// 2. the fill (see [`FillStyle::resolve`]) is painted through it;
/// 3. the overlay is composited over the full bounds with its blend mode;
/// 4. the draw callback runs.
///
/// Without a mask, steps 1 to 3 draw nothing but the callback still runs.
///
/// Every setter invalidates the view. The host observes this through
/// [`IconView::needs_repaint`] or an [`InvalidateHook`], and answers with
/// [`IconView::repaint`].
///
/// `IconView` is single-threaded: it is neither `Send` nor `Sync`.
pub struct IconView {
    bounds: Size,
    mask: Option<MaskImage>,
    mask_channel: MaskChannel,
    fill: FillStyle,
    overlay: Option<Overlay>,
    overlay_blend_mode: BlendMode,
    draw_callback: Option<DrawCallback>,
    highlighted: bool,
    needs_repaint: bool,
    generation: u64,
    invalidate_hook: Option<InvalidateHook>,
}

impl fmt::Debug for IconView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconView")
            .field("bounds", &self.bounds)
            .field("mask", &self.mask)
            .field("mask_channel", &self.mask_channel)
            .field("fill", &self.fill)
            .field("overlay", &self.overlay)
            .field("overlay_blend_mode", &self.overlay_blend_mode)
            .field("draw_callback", &self.draw_callback.is_some())
            .field("highlighted", &self.highlighted)
            .field("needs_repaint", &self.needs_repaint)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Default for IconView {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for IconView {
    /// Deep-copies the mask, overlay and fill; shares the draw callback.
    ///
    /// The copy is not attached to a host, so it has no invalidation hook, and
    /// starts out needing a repaint.
    fn clone(&self) -> Self {
        Self {
            bounds: self.bounds,
            mask: self.mask.clone(),
            mask_channel: self.mask_channel,
            fill: self.fill,
            overlay: self.overlay.clone(),
            overlay_blend_mode: self.overlay_blend_mode,
            draw_callback: self.draw_callback.clone(),
            highlighted: self.highlighted,
            needs_repaint: true,
            generation: 0,
            invalidate_hook: None,
        }
    }
}

// Construction.
impl IconView {
    /// An empty view: no mask, zero bounds, no colors.
    pub fn new() -> Self {
        Self {
            bounds: Size::ZERO,
            mask: None,
            mask_channel: MaskChannel::default(),
            fill: FillStyle::default(),
            overlay: None,
            overlay_blend_mode: BlendMode::default(),
            draw_callback: None,
            highlighted: false,
            needs_repaint: true,
            generation: 0,
            invalidate_hook: None,
        }
    }

    /// A view configured from `source`; see [`IconView::configure`].
    pub fn with_source(source: MaskSource<'_>, size: Option<Size>) -> Self {
        let mut view = Self::new();
        view.configure(source, size);
        view
    }

    /// A view masked by an in-memory bitmap at its natural size.
    pub fn from_image(image: &DynamicImage) -> Self {
        Self::with_source(MaskSource::Image(image), None)
    }

    /// A view masked by an in-memory bitmap resized to `size`.
    pub fn from_image_sized(image: &DynamicImage, size: Size) -> Self {
        Self::with_source(MaskSource::Image(image), Some(size))
    }

    /// A view masked by a named bitmap resource.
    pub fn from_named_image(assets: &dyn AssetSource, name: &str) -> Self {
        Self::with_source(MaskSource::NamedImage(assets, name), None)
    }

    /// A view masked by a named bitmap resource resized to `size`.
    pub fn from_named_image_sized(assets: &dyn AssetSource, name: &str, size: Size) -> Self {
        Self::with_source(MaskSource::NamedImage(assets, name), Some(size))
    }

    /// A view masked by a named vector resource.
    pub fn from_named_vector(assets: &dyn AssetSource, name: &str) -> Self {
        Self::with_source(MaskSource::NamedVector(assets, name), None)
    }

    /// A view masked by a named vector resource rasterized at `size`.
    pub fn from_named_vector_sized(assets: &dyn AssetSource, name: &str, size: Size) -> Self {
        Self::with_source(MaskSource::NamedVector(assets, name), Some(size))
    }

    /// A view masked by a named resource of either kind.
    pub fn from_named(assets: &dyn AssetSource, name: &str) -> Self {
        Self::with_source(MaskSource::Named(assets, name), None)
    }

    /// A view masked by a named resource of either kind, at `size`.
    pub fn from_named_sized(assets: &dyn AssetSource, name: &str, size: Size) -> Self {
        Self::with_source(MaskSource::Named(assets, name), Some(size))
    }
}

// Reconfiguration.
impl IconView {
    /// Loads a new mask and invalidates.
    ///
    /// On success the bounds become the mask size. On failure the error is
    /// logged, the view is left without a mask (so paints draw nothing but the
    /// callback) and the bounds take the requested size, rounded to whole
    /// pixels, when one was given.
    pub fn configure(&mut self, source: MaskSource<'_>, size: Option<Size>) {
        if let Err(err) = self.try_configure(source, size) {
            log::warn!("icon mask {source:?} unavailable: {err}");
            self.mask = None;
            // Same rounding as a successful load.
            if let Some((width, height)) = size.and_then(requested_pixels) {
                self.bounds = Size::new(f64::from(width), f64::from(height));
            }
            self.invalidate();
        }
    }

    /// Loads a new mask, returning the error instead of degrading.
    ///
    /// On failure the view is left untouched.
    pub fn try_configure(
        &mut self,
        source: MaskSource<'_>,
        size: Option<Size>,
    ) -> Result<(), MaskError> {
        let mask = source.load(size, self.mask_channel)?;
        log::debug!(
            "configured icon from {source:?}: {}x{} mask",
            mask.width(),
            mask.height()
        );
        self.bounds = mask.size();
        self.mask = Some(mask);
        self.invalidate();
        Ok(())
    }

    /// Re-masks with an in-memory bitmap at its natural size.
    pub fn set_image(&mut self, image: &DynamicImage) {
        self.configure(MaskSource::Image(image), None);
    }

    /// Re-masks with an in-memory bitmap resized to `size`.
    pub fn set_image_sized(&mut self, image: &DynamicImage, size: Size) {
        self.configure(MaskSource::Image(image), Some(size));
    }

    /// Re-masks with a named bitmap resource.
    pub fn set_named_image(&mut self, assets: &dyn AssetSource, name: &str) {
        self.configure(MaskSource::NamedImage(assets, name), None);
    }

    /// Re-masks with a named bitmap resource resized to `size`.
    pub fn set_named_image_sized(&mut self, assets: &dyn AssetSource, name: &str, size: Size) {
        self.configure(MaskSource::NamedImage(assets, name), Some(size));
    }

    /// Re-masks with a named vector resource.
    pub fn set_named_vector(&mut self, assets: &dyn AssetSource, name: &str) {
        self.configure(MaskSource::NamedVector(assets, name), None);
    }

    /// Re-masks with a named vector resource rasterized at `size`.
    pub fn set_named_vector_sized(&mut self, assets: &dyn AssetSource, name: &str, size: Size) {
        self.configure(MaskSource::NamedVector(assets, name), Some(size));
    }

    /// Re-masks with a named resource of either kind.
    pub fn set_named(&mut self, assets: &dyn AssetSource, name: &str) {
        self.configure(MaskSource::Named(assets, name), None);
    }

    /// Re-masks with a named resource of either kind, at `size`.
    pub fn set_named_sized(&mut self, assets: &dyn AssetSource, name: &str, size: Size) {
        self.configure(MaskSource::Named(assets, name), Some(size));
    }

    /// Drops the mask; subsequent paints only run the draw callback.
    pub fn clear_mask(&mut self) {
        self.mask = None;
        self.invalidate();
    }
}

// Properties.
impl IconView {
    /// The current mask, if any.
    pub fn mask(&self) -> Option<&MaskImage> {
        self.mask.as_ref()
    }

    /// Channel used to derive coverage at the next configuration.
    pub fn mask_channel(&self) -> MaskChannel {
        self.mask_channel
    }

    /// Sets the channel used by later configurations; the current mask is kept.
    pub fn set_mask_channel(&mut self, channel: MaskChannel) {
        self.mask_channel = channel;
        self.invalidate();
    }

    /// Size of the view and of its off-screen renders.
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Resizes the view. The mask is stretched to the new bounds when painted.
    ///
    /// Negative or non-finite dimensions become zero.
    pub fn set_bounds(&mut self, bounds: Size) {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.bounds = Size::new(clean(bounds.width), clean(bounds.height));
        self.invalidate();
    }

    /// The whole fill configuration.
    pub fn fill_style(&self) -> FillStyle {
        self.fill
    }

    /// Replaces the whole fill configuration.
    pub fn set_fill_style(&mut self, fill: FillStyle) {
        self.fill = fill;
        self.invalidate();
    }

    /// Fill for the normal state.
    pub fn color(&self) -> Option<Color> {
        self.fill.color
    }

    /// Sets the fill for the normal state.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.fill.color = color;
        self.invalidate();
    }

    /// Fill for the highlighted state.
    pub fn highlighted_color(&self) -> Option<Color> {
        self.fill.highlighted_color
    }

    /// Sets the fill for the highlighted state.
    pub fn set_highlighted_color(&mut self, color: Option<Color>) {
        self.fill.highlighted_color = color;
        self.invalidate();
    }

    /// Gradient color at the top edge.
    pub fn gradient_start_color(&self) -> Option<Color> {
        self.fill.gradient_start
    }

    /// Sets the gradient color at the top edge.
    pub fn set_gradient_start_color(&mut self, color: Option<Color>) {
        self.fill.gradient_start = color;
        self.invalidate();
    }

    /// Gradient color at the bottom edge.
    pub fn gradient_end_color(&self) -> Option<Color> {
        self.fill.gradient_end
    }

    /// Sets the gradient color at the bottom edge.
    pub fn set_gradient_end_color(&mut self, color: Option<Color>) {
        self.fill.gradient_end = color;
        self.invalidate();
    }

    /// Whether the highlighted fill is used by [`IconView::repaint`].
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Switches between the normal and highlighted fill.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
        self.invalidate();
    }

    /// The overlay bitmap, if any.
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Sets or removes the overlay bitmap.
    pub fn set_overlay(&mut self, overlay: Option<Overlay>) {
        self.overlay = overlay;
        self.invalidate();
    }

    /// Blend mode used to composite the overlay.
    pub fn overlay_blend_mode(&self) -> BlendMode {
        self.overlay_blend_mode
    }

    /// Sets the overlay blend mode.
    pub fn set_overlay_blend_mode(&mut self, mode: impl Into<BlendMode>) {
        self.overlay_blend_mode = mode.into();
        self.invalidate();
    }

    /// The custom draw callback, if any.
    pub fn draw_callback(&self) -> Option<&DrawCallback> {
        self.draw_callback.as_ref()
    }

    /// Sets the custom draw callback.
    pub fn set_draw_callback(&mut self, callback: impl Fn(&mut PixmapMut<'_>, Rect) + 'static) {
        self.draw_callback = Some(Rc::new(callback));
        self.invalidate();
    }

    /// Removes the custom draw callback.
    pub fn clear_draw_callback(&mut self) {
        self.draw_callback = None;
        self.invalidate();
    }
}

// Invalidation and painting.
impl IconView {
    /// Installs the host hook called on every invalidation.
    pub fn set_invalidate_hook(&mut self, hook: impl Fn() + 'static) {
        self.invalidate_hook = Some(Box::new(hook));
    }

    /// Removes the host hook.
    pub fn clear_invalidate_hook(&mut self) {
        self.invalidate_hook = None;
    }

    /// Marks the view as needing a repaint and notifies the host.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.needs_repaint = true;
        log::trace!("icon invalidated (generation {})", self.generation);
        if let Some(hook) = &self.invalidate_hook {
            hook();
        }
    }

    /// Whether state changed since the last [`IconView::repaint`].
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Counter bumped by every invalidation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Paints the view into the host surface using the current highlight state.
    pub fn repaint(&mut self, surface: &mut PixmapMut<'_>) {
        self.paint(surface, self.highlighted);
        self.needs_repaint = false;
    }

    /// Runs the paint pipeline into `surface` for the given highlight state.
    ///
    /// The mask and overlay are stretched to the surface size. The persistent
    /// highlight flag is not consulted or changed.
    pub fn paint(&self, surface: &mut PixmapMut<'_>, highlighted: bool) {
        let (width, height) = (surface.width(), surface.height());
        log::trace!("painting icon into {width}x{height} (highlighted: {highlighted})");

        if let Some(clip) = self.mask.as_ref().and_then(|m| m.to_clip_mask(width, height)) {
            fill_through(surface, &clip, self.fill.resolve(highlighted));
            if let Some(overlay) = &self.overlay {
                overlay.composite(surface, self.overlay_blend_mode);
            }
        }

        if let Some(callback) = &self.draw_callback {
            let bounds = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
            callback(surface, bounds);
        }
    }

    /// Renders the normal state off-screen at the view's bounds.
    pub fn render_image(&self) -> RenderedIcon {
        self.render_image_with(false)
    }

    /// Renders the highlighted state off-screen at the view's bounds.
    pub fn render_highlighted_image(&self) -> RenderedIcon {
        self.render_image_with(true)
    }

    /// Renders off-screen with the highlight state forced to `highlighted`.
    ///
    /// Bounds are rounded to whole pixels, with a minimum of 1x1.
    pub fn render_image_with(&self, highlighted: bool) -> RenderedIcon {
        let (width, height) = surface_pixels(self.bounds);
        let mut pixmap = Pixmap::new(width, height)
            .or_else(|| Pixmap::new(1, 1))
            .expect("a 1x1 pixmap always allocates");
        self.paint(&mut pixmap.as_mut(), highlighted);
        RenderedIcon::new(pixmap)
    }
}

/// Fills the whole surface through `clip`.
#[allow(
    clippy::cast_precision_loss,
    reason = "pixel dimensions are well inside f32's exact integer range"
)]
fn fill_through(surface: &mut PixmapMut<'_>, clip: &Mask, fill: Fill) {
    let (width, height) = (surface.width() as f32, surface.height() as f32);
    let shader = match fill {
        Fill::None => return,
        Fill::Solid(color) => Shader::SolidColor(to_skia_color(color)),
        Fill::Linear { start, end } => {
            let gradient = LinearGradient::new(
                Point::from_xy(0.0, 0.0),
                Point::from_xy(0.0, height),
                vec![
                    GradientStop::new(0.0, to_skia_color(start)),
                    GradientStop::new(1.0, to_skia_color(end)),
                ],
                SpreadMode::Pad,
                Transform::identity(),
            );
            // Degenerate gradients collapse to the start color.
            gradient.unwrap_or(Shader::SolidColor(to_skia_color(start)))
        }
    };
    let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, width, height) else {
        return;
    };
    let paint = Paint {
        shader,
        anti_alias: false,
        ..Paint::default()
    };
    surface.fill_rect(rect, &paint, Transform::identity(), Some(clip));
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "values are clamped to the u32 range first"
)]
fn surface_pixels(bounds: Size) -> (u32, u32) {
    let px = |v: f64| {
        if v.is_finite() {
            v.round().clamp(1.0, f64::from(u32::MAX)) as u32
        } else {
            1
        }
    };
    (px(bounds.width), px(bounds.height))
}
