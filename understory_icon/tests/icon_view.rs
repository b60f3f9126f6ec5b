// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-level checks of the icon paint pipeline through the public API.

use std::cell::Cell;
use std::rc::Rc;

use image::{DynamicImage, Rgba, RgbaImage};
use kurbo::Size;
use peniko::color::palette::css;
use peniko::{BlendMode, Color, Compose, Mix};
use tiny_skia::{Paint, Rect, Transform};
use understory_icon::{
    FillStyle, IconView, MaskChannel, MaskSource, MemoryAssets, Overlay, RenderedIcon,
};

const SIDE: u32 = 64;

const RING_SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32">
  <circle cx="16" cy="16" r="16" fill="white"/>
</svg>"#;

fn inside_disc(x: u32, y: u32) -> bool {
    let (dx, dy) = (x as f32 - 31.5, y as f32 - 31.5);
    dx * dx + dy * dy <= 28.0 * 28.0
}

fn disc() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(SIDE, SIDE, |x, y| {
        if inside_disc(x, y) {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    }))
}

fn disc_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    disc()
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode disc");
    bytes
}

fn solid_overlay(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Overlay {
    let image = RgbaImage::from_fn(width, height, |x, y| Rgba(f(x, y)));
    Overlay::from_image(&DynamicImage::ImageRgba8(image)).expect("overlay")
}

fn rgba(icon: &RenderedIcon, x: u32, y: u32) -> [u8; 4] {
    let px = icon.pixel(x, y).expect("pixel in bounds");
    [px.r, px.g, px.b, px.a]
}

/// Per-channel comparison for pixels that went through bilinear resampling.
fn assert_close(actual: [u8; 4], expected: [u8; 4], what: &str) {
    let close = actual
        .iter()
        .zip(expected)
        .all(|(&a, e)| a.abs_diff(e) <= 2);
    assert!(close, "{what}: got {actual:?}, expected about {expected:?}");
}

fn assert_disc_filled(icon: &RenderedIcon, color: [u8; 4]) {
    assert_eq!((icon.width(), icon.height()), (SIDE, SIDE));
    for y in 0..SIDE {
        for x in 0..SIDE {
            let px = rgba(icon, x, y);
            if inside_disc(x, y) {
                assert_eq!(px, color, "inside pixel ({x}, {y})");
            } else {
                assert_eq!(px[3], 0, "outside pixel ({x}, {y}) should be transparent");
            }
        }
    }
}

fn red_blue_icon() -> IconView {
    let mut icon = IconView::from_image(&disc());
    icon.set_color(Some(css::RED));
    icon.set_highlighted_color(Some(css::BLUE));
    icon
}

#[test]
fn solid_fill_follows_mask_in_both_states() {
    let icon = red_blue_icon();
    assert_eq!(icon.overlay_blend_mode(), BlendMode::default());

    assert_disc_filled(&icon.render_image(), [255, 0, 0, 255]);
    assert_disc_filled(&icon.render_highlighted_image(), [0, 0, 255, 255]);
}

#[test]
fn forced_highlight_never_touches_the_flag() {
    let mut icon = red_blue_icon();

    let before = icon.generation();
    let pressed = icon.render_highlighted_image();
    assert!(!icon.is_highlighted());
    assert_eq!(icon.generation(), before, "rendering must not invalidate");
    assert_eq!(rgba(&pressed, 32, 32), [0, 0, 255, 255]);

    icon.set_highlighted(true);
    let normal = icon.render_image();
    assert!(icon.is_highlighted());
    assert_eq!(rgba(&normal, 32, 32), [255, 0, 0, 255]);
}

#[test]
fn gradient_ignores_highlight_and_runs_top_to_bottom() {
    let mut icon = red_blue_icon();
    icon.set_gradient_start_color(Some(css::WHITE));
    icon.set_gradient_end_color(Some(css::BLACK));

    let normal = icon.render_image();
    let pressed = icon.render_highlighted_image();
    assert_eq!(normal, pressed);

    let mut previous = u8::MAX;
    for y in 8..56 {
        let [r, g, b, a] = rgba(&normal, 32, y);
        assert_eq!(a, 255);
        assert!(r == g && g == b, "gradient should stay grey at y = {y}");
        assert!(r <= previous, "luminance increased at y = {y}");
        assert_eq!(r, g);
        previous = r;
    }
    assert!(rgba(&normal, 32, 8)[0] > rgba(&normal, 32, 55)[0] + 100);
    assert_eq!(rgba(&normal, 0, 0)[3], 0);
}

#[test]
fn half_gradient_keeps_plain_colors() {
    let mut icon = red_blue_icon();
    icon.set_gradient_start_color(Some(css::WHITE));
    assert_eq!(rgba(&icon.render_image(), 32, 32), [255, 0, 0, 255]);
}

#[test]
fn sized_configuration_sets_mask_and_bounds() {
    let mut icon = IconView::from_image_sized(&disc(), Size::new(24.0, 40.0));
    let mask = icon.mask().expect("mask");
    assert_eq!((mask.width(), mask.height()), (24, 40));
    assert_eq!(icon.bounds(), Size::new(24.0, 40.0));

    icon.set_image_sized(&disc(), Size::ZERO);
    let mask = icon.mask().expect("mask");
    assert_eq!((mask.width(), mask.height()), (SIDE, SIDE));

    let assets = MemoryAssets::new().with("ring.svg", RING_SVG.to_vec());
    icon.set_named_vector_sized(&assets, "ring", Size::new(48.0, 48.0));
    let mask = icon.mask().expect("vector mask");
    assert_eq!((mask.width(), mask.height()), (48, 48));
    icon.set_named(&assets, "ring");
    assert_eq!(icon.bounds(), Size::new(32.0, 32.0));
}

#[test]
fn named_constructors_load_through_assets() {
    let assets = MemoryAssets::new().with("ring.svg", RING_SVG.to_vec());

    let mut icon = IconView::from_named_vector(&assets, "ring");
    icon.set_color(Some(css::LIME));
    let image = icon.render_image();
    assert_eq!((image.width(), image.height()), (32, 32));
    assert_eq!(rgba(&image, 16, 16), [0, 255, 0, 255]);
    assert_eq!(rgba(&image, 0, 0)[3], 0);

    let icon = IconView::from_named_sized(&assets, "ring.svg", Size::new(10.0, 10.0));
    assert_eq!(icon.bounds(), Size::new(10.0, 10.0));

    // The vector is not found under bitmap extensions.
    let icon = IconView::from_named_image(&assets, "ring");
    assert!(icon.mask().is_none());
}

#[test]
fn named_bitmap_at_explicit_size() {
    let assets = MemoryAssets::new().with("disc.png", disc_png());

    let mut icon = IconView::from_named_image_sized(&assets, "disc", Size::new(32.0, 32.0));
    let mask = icon.mask().expect("bitmap mask");
    assert_eq!((mask.width(), mask.height()), (32, 32));
    assert_eq!(icon.bounds(), Size::new(32.0, 32.0));

    icon.set_color(Some(css::RED));
    let image = icon.render_image();
    assert_eq!((image.width(), image.height()), (32, 32));
    assert_close(rgba(&image, 16, 16), [255, 0, 0, 255], "downscaled disc center");
    assert_eq!(rgba(&image, 0, 0)[3], 0);

    icon.set_named_image_sized(&assets, "disc.png", Size::new(100.0, 50.0));
    let mask = icon.mask().expect("bitmap mask");
    assert_eq!((mask.width(), mask.height()), (100, 50));
    assert_eq!(icon.bounds(), Size::new(100.0, 50.0));
    let image = icon.render_image();
    assert_eq!((image.width(), image.height()), (100, 50));
    assert_close(rgba(&image, 50, 25), [255, 0, 0, 255], "stretched disc center");
}

#[test]
fn dotted_base_names_find_their_files() {
    let assets = MemoryAssets::new()
        .with("icon.small.png", disc_png())
        .with("ring.v2.svg", RING_SVG.to_vec());

    let icon = IconView::from_named(&assets, "icon.small");
    let mask = icon.mask().expect("generic lookup of a dotted name");
    assert_eq!((mask.width(), mask.height()), (SIDE, SIDE));

    let icon = IconView::from_named_image(&assets, "icon.small");
    assert!(icon.mask().is_some(), "bitmap lookup of a dotted name");

    let mut icon = IconView::new();
    icon.set_named_vector(&assets, "ring.v2");
    assert_eq!(icon.bounds(), Size::new(32.0, 32.0));
}

#[test]
fn missing_resource_paints_only_the_callback() {
    let calls = Rc::new(Cell::new(0_u32));
    let assets = MemoryAssets::new();

    let mut icon = IconView::from_named_image_sized(&assets, "ghost", Size::new(16.0, 16.0));
    assert!(icon.mask().is_none());
    assert_eq!(icon.bounds(), Size::new(16.0, 16.0));

    icon.set_color(Some(css::RED));
    icon.set_overlay(Some(solid_overlay(16, 16, |_, _| [0, 255, 0, 255])));
    let seen = Rc::clone(&calls);
    icon.set_draw_callback(move |_surface, bounds| {
        assert_eq!(bounds, kurbo::Rect::new(0.0, 0.0, 16.0, 16.0));
        seen.set(seen.get() + 1);
    });

    let image = icon.render_image();
    assert_eq!(calls.get(), 1);
    assert!(image.data().iter().all(|&b| b == 0), "nothing but the callback should paint");
}

#[test]
fn try_configure_reports_and_keeps_state() {
    let mut icon = red_blue_icon();
    let assets = MemoryAssets::new();
    let err = icon
        .try_configure(MaskSource::Named(&assets, "ghost"), None)
        .expect_err("nothing to load");
    assert!(matches!(err, understory_icon::MaskError::NotFound { .. }));
    assert!(icon.mask().is_some());
    assert_eq!(icon.bounds(), Size::new(64.0, 64.0));
}

#[test]
fn overlay_covers_full_bounds() {
    let mut icon = red_blue_icon();
    icon.set_overlay(Some(solid_overlay(SIDE, SIDE, |_, _| [0, 255, 0, 255])));

    let image = icon.render_image();
    assert_eq!(rgba(&image, 32, 32), [0, 255, 0, 255]);
    assert_eq!(rgba(&image, 0, 0), [0, 255, 0, 255], "overlay is not clipped to the mask");
}

#[test]
fn overlay_blend_mode_is_applied() {
    let mut icon = red_blue_icon();
    // Left half opaque green, right half transparent.
    icon.set_overlay(Some(solid_overlay(SIDE, SIDE, |x, _| {
        if x < SIDE / 2 { [0, 255, 0, 255] } else { [0, 0, 0, 0] }
    })));

    icon.set_overlay_blend_mode(Mix::Normal);
    let over = icon.render_image();
    assert_eq!(rgba(&over, 48, 32), [255, 0, 0, 255]);

    icon.set_overlay_blend_mode(Compose::Copy);
    let copied = icon.render_image();
    assert_eq!(rgba(&copied, 16, 32), [0, 255, 0, 255]);
    assert_eq!(rgba(&copied, 48, 32)[3], 0, "copy replaces the fill");

    icon.set_overlay_blend_mode(BlendMode::new(Mix::Multiply, Compose::SrcOver));
    let multiplied = icon.render_image();
    // Red multiplied by green is black.
    assert_eq!(rgba(&multiplied, 16, 32), [0, 0, 0, 255]);
    assert_eq!(rgba(&multiplied, 48, 32), [255, 0, 0, 255]);
}

#[test]
fn missing_colors_still_composite_overlay() {
    let mut icon = IconView::from_image(&disc());
    icon.set_overlay(Some(solid_overlay(8, 8, |_, _| [0, 0, 255, 255])));
    let image = icon.render_image();
    assert_close(rgba(&image, 32, 32), [0, 0, 255, 255], "overlay inside the mask");
    assert_close(rgba(&image, 1, 1), [0, 0, 255, 255], "overlay outside the mask");
}

#[test]
fn callback_draws_above_everything() {
    let mut icon = red_blue_icon();
    icon.set_overlay(Some(solid_overlay(SIDE, SIDE, |_, _| [0, 255, 0, 255])));
    icon.set_draw_callback(|surface, _| {
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 0, 255);
        let rect = Rect::from_xywh(30.0, 30.0, 4.0, 4.0).expect("rect");
        surface.fill_rect(rect, &paint, Transform::identity(), None);
    });

    let image = icon.render_image();
    assert_eq!(rgba(&image, 31, 31), [255, 255, 0, 255]);
    assert_eq!(rgba(&image, 20, 20), [0, 255, 0, 255]);
}

#[test]
fn clones_are_independent() {
    let original = red_blue_icon();
    let mut copy = original.clone();
    assert_eq!(copy.render_image(), original.render_image());
    assert_eq!(copy.render_highlighted_image(), original.render_highlighted_image());

    copy.set_color(Some(css::LIME));
    copy.set_overlay(Some(solid_overlay(4, 4, |_, _| [9, 9, 9, 255])));
    copy.set_image_sized(&disc(), Size::new(8.0, 8.0));

    assert_eq!(original.color(), Some(css::RED));
    assert!(original.overlay().is_none());
    assert_eq!(original.mask().map(|m| m.width()), Some(SIDE));
    assert_disc_filled(&original.render_image(), [255, 0, 0, 255]);
}

#[test]
fn luminance_channel_applies_on_next_configure() {
    let bright = DynamicImage::ImageRgba8(RgbaImage::from_fn(4, 4, |x, _| {
        if x < 2 { Rgba([255, 255, 255, 255]) } else { Rgba([0, 0, 0, 255]) }
    }));

    let mut icon = IconView::from_image(&bright);
    assert_eq!(icon.mask().expect("mask").coverage(3, 0), 255);

    icon.set_mask_channel(MaskChannel::Luminance);
    assert_eq!(icon.mask().expect("mask").coverage(3, 0), 255, "existing mask kept");

    icon.set_image(&bright);
    let mask = icon.mask().expect("mask");
    assert_eq!(mask.coverage(0, 0), 255);
    assert_eq!(mask.coverage(3, 0), 0);
}

#[test]
fn bounds_stretch_the_mask() {
    let mut icon = red_blue_icon();
    icon.set_bounds(Size::new(128.0, 128.0));
    let image = icon.render_image();
    assert_eq!((image.width(), image.height()), (128, 128));
    assert_close(rgba(&image, 64, 64), [255, 0, 0, 255], "stretched mask center");
    assert_eq!(rgba(&image, 1, 1)[3], 0);
}

#[test]
fn rendered_icons_export() {
    let mut icon = red_blue_icon();
    icon.set_color(Some(Color::from_rgba8(255, 0, 0, 128)));
    let image = icon.render_image();

    let data = image.to_image_data();
    assert_eq!((data.width, data.height), (SIDE, SIDE));
    assert_eq!(data.data.data().len(), (SIDE * SIDE * 4) as usize);

    let straight = image.to_rgba_image();
    let center = straight.get_pixel(32, 32).0;
    assert_close(center, [255, 0, 0, 128], "demultiplied center");

    let png = image.encode_png().expect("encode");
    let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
    assert_eq!(decoded.dimensions(), (SIDE, SIDE));
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
}
