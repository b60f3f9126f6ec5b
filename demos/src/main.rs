// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless icon rendering demo.
//!
//! Builds a few icons from an in-memory SVG and writes each one as a PNG,
//! normal and highlighted, into the directory given as the first argument
//! (the current directory by default).
//!
//! Run with `RUST_LOG=debug` to see asset resolution.

use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba, RgbaImage};
use kurbo::Size;
use peniko::color::palette::css;
use peniko::Mix;
use understory_icon::{FillStyle, IconView, MemoryAssets, Overlay, RenderedIcon};

const STAR_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
  <path d="M12 2 L15 9 L22 9.5 L16.5 14 L18.5 21 L12 17 L5.5 21 L7.5 14 L2 9.5 L9 9 Z" fill="black"/>
</svg>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    std::fs::create_dir_all(&out_dir)?;

    let assets = MemoryAssets::new().with("star.svg", STAR_SVG.as_bytes().to_vec());
    let size = Size::new(96.0, 96.0);

    let mut solid = IconView::from_named_sized(&assets, "star", size);
    solid.set_fill_style(FillStyle::solid(css::CRIMSON).with_highlighted(css::ROYAL_BLUE));
    write_pair(&out_dir, "star_solid", &solid)?;

    let mut gradient = solid.clone();
    gradient.set_gradient_start_color(Some(css::GOLD));
    gradient.set_gradient_end_color(Some(css::DARK_ORANGE));
    write_pair(&out_dir, "star_gradient", &gradient)?;

    let mut shaded = solid.clone();
    shaded.set_overlay(Overlay::from_image(&stripes(16, 16)));
    shaded.set_overlay_blend_mode(Mix::Multiply);
    shaded.set_draw_callback(draw_badge);
    write_pair(&out_dir, "star_shaded", &shaded)?;

    Ok(())
}

/// Renders `icon` in both states and writes `<stem>.png` and `<stem>_highlighted.png`.
fn write_pair(dir: &Path, stem: &str, icon: &IconView) -> Result<(), Box<dyn std::error::Error>> {
    write_png(&dir.join(format!("{stem}.png")), &icon.render_image())?;
    write_png(
        &dir.join(format!("{stem}_highlighted.png")),
        &icon.render_highlighted_image(),
    )?;
    Ok(())
}

fn write_png(path: &Path, icon: &RenderedIcon) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, icon.encode_png()?)?;
    log::info!(
        "wrote {} ({}x{})",
        path.display(),
        icon.width(),
        icon.height()
    );
    Ok(())
}

/// Diagonal grey stripes, used as a multiply overlay.
fn stripes(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 8 < 4 {
            Rgba([160, 160, 160, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    }))
}

/// A small translucent square in the corner, drawn by the icon's callback.
#[allow(
    clippy::cast_possible_truncation,
    reason = "demo icon bounds are small"
)]
fn draw_badge(surface: &mut tiny_skia::PixmapMut<'_>, bounds: kurbo::Rect) {
    let side = (bounds.width() / 4.0) as f32;
    let Some(rect) = tiny_skia::Rect::from_xywh(
        bounds.x1 as f32 - side,
        bounds.y0 as f32,
        side,
        side,
    ) else {
        return;
    };
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(255, 255, 255, 200);
    surface.fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
}
