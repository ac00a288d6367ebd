//! Cursor artwork for the part hover affordance: a disc filled with the
//! hovered part's color, a translucent ring around it, an arrow tip at the
//! hotspot and the part name underneath.
//!
//! Browser builds hand the SVG to the page as a data URL. Native windows only
//! take bitmaps, so [`cursor_image`] rasterizes the same shapes without the
//! label; the UI draws the name next to the pointer instead.

#[cfg(any(target_arch = "wasm32", test))]
use base64::{Engine, engine::general_purpose::STANDARD};
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use super::color::HexColor;
#[cfg(any(target_arch = "wasm32", test))]
use super::part::Part;

pub const CURSOR_SIZE: u32 = 64;
pub const CURSOR_HOTSPOT: (u16, u16) = (2, 2);

const CENTER: Vec2 = Vec2::new(29.5, 29.5);
const RING_RADIUS: f32 = 24.5;
const DISC_RADIUS: f32 = 17.5;
const OUTLINE: f32 = 1.0;
const ARROW: [Vec2; 3] = [Vec2::new(2.0, 2.0), Vec2::new(13.0, 4.947), Vec2::new(4.947, 13.0)];

#[cfg(any(target_arch = "wasm32", test))]
pub fn cursor_svg(color: HexColor, part: Part) -> String {
    format!(
        concat!(
            r#"<svg width="64" height="64" fill="none" xmlns="http://www.w3.org/2000/svg">"#,
            r##"<circle cx="29.5" cy="29.5" r="24.5" fill="rgba(255, 255, 255, 0.5)" stroke="#000"/>"##,
            r#"<circle cx="29.5" cy="29.5" r="17.5" fill="{color}"/>"#,
            r##"<path d="M2 2l11 2.947L4.947 13 2 2z" fill="#000"/>"##,
            r##"<text fill="#000" font-family="sans-serif" font-size="10" x="35" y="63">{name}</text>"##,
            r#"</svg>"#,
        ),
        color = color,
        name = part.name(),
    )
}

#[cfg(any(target_arch = "wasm32", test))]
pub fn cursor_data_url(color: HexColor, part: Part) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(cursor_svg(color, part))
    )
}

/// RGBA pixel of the cursor at pixel center `p`.
fn cursor_pixel(p: Vec2, fill: [u8; 3]) -> [u8; 4] {
    if point_in_triangle(p, ARROW) {
        return [0, 0, 0, 255];
    }
    let d = p.distance(CENTER);
    if d <= DISC_RADIUS {
        [fill[0], fill[1], fill[2], 255]
    } else if d <= RING_RADIUS - OUTLINE / 2.0 {
        [255, 255, 255, 128]
    } else if d <= RING_RADIUS + OUTLINE / 2.0 {
        [0, 0, 0, 255]
    } else {
        [0, 0, 0, 0]
    }
}

fn point_in_triangle(p: Vec2, [a, b, c]: [Vec2; 3]) -> bool {
    let side = |u: Vec2, v: Vec2| (v - u).perp_dot(p - u);
    let (d1, d2, d3) = (side(a, b), side(b, c), side(c, a));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

pub fn cursor_pixels(color: HexColor) -> Vec<u8> {
    let fill = [color.r, color.g, color.b];
    let mut data = Vec::with_capacity((CURSOR_SIZE * CURSOR_SIZE * 4) as usize);
    for y in 0..CURSOR_SIZE {
        for x in 0..CURSOR_SIZE {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            data.extend_from_slice(&cursor_pixel(p, fill));
        }
    }
    data
}

/// Bitmap cursor. Kept in the main world because the windowing backend reads
/// the pixels on the CPU.
pub fn cursor_image(color: HexColor) -> Image {
    Image::new(
        Extent3d {
            width: CURSOR_SIZE,
            height: CURSOR_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        cursor_pixels(color),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_at(data: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * CURSOR_SIZE + x) * 4) as usize;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    #[test]
    fn test_svg_carries_color_and_name() {
        let svg = cursor_svg(HexColor::rgb(0x12, 0x34, 0x56), Part::Stripes);
        assert!(svg.contains(r##"fill="#123456""##));
        assert!(svg.contains(">stripes</text>"));
        assert!(svg.starts_with("<svg") && svg.ends_with("</svg>"));
    }

    #[test]
    fn test_data_url_decodes_back_to_svg() {
        let url = cursor_data_url(HexColor::WHITE, Part::Laces);
        let encoded = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, cursor_svg(HexColor::WHITE, Part::Laces));
    }

    #[test]
    fn test_raster_layout() {
        let data = cursor_pixels(HexColor::rgb(200, 10, 20));
        assert_eq!(data.len(), (CURSOR_SIZE * CURSOR_SIZE * 4) as usize);
        // disc center
        assert_eq!(pixel_at(&data, 29, 29), [200, 10, 20, 255]);
        // translucent ring
        assert_eq!(pixel_at(&data, 29, 29 - 21), [255, 255, 255, 128]);
        // outside everything
        assert_eq!(pixel_at(&data, 63, 63), [0, 0, 0, 0]);
        // arrow tip near the hotspot
        assert_eq!(pixel_at(&data, 3, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn test_image_has_cursor_dimensions() {
        let image = cursor_image(HexColor::BLACK);
        assert_eq!(image.width(), CURSOR_SIZE);
        assert_eq!(image.height(), CURSOR_SIZE);
    }
}
