//! Drawing primitives
//!
//! All primitives clip silently against the image bounds.

use crate::Asset;
use image::Rgb;

/// Fill the rectangle `[x, x + w) x [y, y + h)`
pub fn fill_rect(image: &mut Asset, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(image.width());
    let y_end = y.saturating_add(h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, color);
        }
    }
}

/// Draw a one-pixel rectangle outline
pub fn stroke_rect(image: &mut Asset, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    fill_rect(image, x, y, w, 1, color);
    fill_rect(image, x, y + h - 1, w, 1, color);
    fill_rect(image, x, y, 1, h, color);
    fill_rect(image, x + w - 1, y, 1, h, color);
}

/// Draw a line between two points with the given thickness
pub fn draw_line(
    image: &mut Asset,
    from: (i64, i64),
    to: (i64, i64),
    thickness: u32,
    color: Rgb<u8>,
) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let half = (thickness / 2) as i64;

    loop {
        plot(image, x0 - half, y0 - half, thickness.max(1), color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fill a `size` x `size` square whose top-left may lie off the image
fn plot(image: &mut Asset, x: i64, y: i64, size: u32, color: Rgb<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + size as i64).min(image.width() as i64);
    let y1 = (y + size as i64).min(image.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            image.put_pixel(px as u32, py as u32, color);
        }
    }
}
