//! Pixel-level drawing primitives: lines and filled triangles.
//!
//! Both primitives clip against the framebuffer rectangle before
//! writing, and every write still goes through the framebuffer's
//! bounds-checked accessors.

use crate::framebuffer::{Framebuffer, Rgba};

/// A projected vertex: screen x, screen y, depth.
pub type ScreenPoint = (f32, f32, f32);

// Cohen-Sutherland outcodes.
const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

fn outcode(x: f32, y: f32, x_max: f32, y_max: f32) -> u8 {
    let mut code = INSIDE;
    if x < 0.0 {
        code |= LEFT;
    } else if x > x_max {
        code |= RIGHT;
    }
    if y < 0.0 {
        code |= TOP;
    } else if y > y_max {
        code |= BOTTOM;
    }
    code
}

/// Cohen-Sutherland clip of a segment to the pixel rectangle.
/// Returns integer endpoints, or `None` if the segment lies entirely
/// outside the framebuffer (or has a non-finite coordinate).
fn clip_line(
    mut x0: f32,
    mut y0: f32,
    mut x1: f32,
    mut y1: f32,
    width: usize,
    height: usize,
) -> Option<(i32, i32, i32, i32)> {
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let x_max = width as f32 - 1.0;
    let y_max = height as f32 - 1.0;
    let mut code0 = outcode(x0, y0, x_max, y_max);
    let mut code1 = outcode(x1, y1, x_max, y_max);

    loop {
        if code0 | code1 == INSIDE {
            return Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32));
        }
        if code0 & code1 != INSIDE {
            return None;
        }

        let out = if code0 != INSIDE { code0 } else { code1 };
        let (x, y) = if out & TOP != INSIDE {
            (x0 + (x1 - x0) * (0.0 - y0) / (y1 - y0), 0.0)
        } else if out & BOTTOM != INSIDE {
            (x0 + (x1 - x0) * (y_max - y0) / (y1 - y0), y_max)
        } else if out & RIGHT != INSIDE {
            (x_max, y0 + (y1 - y0) * (x_max - x0) / (x1 - x0))
        } else {
            (0.0, y0 + (y1 - y0) * (0.0 - x0) / (x1 - x0))
        };

        if out == code0 {
            x0 = x;
            y0 = y;
            code0 = outcode(x0, y0, x_max, y_max);
        } else {
            x1 = x;
            y1 = y;
            code1 = outcode(x1, y1, x_max, y_max);
        }
    }
}

/// Draw a line with Bresenham's algorithm, clipped to the framebuffer.
/// Lines ignore the depth buffer; wireframe rendering draws every edge.
pub fn draw_line(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let Some((mut x0, mut y0, x1, y1)) = clip_line(x0, y0, x1, y1, fb.width(), fb.height())
    else {
        return;
    };

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fb.put_pixel(x0, y0, color);
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

/// Rasterize a filled triangle with per-pixel depth interpolation.
///
/// Scanline over the clipped bounding box; a pixel is covered when all
/// three barycentric weights are non-negative. Degenerate triangles
/// (near-zero area) are skipped.
pub fn fill_triangle(
    fb: &mut Framebuffer,
    v0: ScreenPoint,
    v1: ScreenPoint,
    v2: ScreenPoint,
    color: Rgba,
) {
    let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
    let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(fb.width() as i32 - 1);
    let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
    let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(fb.height() as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            if let Some((w0, w1, w2)) = barycentric(
                (v0.0, v0.1),
                (v1.0, v1.1),
                (v2.0, v2.1),
                (px, py),
            ) {
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    fb.put_pixel_depth(x, y, depth, color);
                }
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle.
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(fb: &Framebuffer, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * fb.width() + x) * 4;
        let bytes = &fb.as_bytes()[offset..offset + 4];
        [bytes[0], bytes[1], bytes[2], bytes[3]]
    }

    #[test]
    fn test_line_plots_both_endpoints() {
        let mut fb = Framebuffer::new(32, 32);
        draw_line(&mut fb, 5.0, 5.0, 20.0, 11.0, Rgba::WHITE);
        assert_eq!(pixel(&fb, 5, 5), [255, 255, 255, 255]);
        assert_eq!(pixel(&fb, 20, 11), [255, 255, 255, 255]);
    }

    #[test]
    fn test_fully_offscreen_line_writes_nothing() {
        let mut fb = Framebuffer::new(16, 16);
        let before = fb.as_bytes().to_vec();
        draw_line(&mut fb, -50.0, -50.0, -10.0, -20.0, Rgba::WHITE);
        draw_line(&mut fb, 100.0, 0.0, 100.0, 100.0, Rgba::WHITE);
        assert_eq!(fb.as_bytes(), &before[..]);
    }

    #[test]
    fn test_crossing_line_is_clipped_not_dropped() {
        let mut fb = Framebuffer::new(16, 16);
        // Horizontal line through the middle, both endpoints outside.
        draw_line(&mut fb, -100.0, 8.0, 100.0, 8.0, Rgba::WHITE);
        assert_eq!(pixel(&fb, 0, 8), [255, 255, 255, 255]);
        assert_eq!(pixel(&fb, 15, 8), [255, 255, 255, 255]);
    }

    #[test]
    fn test_non_finite_line_is_dropped() {
        let mut fb = Framebuffer::new(16, 16);
        let before = fb.as_bytes().to_vec();
        draw_line(&mut fb, f32::NAN, 0.0, 8.0, 8.0, Rgba::WHITE);
        assert_eq!(fb.as_bytes(), &before[..]);
    }

    #[test]
    fn test_triangle_covers_its_centroid() {
        let mut fb = Framebuffer::new(32, 32);
        let color = Rgba::new(50, 60, 70, 255);
        fill_triangle(
            &mut fb,
            (4.0, 4.0, 0.0),
            (28.0, 6.0, 0.0),
            (16.0, 26.0, 0.0),
            color,
        );
        assert_eq!(pixel(&fb, 16, 12), [50, 60, 70, 255]);
    }

    #[test]
    fn test_degenerate_triangle_is_skipped() {
        let mut fb = Framebuffer::new(16, 16);
        let before = fb.as_bytes().to_vec();
        fill_triangle(
            &mut fb,
            (2.0, 2.0, 0.0),
            (8.0, 8.0, 0.0),
            (14.0, 14.0, 0.0),
            Rgba::WHITE,
        );
        assert_eq!(fb.as_bytes(), &before[..]);
    }

    #[test]
    fn test_nearer_triangle_occludes_farther_one() {
        let mut fb = Framebuffer::new(32, 32);
        let far = Rgba::new(1, 1, 1, 255);
        let near = Rgba::new(2, 2, 2, 255);
        fill_triangle(&mut fb, (0.0, 0.0, 10.0), (30.0, 0.0, 10.0), (0.0, 30.0, 10.0), far);
        fill_triangle(&mut fb, (0.0, 0.0, 5.0), (30.0, 0.0, 5.0), (0.0, 30.0, 5.0), near);
        assert_eq!(pixel(&fb, 5, 5), [2, 2, 2, 255]);

        // Drawing the far one again must not overwrite the near one.
        fill_triangle(&mut fb, (0.0, 0.0, 10.0), (30.0, 0.0, 10.0), (0.0, 30.0, 10.0), far);
        assert_eq!(pixel(&fb, 5, 5), [2, 2, 2, 255]);
    }

    #[test]
    fn test_partially_offscreen_triangle_stays_in_bounds() {
        let mut fb = Framebuffer::new(16, 16);
        // Would panic on an unchecked write if clipping were wrong.
        fill_triangle(
            &mut fb,
            (-20.0, -20.0, 0.0),
            (40.0, 8.0, 0.0),
            (8.0, 40.0, 0.0),
            Rgba::WHITE,
        );
        assert_eq!(fb.len(), 16 * 16 * 4);
    }
}
