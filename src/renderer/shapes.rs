//! Shape generation for 2D primitives
//!
//! All coordinates are logical screen pixels (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Filled axis-aligned rectangle (two triangles)
pub fn rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, t, color),
        Vertex::new(rt, t, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, b, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside `r`
pub fn rect_outline(r: Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(r.w / 2.0).min(r.h / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(Rect::new(r.x, r.y, r.w, t), color));
    vertices.extend(rect(Rect::new(r.x, r.bottom() - t, r.w, t), color));
    vertices.extend(rect(Rect::new(r.x, r.y + t, t, r.h - 2.0 * t), color));
    vertices.extend(rect(Rect::new(r.right() - t, r.y + t, t, r.h - 2.0 * t), color));
    vertices
}

/// Rectangle with rounded corners (center cross plus four quarter discs)
pub fn rounded_rect(r: Rect, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rad = radius.min(r.w / 2.0).min(r.h / 2.0).max(0.0);
    if rad <= 0.0 {
        return rect(r, color);
    }
    let mut vertices = Vec::new();
    vertices.extend(rect(Rect::new(r.x + rad, r.y, r.w - 2.0 * rad, r.h), color));
    vertices.extend(rect(Rect::new(r.x, r.y + rad, rad, r.h - 2.0 * rad), color));
    vertices.extend(rect(Rect::new(r.right() - rad, r.y + rad, rad, r.h - 2.0 * rad), color));

    let corners = [
        (Vec2::new(r.x + rad, r.y + rad), PI),
        (Vec2::new(r.right() - rad, r.y + rad), 1.5 * PI),
        (Vec2::new(r.right() - rad, r.bottom() - rad), 0.0),
        (Vec2::new(r.x + rad, r.bottom() - rad), 0.5 * PI),
    ];
    for (center, start) in corners {
        vertices.extend(sector(center, rad, start, start + 0.5 * PI, color, 6));
    }
    vertices
}

/// Pie slice from angle `a0` to `a1`
fn sector(center: Vec2, radius: f32, a0: f32, a1: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let t1 = a0 + (a1 - a0) * i as f32 / segments as f32;
        let t2 = a0 + (a1 - a0) * (i + 1) as f32 / segments as f32;
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * t1.cos(),
            center.y + radius * t1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * t2.cos(),
            center.y + radius * t2.sin(),
            color,
        ));
    }
    vertices
}

/// Filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    sector(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Hollow circle
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let point = |r: f32, theta: f32| Vec2::new(center.x + r * theta.cos(), center.y + r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = point(inner_radius, theta1);
        let outer1 = point(outer_radius, theta1);
        let inner2 = point(inner_radius, theta2);
        let outer2 = point(outer_radius, theta2);

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Textured quad covering `r` with the full texture, tinted by `color`
pub fn textured_quad(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    vec![
        Vertex::textured(l, t, 0.0, 0.0, color),
        Vertex::textured(l, b, 0.0, 1.0, color),
        Vertex::textured(rt, t, 1.0, 0.0, color),
        Vertex::textured(rt, t, 1.0, 0.0, color),
        Vertex::textured(l, b, 0.0, 1.0, color),
        Vertex::textured(rt, b, 1.0, 1.0, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let vertices = rect(Rect::new(10.0, 20.0, 30.0, 40.0), [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 4.0, 5.0, [1.0; 4], 16).len(), 96);
    }

    #[test]
    fn test_rounded_rect_stays_inside() {
        let r = Rect::new(0.0, 0.0, 100.0, 40.0);
        for v in rounded_rect(r, 8.0, [1.0; 4]) {
            assert!(v.position[0] >= -1e-3 && v.position[0] <= 100.0 + 1e-3);
            assert!(v.position[1] >= -1e-3 && v.position[1] <= 40.0 + 1e-3);
        }
    }

    #[test]
    fn test_textured_quad_uvs() {
        let quad = textured_quad(Rect::new(0.0, 0.0, 2.0, 2.0), [1.0; 4]);
        assert_eq!(quad[0].uv, [0.0, 0.0]);
        assert_eq!(quad[5].uv, [1.0, 1.0]);
    }
}
