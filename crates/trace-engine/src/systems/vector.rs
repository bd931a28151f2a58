//! Lyon-tessellated trace surface.
//!
//! Turns drawing calls into a flat triangle list that a GPU host can upload
//! as-is. Badge numbers cannot be tessellated without a font, so they are
//! collected in a side list for the host to render as text.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, StrokeOptions,
    StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::renderer::color::Rgba;
use crate::renderer::traits::TraceSurface;
use crate::systems::geometry::{Arrowhead, Badge};

/// Per-vertex data: position then color.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            x,
            y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// Text the host draws centered on a badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeLabel {
    pub center: Vec2,
    pub text: String,
    pub color: Rgba,
    pub font_px: f32,
}

struct Ctor(Rgba);

impl FillVertexConstructor<VectorVertex> for Ctor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position().x, vertex.position().y, self.0)
    }
}

impl StrokeVertexConstructor<VectorVertex> for Ctor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position().x, vertex.position().y, self.0)
    }
}

pub struct VectorSurface {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    vertices: Vec<VectorVertex>,
    labels: Vec<BadgeLabel>,
    tolerance: f32,
}

impl VectorSurface {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            vertices: Vec::with_capacity(4096),
            labels: Vec::new(),
            tolerance: 0.25,
        }
    }

    /// Triangle list, three vertices per triangle.
    pub fn vertices(&self) -> &[VectorVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex data as raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn labels(&self) -> &[BadgeLabel] {
        &self.labels
    }

    fn flush_geometry(&mut self) {
        let VertexBuffers { vertices, indices } = &mut self.geometry;
        self.vertices.extend(indices.iter().map(|&i| vertices[i as usize]));
        vertices.clear();
        indices.clear();
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(self.tolerance),
            &mut BuffersBuilder::new(&mut self.geometry, Ctor(color)),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => log::warn!("trace: fill tessellation failed: {e:?}"),
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: Rgba) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(self.tolerance).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, Ctor(color)),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => log::warn!("trace: stroke tessellation failed: {e:?}"),
        }
    }

    fn circle(center: Vec2, radius: f32) -> Path {
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        builder.build()
    }
}

impl Default for VectorSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSurface for VectorSurface {
    fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
    }

    fn fill_point(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius > 0.0 {
            self.fill_path(&Self::circle(center, radius), color);
        }
    }

    fn draw_badge(&mut self, badge: &Badge) {
        if badge.radius <= 0.0 {
            return;
        }
        let path = Self::circle(badge.center, badge.radius);
        self.fill_path(&path, badge.fill);
        if badge.ring_width > 0.0 {
            self.stroke_path(&path, badge.ring_width, badge.color);
        }
        self.labels.push(BadgeLabel {
            center: badge.center,
            text: badge.label(),
            color: badge.color,
            font_px: badge.font_px,
        });
    }

    fn fill_arrowhead(&mut self, arrow: &Arrowhead) {
        let [tip, left, right] = arrow.vertices();
        let mut builder = Path::builder();
        builder.begin(point(tip.x, tip.y));
        builder.line_to(point(left.x, left.y));
        builder.line_to(point(right.x, right.y));
        builder.close();
        self.fill_path(&builder.build(), arrow.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    fn arrow() -> Arrowhead {
        Arrowhead {
            tip: Vec2::new(210.0, 100.0),
            left: Vec2::new(192.0, 91.0),
            right: Vec2::new(192.0, 109.0),
            color: Rgba::BLACK,
        }
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(size_of::<VectorVertex>(), 24);
        assert_eq!(VectorVertex::STRIDE_BYTES, 24);
    }

    #[test]
    fn arrowhead_is_one_triangle() {
        let mut surface = VectorSurface::new();
        surface.fill_arrowhead(&arrow());
        assert_eq!(surface.vertex_count(), 3);
        assert_eq!(surface.as_bytes().len(), 3 * VectorVertex::STRIDE_BYTES);
    }

    #[test]
    fn point_uses_its_color() {
        let mut surface = VectorSurface::new();
        let color = Rgba::rgb(0.0, 0.5, 1.0);
        surface.fill_point(Vec2::new(50.0, 50.0), 4.0, color);
        assert!(surface.vertex_count() >= 3);
        assert_eq!(surface.vertex_count() % 3, 0);
        assert!(surface.vertices().iter().all(|v| v.b == 1.0 && v.g == 0.5));
    }

    #[test]
    fn badge_adds_label_and_clear_resets() {
        let mut surface = VectorSurface::new();
        surface.draw_badge(&Badge {
            center: Vec2::new(100.0, 100.0),
            radius: 16.0,
            number: 2,
            color: Rgba::BLACK,
            fill: Rgba::WHITE,
            ring_width: 2.0,
            font_px: 16.0,
        });
        assert!(surface.vertex_count() > 0);
        assert_eq!(surface.labels()[0].text, "2");

        surface.clear();
        assert_eq!(surface.vertex_count(), 0);
        assert!(surface.labels().is_empty());
    }

    #[test]
    fn zero_radius_draws_nothing() {
        let mut surface = VectorSurface::new();
        surface.fill_point(Vec2::ZERO, 0.0, Rgba::BLACK);
        assert_eq!(surface.vertex_count(), 0);
    }
}
