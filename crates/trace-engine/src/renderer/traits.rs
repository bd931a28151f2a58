//! Hosting surface contract.
//!
//! The sequencer never touches a concrete canvas. Hosts implement
//! [`TraceSurface`] over whatever they draw on: a browser Canvas 2D context
//! (`trace-web`), a tessellated vertex buffer ([`VectorSurface`]), or a
//! recorded [`DisplayList`].
//!
//! [`VectorSurface`]: crate::systems::vector::VectorSurface
//! [`DisplayList`]: super::display_list::DisplayList

use glam::Vec2;

use super::color::Rgba;
use crate::systems::geometry::{Arrowhead, Badge};

/// A fixed-size 2D drawing context.
///
/// # Example Implementation
///
/// ```ignore
/// struct SvgSurface { body: String }
///
/// impl TraceSurface for SvgSurface {
///     fn clear(&mut self) { self.body.clear(); }
///     fn fill_point(&mut self, center: Vec2, radius: f32, color: Rgba) {
///         // <circle cx=.. cy=.. r=.. fill=../>
///     }
///     fn draw_badge(&mut self, badge: &Badge) { /* circle + text */ }
///     fn fill_arrowhead(&mut self, arrow: &Arrowhead) { /* polygon */ }
/// }
/// ```
pub trait TraceSurface {
    /// Whether the underlying context still exists. Timer callbacks that find
    /// the surface detached stop quietly instead of drawing.
    fn is_attached(&self) -> bool {
        true
    }

    /// Erase the whole canvas.
    fn clear(&mut self);

    /// Filled circle marking one traced point.
    fn fill_point(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Filled, outlined circle with the stroke number centered in it.
    fn draw_badge(&mut self, badge: &Badge);

    /// Filled triangle showing the stroke direction.
    fn fill_arrowhead(&mut self, arrow: &Arrowhead);
}

impl<S: TraceSurface + ?Sized> TraceSurface for Box<S> {
    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_point(&mut self, center: Vec2, radius: f32, color: Rgba) {
        (**self).fill_point(center, radius, color)
    }

    fn draw_badge(&mut self, badge: &Badge) {
        (**self).draw_badge(badge)
    }

    fn fill_arrowhead(&mut self, arrow: &Arrowhead) {
        (**self).fill_arrowhead(arrow)
    }
}
