//! Stroke completion annotations: numbered badge and directional arrowhead.
//!
//! Both are keyed off the direction of travel at the end of a stroke. Points
//! that coincide with the terminal point are skipped so a repeated last point
//! never produces a zero-length direction.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::color::Rgba;

/// Badge dimensions and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeStyle {
    /// Circle radius.
    pub radius: f32,
    /// Distance from the terminal point, along the stroke's perpendicular.
    pub offset: f32,
    /// Minimum gap between the circle and the canvas edge.
    pub margin: f32,
    /// Outline width (outline uses the stroke color).
    pub ring_width: f32,
    /// Label size in pixels (bold).
    pub font_px: f32,
    /// Circle fill behind the label.
    pub fill: Rgba,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            radius: 16.0,
            offset: 26.0,
            margin: 4.0,
            ring_width: 2.0,
            font_px: 16.0,
            fill: Rgba::WHITE.with_alpha(0.95),
        }
    }
}

/// Arrowhead dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    /// Tip to base distance.
    pub length: f32,
    /// Half of the base width.
    pub half_width: f32,
    /// How far past the terminal point the tip sits.
    pub forward_offset: f32,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            length: 18.0,
            half_width: 9.0,
            forward_offset: 10.0,
        }
    }
}

/// A numbered circle marking the completion order of a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub center: Vec2,
    pub radius: f32,
    /// 1-based stroke number.
    pub number: usize,
    /// Outline and label color.
    pub color: Rgba,
    pub fill: Rgba,
    pub ring_width: f32,
    pub font_px: f32,
}

impl Badge {
    pub fn label(&self) -> String {
        self.number.to_string()
    }
}

/// Filled triangle pointing along the stroke direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Vec2,
    pub left: Vec2,
    pub right: Vec2,
    pub color: Rgba,
}

impl Arrowhead {
    pub fn vertices(&self) -> [Vec2; 3] {
        [self.tip, self.left, self.right]
    }
}

/// Direction of travel at the end of `points`, in radians.
///
/// Uses the nearest preceding point that differs from the terminal point.
/// `None` when the stroke has no such point.
pub fn terminal_angle(points: &[Vec2]) -> Option<f32> {
    let (&end, rest) = points.split_last()?;
    let prev = rest.iter().rev().find(|&&p| p != end)?;
    let d = end - *prev;
    Some(d.y.atan2(d.x))
}

/// Clamp `p` so it stays `inset` away from every edge of a `canvas`-sized area.
pub fn clamp_to_canvas(p: Vec2, inset: f32, canvas: Vec2) -> Vec2 {
    let min = Vec2::splat(inset);
    let max = (canvas - Vec2::splat(inset)).max(min);
    p.max(min).min(max)
}

/// Place the badge for a completed stroke.
///
/// The center sits `style.offset` along the perpendicular of the final
/// direction, then is clamped inside the canvas. Strokes without a direction
/// use an angle of zero.
pub fn badge_for_stroke(
    points: &[Vec2],
    number: usize,
    color: Rgba,
    style: &BadgeStyle,
    canvas: Vec2,
) -> Option<Badge> {
    let end = *points.last()?;
    let angle = terminal_angle(points).unwrap_or(0.0);
    let raw = end + Vec2::from_angle(angle + FRAC_PI_2) * style.offset;
    Some(Badge {
        center: clamp_to_canvas(raw, style.radius + style.margin, canvas),
        radius: style.radius,
        number,
        color,
        fill: style.fill,
        ring_width: style.ring_width,
        font_px: style.font_px,
    })
}

/// Build the arrowhead for a completed stroke, or `None` if it has no direction.
pub fn arrowhead_for_stroke(points: &[Vec2], color: Rgba, style: &ArrowStyle) -> Option<Arrowhead> {
    let end = *points.last()?;
    let dir = Vec2::from_angle(terminal_angle(points)?);
    let tip = end + dir * style.forward_offset;
    let base = tip - dir * style.length;
    let side = Vec2::new(dir.y, -dir.x) * style.half_width;
    Some(Arrowhead {
        tip,
        left: base + side,
        right: base - side,
        color,
    })
}
