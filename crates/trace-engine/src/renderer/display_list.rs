use glam::Vec2;

use super::color::Rgba;
use super::traits::TraceSurface;
use crate::systems::geometry::{Arrowhead, Badge};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Point { center: Vec2, radius: f32, color: Rgba },
    Badge(Badge),
    Arrowhead(Arrowhead),
}

/// Surface that records every call instead of rasterizing.
/// Hosts can replay the commands; tests inspect them.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    attached: bool,
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(128),
            attached: true,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take all recorded commands, leaving the list empty.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Simulate the context going away (e.g. the canvas was unmounted).
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Points drawn since the last `Clear`.
    pub fn visible_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|c| match c {
            DrawCommand::Point { center, .. } => Some(*center),
            _ => None,
        })
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSurface for DisplayList {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_point(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Point { center, radius, color });
    }

    fn draw_badge(&mut self, badge: &Badge) {
        self.commands.push(DrawCommand::Badge(badge.clone()));
    }

    fn fill_arrowhead(&mut self, arrow: &Arrowhead) {
        self.commands.push(DrawCommand::Arrowhead(*arrow));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut list = DisplayList::new();
        list.clear();
        list.fill_point(Vec2::new(1.0, 2.0), 4.0, Rgba::BLACK);
        list.fill_arrowhead(&Arrowhead {
            tip: Vec2::ZERO,
            left: Vec2::X,
            right: Vec2::Y,
            color: Rgba::BLACK,
        });
        assert_eq!(list.len(), 3);
        assert_eq!(list.commands()[0], DrawCommand::Clear);
        assert!(matches!(list.commands()[2], DrawCommand::Arrowhead(_)));
    }

    #[test]
    fn visible_points_reset_on_clear() {
        let mut list = DisplayList::new();
        list.fill_point(Vec2::new(1.0, 1.0), 4.0, Rgba::BLACK);
        list.clear();
        list.fill_point(Vec2::new(2.0, 2.0), 4.0, Rgba::BLACK);
        let pts: Vec<Vec2> = list.visible_points().collect();
        assert_eq!(pts, vec![Vec2::new(2.0, 2.0)]);
    }

    #[test]
    fn detach_and_drain() {
        let mut list = DisplayList::new();
        assert!(list.is_attached());
        list.clear();
        list.detach();
        assert!(!list.is_attached());
        assert_eq!(list.drain().len(), 1);
        assert!(list.is_empty());
    }
}
