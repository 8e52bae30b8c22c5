// ABOUTME: Normalized rectangles for laying out panes.
// ABOUTME: Containers divide their extent evenly among their children.

use tg_core::Axis;

/// Rectangle in normalized coordinates (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn full() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Cut into `count` equal slices along `axis`
    pub fn split(&self, axis: Axis, count: usize) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let share = 1.0 / count as f32;
        (0..count)
            .map(|i| match axis {
                Axis::Row => Rect {
                    x: self.x + self.width * share * i as f32,
                    y: self.y,
                    width: self.width * share,
                    height: self.height,
                },
                Axis::Column => Rect {
                    x: self.x,
                    y: self.y + self.height * share * i as f32,
                    width: self.width,
                    height: self.height * share,
                },
            })
            .collect()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::full()
    }
}
