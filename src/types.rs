//! Shared types passed between the catalog, the carousel and the renderer.

use serde::Serialize;

/// A gallery image ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Resolved public download URL.
    pub src: String,
    /// Original object filename, used as alt text.
    pub alt: String,
}

/// Navigation step through a gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Signed step: `-1` for previous, `1` for next.
    pub fn step(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_steps_are_unit_signed() {
        assert_eq!(Direction::Next.step(), 1);
        assert_eq!(Direction::Previous.step(), -1);
    }
}
