//! Screen-space primitives shared by the host seam and the resize tracker.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Below,
    Above,
}

/// Popup offset relative to the wrapper's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub left: f64,
    pub top: f64,
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

/// Anchors the popup under the selected element's left edge, flipping to the
/// right edge or above the element when it would overflow the wrapper.
pub fn place_popup(selected: Bounds, wrapper: Bounds, popup: Size) -> PopupPlacement {
    let mut left = selected.x - wrapper.x;
    let mut top = selected.bottom() - wrapper.y;
    let mut horizontal = HorizontalAlign::Left;
    let mut vertical = VerticalAlign::Below;

    if left + popup.width > wrapper.width {
        left = (selected.right() - wrapper.x - popup.width).max(0.0);
        horizontal = HorizontalAlign::Right;
    }

    let above = selected.y - wrapper.y - popup.height;
    if top + popup.height > wrapper.height && above >= 0.0 {
        top = above;
        vertical = VerticalAlign::Above;
    }

    PopupPlacement {
        left,
        top,
        horizontal,
        vertical,
    }
}
