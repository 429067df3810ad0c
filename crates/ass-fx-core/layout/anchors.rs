//! Anchor coordinates for boxes and placement grids

use super::alignment::{Alignment, HAlign, VAlign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in script (canvas) pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Three horizontal and three vertical coordinates
///
/// Combining one of each gives the nine anchor points. For a placed box
/// they are its edges and midlines; for a line's placement grid they are
/// the box origins each alignment rule would produce.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchors {
    /// Left coordinate
    pub left: f64,
    /// Center coordinate
    pub center: f64,
    /// Right coordinate
    pub right: f64,
    /// Top coordinate
    pub top: f64,
    /// Middle coordinate
    pub middle: f64,
    /// Bottom coordinate
    pub bottom: f64,
}

impl Anchors {
    /// Edges and midlines of a box at (`left`, `top`) with the given size
    #[must_use]
    pub fn from_box(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            center: left + width / 2.0,
            right: left + width,
            top,
            middle: top + height / 2.0,
            bottom: top + height,
        }
    }

    /// Same vertical band, new horizontal extent
    #[must_use]
    pub fn with_horizontal(self, left: f64, width: f64) -> Self {
        Self {
            left,
            center: left + width / 2.0,
            right: left + width,
            ..self
        }
    }

    /// Horizontal coordinate for an alignment column
    #[must_use]
    pub const fn x(&self, horizontal: HAlign) -> f64 {
        match horizontal {
            HAlign::Left => self.left,
            HAlign::Center => self.center,
            HAlign::Right => self.right,
        }
    }

    /// Vertical coordinate for an alignment row
    #[must_use]
    pub const fn y(&self, vertical: VAlign) -> f64 {
        match vertical {
            VAlign::Top => self.top,
            VAlign::Middle => self.middle,
            VAlign::Bottom => self.bottom,
        }
    }

    /// Anchor point for an alignment
    #[must_use]
    pub const fn point(&self, alignment: Alignment) -> Point {
        Point::new(self.x(alignment.horizontal), self.y(alignment.vertical))
    }

    /// All nine anchor points, top row first, each row left to right
    #[must_use]
    pub fn grid(&self) -> [[Point; 3]; 3] {
        [VAlign::Top, VAlign::Middle, VAlign::Bottom].map(|vertical| {
            [HAlign::Left, HAlign::Center, HAlign::Right]
                .map(|horizontal| self.point(Alignment::new(horizontal, vertical)))
        })
    }

    /// Width between the left and right coordinates
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height between the top and bottom coordinates
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}
