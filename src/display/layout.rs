/*
 *  display/layout.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Cell grid geometry for the binary clock face
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::prelude::*;

/// Cells across the face: seconds, minutes, hours, day-of-month
pub const GRID_COLUMNS: u32 = 4;

/// Cells down the face, enough for the widest field (6 bits)
pub const GRID_ROWS: u32 = 6;

/// Fixed geometry of the clock face.
///
/// Built once at startup from configuration. Everything the layout needs
/// is derived from these five values, so the pixel math can be exercised
/// without a physical display attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    /// Screen width in pixels
    pub screen_width: u32,

    /// Screen height in pixels
    pub screen_height: u32,

    /// Outer radius of every cell circle
    pub circle_radius: u32,

    /// Gap between a circle and the edge of its cell, on each side
    pub circle_padding: u32,

    /// Ring thickness of an unfilled cell
    pub line_thickness: u32,
}

impl Default for DisplayGeometry {
    /// 144x168 reference watch display
    fn default() -> Self {
        Self {
            screen_width: 144,
            screen_height: 168,
            circle_radius: 12,
            circle_padding: 2,
            line_thickness: 2,
        }
    }
}

impl DisplayGeometry {
    /// Side of the square that holds one circle
    pub fn cell_size(&self) -> u32 {
        2 * (self.circle_radius + self.circle_padding)
    }

    /// Left margin that centers the grid horizontally.
    ///
    /// Integer division truncates, so an odd leftover pixel ends up on the
    /// right-hand side.
    pub fn side_padding(&self) -> i32 {
        (self.screen_width as i32 - (GRID_COLUMNS * self.cell_size()) as i32) / 2
    }

    /// Radius of the background disk that hollows out an unfilled cell
    pub fn inner_radius(&self) -> u32 {
        self.circle_radius.saturating_sub(self.line_thickness)
    }

    /// Width and height of the whole grid.
    ///
    /// `None` when any dimension would not fit an `i32` pixel coordinate.
    pub fn grid_size(&self) -> Option<Size> {
        let c = self
            .circle_radius
            .checked_add(self.circle_padding)?
            .checked_mul(2)?;
        let width = c.checked_mul(GRID_COLUMNS)?;
        let height = c.checked_mul(GRID_ROWS)?;
        let limit = i32::MAX as u32;
        if width > limit || height > limit || self.screen_width > limit || self.screen_height > limit {
            return None;
        }
        Some(Size::new(width, height))
    }

    /// Whether the full 4x6 grid fits on the screen
    pub fn fits_screen(&self) -> bool {
        self.grid_size()
            .is_some_and(|grid| grid.width <= self.screen_width && grid.height <= self.screen_height)
    }

    /// Pixel center of the cell at (`column`, `row`).
    ///
    /// Column 0 is leftmost, row 0 topmost. The grid hangs from the top
    /// edge; there is no vertical padding. Bounds are the caller's concern.
    pub fn center_of(&self, column: u32, row: u32) -> Point {
        let c = self.cell_size() as i32;
        Point::new(
            self.side_padding() + c / 2 + c * column as i32,
            c / 2 + c * row as i32,
        )
    }
}
