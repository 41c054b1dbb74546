/*
 *  display/traits.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for display driver abstraction
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

use crate::display::error::DisplayError;

/// Display capabilities and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Whether the display supports inversion
    pub supports_invert: bool,
}

/// Minimal surface abstraction for the clock face.
///
/// Drawing itself goes through embedded-graphics: every driver also
/// implements `DrawTarget<Color = BinaryColor>`. This trait covers the
/// lifecycle around a frame, most importantly `flush`, which is the
/// repaint trigger issued once per render pass.
pub trait DisplayDriver {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Prepare the display for the first frame
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Push the current framebuffer out to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Blank the framebuffer and push it out
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Swap light and dark pixels on output
    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError>;
}
