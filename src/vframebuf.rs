/*
 *  vframebuf.rs
 *
 *  BitClock - just a bit more
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A runtime-sized framebuffer for embedded-graphics.
///
/// Row-major, one color value per pixel. Anything drawn outside the
/// buffer is clipped silently.
#[derive(Debug, Clone, PartialEq)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Fill the whole buffer with a single color
    pub fn fill(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Color at `p`, `None` when outside the buffer
    pub fn pixel(&self, p: Point) -> Option<C> {
        self.idx(p).map(|i| self.buf[i])
    }

    /// Number of pixels currently holding `color`
    pub fn count(&self, color: C) -> usize {
        self.buf.iter().filter(|&&c| c == color).count()
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[C]> {
        // chunks_exact panics on a zero chunk size
        self.buf.chunks_exact(self.w.max(1)).take(self.h)
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // circles are drawn as horizontal spans, keep those cheap
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        for row in y0..y0 + height as usize {
            let base = row * self.w + x0;
            self.buf[base..base + width as usize].fill(color);
        }
        Ok(())
    }
}
