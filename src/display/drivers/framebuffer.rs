/*
 *  display/drivers/framebuffer.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory monochrome driver - frames go to the terminal or a PBM file
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

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

/// Where a flushed frame ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSink {
    /// Redraw in place on stdout using half-block characters
    Terminal,

    /// Rewrite a plain (P1) PBM image on every flush
    Pbm(PathBuf),

    /// Keep the frame in memory only
    Discard,
}

/// Monochrome driver backed by a `VarFrameBuf`.
///
/// Drawing lands in memory; `flush` hands the finished frame to the
/// configured sink. Inversion is applied on output only, so the
/// framebuffer always holds "on" for lit cell pixels.
#[derive(Debug)]
pub struct FramebufferDriver {
    framebuffer: VarFrameBuf<BinaryColor>,
    capabilities: DisplayCapabilities,
    sink: FrameSink,
    inverted: bool,
    frames: u64,
}

impl FramebufferDriver {
    pub fn new(width: u32, height: u32, sink: FrameSink) -> Self {
        Self {
            framebuffer: VarFrameBuf::new(width, height, BinaryColor::Off),
            capabilities: DisplayCapabilities {
                width,
                height,
                supports_invert: true,
            },
            sink,
            inverted: false,
            frames: 0,
        }
    }

    /// Current frame contents
    pub fn framebuffer(&self) -> &VarFrameBuf<BinaryColor> {
        &self.framebuffer
    }

    /// Number of successful flushes so far
    pub fn frames_flushed(&self) -> u64 {
        self.frames
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Frame as terminal text, two pixel rows per line
    pub fn to_text(&self) -> String {
        render_text(&self.framebuffer, self.inverted)
    }

    /// Frame as a plain PBM document
    pub fn to_pbm(&self) -> String {
        render_pbm(&self.framebuffer, self.inverted)
    }
}

#[inline]
fn lit(color: BinaryColor, inverted: bool) -> bool {
    color.is_on() != inverted
}

/// Half-block rendering: each character covers one column and two rows.
pub fn render_text(fb: &VarFrameBuf<BinaryColor>, inverted: bool) -> String {
    let mut out = String::with_capacity((fb.width() * 3 + 1) * fb.height().div_ceil(2));
    let rows: Vec<&[BinaryColor]> = fb.rows().collect();
    for pair in rows.chunks(2) {
        let top = pair[0];
        let bottom = pair.get(1).copied();
        for (x, &t) in top.iter().enumerate() {
            let t = lit(t, inverted);
            let b = bottom.is_some_and(|row| lit(row[x], inverted));
            out.push(match (t, b) {
                (true, true) => '\u{2588}',
                (true, false) => '\u{2580}',
                (false, true) => '\u{2584}',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    out
}

/// Plain PBM, 1 is black. Lit pixels print as white, so they map to 0.
pub fn render_pbm(fb: &VarFrameBuf<BinaryColor>, inverted: bool) -> String {
    let mut out = String::with_capacity(fb.width() * fb.height() * 2 + 32);
    // writing into a String cannot fail
    let _ = writeln!(out, "P1");
    let _ = writeln!(out, "{} {}", fb.width(), fb.height());
    for row in fb.rows() {
        let line: Vec<&str> = row
            .iter()
            .map(|&c| if lit(c, inverted) { "0" } else { "1" })
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

impl DisplayDriver for FramebufferDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        match &self.sink {
            FrameSink::Terminal => {
                // clear screen, hide cursor
                let mut stdout = io::stdout().lock();
                stdout.write_all(b"\x1b[2J\x1b[?25l")?;
                stdout.flush()?;
            }
            FrameSink::Pbm(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    if !dir.is_dir() {
                        return Err(DisplayError::InitializationFailed(format!(
                            "output directory {} does not exist",
                            dir.display()
                        )));
                    }
                }
                info!("Writing frames to {}", path.display());
            }
            FrameSink::Discard => {}
        }
        self.framebuffer.fill(BinaryColor::Off);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        match &self.sink {
            FrameSink::Terminal => {
                let text = self.to_text();
                let mut stdout = io::stdout().lock();
                stdout.write_all(b"\x1b[H")?;
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
            FrameSink::Pbm(path) => {
                // write aside then rename so viewers never see a torn frame
                let tmp = path.with_extension("pbm.tmp");
                fs::write(&tmp, self.to_pbm())?;
                if let Err(e) = fs::rename(&tmp, path) {
                    let _ = fs::remove_file(&tmp);
                    return Err(e.into());
                }
            }
            FrameSink::Discard => {}
        }
        self.frames += 1;
        debug!("frame {} flushed", self.frames);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.fill(BinaryColor::Off);
        self.flush()
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.inverted = inverted;
        Ok(())
    }
}

impl Drop for FramebufferDriver {
    fn drop(&mut self) {
        if self.sink == FrameSink::Terminal {
            // restore the cursor
            let _ = io::stdout().write_all(b"\x1b[?25h");
            let _ = io::stdout().flush();
        }
    }
}

impl DrawTarget for FramebufferDriver {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }
}

impl OriginDimensions for FramebufferDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}
