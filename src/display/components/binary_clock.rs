/*
 *  display/components/binary_clock.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Binary clock face - time fields as columns of filled/outlined cells
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

use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use crate::clock::TimeSnapshot;
use crate::display::layout::DisplayGeometry;

/// One binary digit on the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Pixel center of the circle
    pub center: Point,

    /// A set bit is a solid disk, a clear bit an outlined ring
    pub filled: bool,
}

/// Receiver of cell draw commands.
///
/// A `RenderContext` turns cells into pixels; a `Vec<Cell>` simply
/// records them, which is how the face is inspected without a display.
pub trait CellSink {
    type Error;

    fn draw_cell(&mut self, cell: Cell) -> Result<(), Self::Error>;
}

impl CellSink for Vec<Cell> {
    type Error = Infallible;

    fn draw_cell(&mut self, cell: Cell) -> Result<(), Self::Error> {
        self.push(cell);
        Ok(())
    }
}

/// Borrowed drawing surface for a single render pass
pub struct RenderContext<'a, D> {
    target: &'a mut D,
    geometry: DisplayGeometry,
}

impl<'a, D> RenderContext<'a, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: &'a mut D, geometry: DisplayGeometry) -> Self {
        Self { target, geometry }
    }
}

impl<D> CellSink for RenderContext<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Error = D::Error;

    fn draw_cell(&mut self, cell: Cell) -> Result<(), Self::Error> {
        draw_cell(self.target, &self.geometry, cell)
    }
}

/// Odd diameter keeps the disk centred on a pixel
#[inline]
fn disk_diameter(radius: u32) -> u32 {
    2 * radius + 1
}

/// Paint one cell.
///
/// A full disk goes down in the "on" color; a clear bit then gets a smaller
/// background disk on top, leaving a ring `line_thickness` wide. Two fills
/// rather than a stroke keep the outer radius and the inner edge exact.
pub fn draw_cell<D>(target: &mut D, geometry: &DisplayGeometry, cell: Cell) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Circle::with_center(cell.center, disk_diameter(geometry.circle_radius))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

    if !cell.filled {
        Circle::with_center(cell.center, disk_diameter(geometry.inner_radius()))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(target)?;
    }

    Ok(())
}

/// The four time fields shown on the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeField {
    /// Draw order; columns are disjoint so any order gives the same frame
    pub const ALL: [TimeField; 4] = [TimeField::Day, TimeField::Hour, TimeField::Minute, TimeField::Second];

    /// Rightmost column changes fastest
    pub const fn column(self) -> u32 {
        match self {
            TimeField::Second => 0,
            TimeField::Minute => 1,
            TimeField::Hour => 2,
            TimeField::Day => 3,
        }
    }

    /// Binary digits rendered for the field; higher bits are dropped
    pub const fn max_rows(self, is_24h: bool) -> u32 {
        match self {
            TimeField::Second | TimeField::Minute => 6,
            TimeField::Day => 5,
            TimeField::Hour => {
                if is_24h { 5 } else { 4 }
            }
        }
    }

    /// Value of this field in `snapshot`, with the hour already folded for 12h
    pub fn value(self, snapshot: &TimeSnapshot) -> u32 {
        match self {
            TimeField::Second => snapshot.second as u32,
            TimeField::Minute => snapshot.minute as u32,
            TimeField::Hour => snapshot.display_hour() as u32,
            TimeField::Day => snapshot.day_of_month as u32,
        }
    }
}

/// Binary clock face renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryClockFace {
    geometry: DisplayGeometry,
}

impl BinaryClockFace {
    pub fn new(geometry: DisplayGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    /// Draw `value` down `column`, least significant bit in the top row.
    pub fn render_column<S: CellSink>(
        &self,
        sink: &mut S,
        value: u32,
        max_rows: u32,
        column: u32,
    ) -> Result<(), S::Error> {
        for row in 0..max_rows {
            let bit = value.checked_shr(row).unwrap_or(0) & 0x1;
            sink.draw_cell(Cell {
                center: self.geometry.center_of(column, row),
                filled: bit != 0,
            })?;
        }
        Ok(())
    }

    /// Draw every column for one snapshot
    pub fn render<S: CellSink>(&self, sink: &mut S, snapshot: &TimeSnapshot) -> Result<(), S::Error> {
        for field in TimeField::ALL {
            self.render_column(
                sink,
                field.value(snapshot),
                field.max_rows(snapshot.is_24h),
                field.column(),
            )?;
        }
        Ok(())
    }

    /// The cells of one snapshot, in draw order
    pub fn cells(&self, snapshot: &TimeSnapshot) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(22);
        match self.render(&mut cells, snapshot) {
            Ok(()) => cells,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeFields;
    use crate::vframebuf::VarFrameBuf;

    fn snapshot(day: u8, hour: u8, minute: u8, second: u8, is_24h: bool) -> TimeSnapshot {
        TimeSnapshot::new(TimeFields::new(day, hour, minute, second), is_24h)
    }

    fn column_bits(cells: &[Cell], geometry: &DisplayGeometry, column: u32) -> Vec<u8> {
        let x = geometry.center_of(column, 0).x;
        cells
            .iter()
            .filter(|c| c.center.x == x)
            .map(|c| c.filled as u8)
            .collect()
    }

    #[test]
    fn test_render_column_bits() {
        let face = BinaryClockFace::default();
        for value in 0u32..64 {
            let mut cells = Vec::new();
            face.render_column(&mut cells, value, 6, 0).unwrap();
            assert_eq!(cells.len(), 6);
            for (row, cell) in cells.iter().enumerate() {
                assert_eq!(cell.filled, (value >> row) & 1 == 1, "value {} row {}", value, row);
                assert_eq!(cell.center, face.geometry().center_of(0, row as u32));
            }
        }
    }

    #[test]
    fn test_render_column_truncates() {
        let face = BinaryClockFace::default();
        for max_rows in 1..=6u32 {
            for value in 0u32..200 {
                let mut cells = Vec::new();
                face.render_column(&mut cells, value, max_rows, 2).unwrap();
                let rebuilt: u32 = cells
                    .iter()
                    .enumerate()
                    .map(|(row, c)| (c.filled as u32) << row)
                    .sum();
                assert_eq!(rebuilt, value % (1 << max_rows));
            }
        }
    }

    #[test]
    fn test_lsb_is_top_row() {
        let face = BinaryClockFace::default();
        let mut cells = Vec::new();
        face.render_column(&mut cells, 1, 6, 1).unwrap();
        assert!(cells[0].filled);
        assert!(cells[1..].iter().all(|c| !c.filled));
        assert!(cells[0].center.y < cells[1].center.y);
    }

    #[test]
    fn test_row_counts() {
        assert_eq!(TimeField::Day.max_rows(true), 5);
        assert_eq!(TimeField::Day.max_rows(false), 5);
        assert_eq!(TimeField::Hour.max_rows(true), 5);
        assert_eq!(TimeField::Hour.max_rows(false), 4);
        assert_eq!(TimeField::Minute.max_rows(false), 6);
        assert_eq!(TimeField::Second.max_rows(true), 6);
    }

    #[test]
    fn test_column_assignment() {
        assert_eq!(TimeField::Second.column(), 0);
        assert_eq!(TimeField::Minute.column(), 1);
        assert_eq!(TimeField::Hour.column(), 2);
        assert_eq!(TimeField::Day.column(), 3);
    }

    #[test]
    fn test_scenario_24h() {
        let face = BinaryClockFace::default();
        let g = *face.geometry();
        let cells = face.cells(&snapshot(9, 3, 7, 45, true));
        assert_eq!(cells.len(), 5 + 5 + 6 + 6);
        assert_eq!(column_bits(&cells, &g, 3), vec![1, 0, 0, 1, 0]);
        assert_eq!(column_bits(&cells, &g, 2), vec![1, 1, 0, 0, 0]);
        assert_eq!(column_bits(&cells, &g, 1), vec![1, 1, 1, 0, 0, 0]);
        assert_eq!(column_bits(&cells, &g, 0), vec![1, 0, 1, 1, 0, 1]);
    }

    #[test]
    fn test_scenario_midnight_12h() {
        let face = BinaryClockFace::default();
        let g = *face.geometry();
        let cells = face.cells(&snapshot(1, 0, 0, 0, false));
        assert_eq!(cells.len(), 5 + 4 + 6 + 6);
        // 12 = 0b1100
        assert_eq!(column_bits(&cells, &g, 2), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let face = BinaryClockFace::default();
        let snap = snapshot(31, 23, 59, 59, true);
        assert_eq!(face.cells(&snap), face.cells(&snap));
    }

    #[test]
    fn test_draw_cell_filled() {
        let g = DisplayGeometry::default();
        let mut fb = VarFrameBuf::new(g.screen_width, g.screen_height, BinaryColor::Off);
        let center = g.center_of(0, 0);
        draw_cell(&mut fb, &g, Cell { center, filled: true }).unwrap();

        assert_eq!(fb.pixel(center), Some(BinaryColor::On));
        assert_eq!(fb.pixel(center + Point::new(11, 0)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(center + Point::new(0, -12)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(center + Point::new(14, 0)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_draw_cell_unfilled_is_ring() {
        let g = DisplayGeometry::default();
        let mut fb = VarFrameBuf::new(g.screen_width, g.screen_height, BinaryColor::Off);
        let center = g.center_of(2, 3);
        draw_cell(&mut fb, &g, Cell { center, filled: false }).unwrap();

        assert_eq!(fb.pixel(center), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(center + Point::new(10, 0)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(center + Point::new(11, 0)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(center + Point::new(-11, 0)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(center + Point::new(0, 11)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(center + Point::new(14, 0)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_unfilled_overwrites_filled() {
        let g = DisplayGeometry::default();
        let mut fb = VarFrameBuf::new(g.screen_width, g.screen_height, BinaryColor::Off);
        let center = g.center_of(1, 1);
        draw_cell(&mut fb, &g, Cell { center, filled: true }).unwrap();
        draw_cell(&mut fb, &g, Cell { center, filled: false }).unwrap();
        assert_eq!(fb.pixel(center), Some(BinaryColor::Off));
    }

    #[test]
    fn test_render_context_paints_cells() {
        let g = DisplayGeometry::default();
        let face = BinaryClockFace::new(g);
        let mut fb = VarFrameBuf::new(g.screen_width, g.screen_height, BinaryColor::Off);
        let snap = snapshot(9, 3, 7, 45, true);
        face.render(&mut RenderContext::new(&mut fb, g), &snap).unwrap();

        for cell in face.cells(&snap) {
            let expected = if cell.filled { BinaryColor::On } else { BinaryColor::Off };
            assert_eq!(fb.pixel(cell.center), Some(expected), "cell at {:?}", cell.center);
        }
        // nothing drawn in the side margins
        assert_eq!(fb.pixel(Point::new(2, 14)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(Point::new(141, 14)), Some(BinaryColor::Off));
    }
}
