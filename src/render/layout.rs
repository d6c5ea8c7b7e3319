//! Fixed badge layout.
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::icons::{Icon, ICON_SIZE};
use crate::sensors::SensorKind;

/// Badger2040 panel resolution.
pub const WIDTH: u32 = 296;
pub const HEIGHT: u32 = 128;

pub const COLS: u32 = 2;
pub const ROWS: u32 = 4;

pub const CELL_WIDTH: u32 = WIDTH / COLS;
pub const CELL_HEIGHT: u32 = HEIGHT / ROWS;

/// Icon inset from the cell's top-left corner.
pub const ICON_OFFSET: Point = Point::new(4, ((CELL_HEIGHT - ICON_SIZE) / 2) as i32);

/// Top-left of the value text relative to the cell.
pub const TEXT_OFFSET: Point = Point::new(ICON_SIZE as i32 + 12, 6);

pub const WARNING_BORDER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Sensor(SensorKind),
    Time,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub content: Content,
    pub icon: Icon,
}

impl Cell {
    pub const fn new(row: u32, col: u32, content: Content, icon: Icon) -> Cell {
        Cell {
            row,
            col,
            content,
            icon,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(
            Point::new((self.col * CELL_WIDTH) as i32, (self.row * CELL_HEIGHT) as i32),
            Size::new(CELL_WIDTH, CELL_HEIGHT),
        )
    }
}

pub const GRID: [Cell; 8] = [
    Cell::new(0, 0, Content::Sensor(SensorKind::Co2), Icon::Seedling),
    Cell::new(0, 1, Content::Sensor(SensorKind::Co), Icon::Flame),
    Cell::new(1, 0, Content::Sensor(SensorKind::Pm25), Icon::Sparkles),
    Cell::new(1, 1, Content::Sensor(SensorKind::Humidity), Icon::Droplet),
    Cell::new(2, 0, Content::Sensor(SensorKind::OutsideTemp), Icon::Sun),
    Cell::new(2, 1, Content::Sensor(SensorKind::IndoorTemp), Icon::Home),
    Cell::new(3, 0, Content::Time, Icon::Clock),
    Cell::new(3, 1, Content::Date, Icon::Calendar),
];

/// The cell that shows `kind`.
pub fn cell_for(kind: SensorKind) -> Option<&'static Cell> {
    GRID.iter().find(|cell| cell.content == Content::Sensor(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sensor_has_exactly_one_cell() {
        for kind in SensorKind::ALL {
            let count = GRID.iter().filter(|c| c.content == Content::Sensor(kind)).count();
            assert_eq!(count, 1, "{kind}");
        }
    }

    #[test]
    fn cells_tile_the_screen() {
        let mut covered = vec![false; (COLS * ROWS) as usize];
        for cell in &GRID {
            let slot = &mut covered[(cell.row * COLS + cell.col) as usize];
            assert!(!*slot, "cell {},{} used twice", cell.row, cell.col);
            *slot = true;
        }
        assert!(covered.iter().all(|c| *c));

        let last = GRID[GRID.len() - 1].bounds();
        assert_eq!(last.top_left + last.size, Point::new(WIDTH as i32, HEIGHT as i32));
    }
}
