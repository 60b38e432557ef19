use std::time::Duration;

use crate::raster::coverage::StrokeStyle;

/// Interval between dash-offset advances.
pub const MARCHING_ANTS_TICK: Duration = Duration::from_millis(100);

const DASH: [f64; 2] = [5.0, 5.0];
const PERIOD: u8 = 8;
const LINE_WIDTH: f64 = 2.0;

/// Dash-offset state of the animated selection border.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarchingAnts {
    offset: u8,
}

impl MarchingAnts {
    pub fn offset(self) -> u8 {
        self.offset
    }

    pub fn tick(&mut self) {
        self.offset = (self.offset + 1) % PERIOD;
    }

    pub fn stroke_style(self) -> StrokeStyle {
        StrokeStyle::dashed(LINE_WIDTH, &DASH, f64::from(self.offset))
    }
}
