//! Turns a [`DisplayState`] into the badge bitmap.
//!
//! Panels escalate with severity: a warning draws a border around the
//! cell, danger fills the cell with ink and draws its content in paper.
mod bitmap;
mod icons;
pub mod layout;

pub use bitmap::Bitmap;
pub use icons::{Icon, ICON_SIZE};

use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, StrokeAlignment};
use embedded_graphics::text::{Baseline, Text};

use crate::state::DisplayState;
use crate::thresholds::Severity;
use layout::{Cell, Content, GRID, HEIGHT, ICON_OFFSET, TEXT_OFFSET, WARNING_BORDER, WIDTH};

/// Shown in place of a value when the sensor could not be read.
pub const NO_DATA: &str = "--";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Outline every cell, handy when tweaking the layout.
    pub debug_borders: bool,
}

pub fn render(state: &DisplayState, options: &RenderOptions) -> Bitmap {
    let mut bitmap = Bitmap::new(WIDTH, HEIGHT);
    if let Err(never) = draw_display(&mut bitmap, state, options) {
        match never {}
    }
    bitmap
}

pub fn draw_display<D>(
    target: &mut D,
    state: &DisplayState,
    options: &RenderOptions,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    for cell in &GRID {
        let (text, severity) = cell_text(cell, state);
        draw_panel(target, cell, text.as_deref(), severity)?;
        if options.debug_borders {
            cell.bounds()
                .into_styled(
                    PrimitiveStyleBuilder::new()
                        .stroke_color(BinaryColor::On)
                        .stroke_width(1)
                        .stroke_alignment(StrokeAlignment::Inside)
                        .build(),
                )
                .draw(target)?;
        }
    }
    Ok(())
}

/// Formatted value with unit, or `None` for no data.
fn cell_text(cell: &Cell, state: &DisplayState) -> (Option<String>, Severity) {
    match cell.content {
        Content::Sensor(kind) => {
            let entry = state.entry(kind);
            let text = entry
                .reading
                .format(kind.format())
                .map(|value| format!("{value}{}", kind.unit()));
            (text, entry.severity)
        }
        Content::Time => (Some(state.time()), Severity::Normal),
        Content::Date => (Some(state.date()), Severity::Normal),
    }
}

/// Draws one panel; `text == None` draws the [`NO_DATA`] glyph.
pub fn draw_panel<D>(
    target: &mut D,
    cell: &Cell,
    text: Option<&str>,
    severity: Severity,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let bounds = cell.bounds();
    let (fg, bg) = match severity {
        Severity::Danger => (BinaryColor::Off, BinaryColor::On),
        _ => (BinaryColor::On, BinaryColor::Off),
    };

    bounds.into_styled(PrimitiveStyle::with_fill(bg)).draw(target)?;
    if severity == Severity::Warning {
        bounds
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .stroke_color(fg)
                    .stroke_width(WARNING_BORDER)
                    .stroke_alignment(StrokeAlignment::Inside)
                    .build(),
            )
            .draw(target)?;
    }

    cell.icon.draw(target, bounds.top_left + ICON_OFFSET, fg, bg)?;

    let style = MonoTextStyle::new(&FONT_10X20, fg);
    let origin = bounds.top_left + TEXT_OFFSET;
    Text::with_baseline(text.unwrap_or(NO_DATA), origin, style, Baseline::Top).draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::layout::{cell_for, CELL_HEIGHT, CELL_WIDTH};
    use crate::sensors::{Reading, SensorKind};
    use crate::thresholds::ThresholdConfig;

    use chrono::NaiveDate;

    fn state_with(readings: Vec<(SensorKind, Reading)>) -> DisplayState {
        let now = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(13, 37, 0).unwrap();
        DisplayState::new(readings, &ThresholdConfig::default(), now)
    }

    fn cell_ink(bitmap: &Bitmap, cell: &Cell) -> usize {
        let b = cell.bounds();
        bitmap.ink_in(b.top_left.x as u32, b.top_left.y as u32, CELL_WIDTH, CELL_HEIGHT)
    }

    #[test]
    fn normal_panel_has_no_border() {
        let state = state_with(vec![(SensorKind::Co2, Reading::Number(600.0))]);
        let bitmap = render(&state, &RenderOptions::default());
        assert!(!bitmap.is_ink(0, 0));
        assert!(!bitmap.is_ink(CELL_WIDTH - 1, CELL_HEIGHT - 1));
    }

    #[test]
    fn warning_draws_border_without_inverting() {
        let state = state_with(vec![(SensorKind::Co2, Reading::Number(1500.0))]);
        assert_eq!(state.entry(SensorKind::Co2).severity, Severity::Warning);
        let bitmap = render(&state, &RenderOptions::default());

        let border = [
            (0, 0),
            (1, 1),
            (CELL_WIDTH - 1, 0),
            (0, CELL_HEIGHT - 1),
            (CELL_WIDTH - 2, CELL_HEIGHT - 2),
        ];
        for (x, y) in border {
            assert!(bitmap.is_ink(x, y), "border missing at {x},{y}");
        }
        // just inside the border
        assert!(!bitmap.is_ink(2, 2));
        let cell = cell_for(SensorKind::Co2).unwrap();
        assert!(cell_ink(&bitmap, cell) < (CELL_WIDTH * CELL_HEIGHT / 2) as usize);
    }

    #[test]
    fn danger_inverts_panel() {
        let state = state_with(vec![(SensorKind::Co2, Reading::Number(2500.0))]);
        assert_eq!(state.entry(SensorKind::Co2).severity, Severity::Danger);
        let bitmap = render(&state, &RenderOptions::default());

        assert!(bitmap.is_ink(2, 2));
        assert!(bitmap.is_ink(CELL_WIDTH - 3, CELL_HEIGHT - 3));
        let cell = cell_for(SensorKind::Co2).unwrap();
        assert!(cell_ink(&bitmap, cell) > (CELL_WIDTH * CELL_HEIGHT / 2) as usize);

        // the neighbouring panel stays paper
        assert!(!bitmap.is_ink(CELL_WIDTH + 2, 2));
    }

    #[test]
    fn unavailable_value_draws_no_data_glyph() {
        let state = state_with(vec![
            (SensorKind::Co2, Reading::Unavailable),
            (SensorKind::Co, Reading::Number(40.0)),
        ]);
        let bitmap = render(&state, &RenderOptions::default());

        let co2 = cell_for(SensorKind::Co2).unwrap();
        let mut expected = Bitmap::new(WIDTH, HEIGHT);
        draw_panel(&mut expected, co2, None, Severity::Normal).unwrap();
        let glyph = co2.bounds().top_left + TEXT_OFFSET;
        for y in 0..CELL_HEIGHT {
            for x in TEXT_OFFSET.x as u32..CELL_WIDTH {
                assert_eq!(bitmap.is_ink(x, y), expected.is_ink(x, y), "{x},{y}");
            }
        }
        assert!(expected.ink_in(glyph.x as u32, glyph.y as u32, 20, 20) > 0);

        // CO still renders, and at danger level
        let co = cell_for(SensorKind::Co).unwrap().bounds();
        assert!(bitmap.is_ink(co.top_left.x as u32 + 2, co.top_left.y as u32 + 2));
    }

    #[test]
    fn text_value_differs_from_no_data() {
        let options = RenderOptions::default();
        let co2 = vec![(SensorKind::Co2, Reading::Number(812.0))];
        let with_value = render(&state_with(co2), &options);
        let without = render(&state_with(vec![]), &options);
        assert_ne!(with_value, without);
    }

    #[test]
    fn all_unavailable_still_renders_clock() {
        let bitmap = render(&state_with(vec![]), &RenderOptions::default());
        let clock = GRID.iter().find(|c| c.content == Content::Time).unwrap().bounds();
        let text = clock.top_left + TEXT_OFFSET;
        assert!(bitmap.ink_in(text.x as u32, text.y as u32, 50, 20) > 0);
    }

    #[test]
    fn debug_borders_outline_every_cell() {
        let options = RenderOptions {
            debug_borders: true,
        };
        let bitmap = render(&state_with(vec![]), &options);
        for cell in &GRID {
            let b = cell.bounds();
            assert!(bitmap.is_ink(b.top_left.x as u32, b.top_left.y as u32));
        }
    }
}
