use std::{fmt::Debug, path::PathBuf};

use common::config::{ChartSettings, ImageFormat};
use eyre::{Result, bail, eyre};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tracing::debug;

use crate::layout::{ChartLayout, Series};

const FONT: &str = "sans-serif";
const FONT_SIZE: u32 = 14;
const TICK_OFFSET: i32 = 6;

pub struct ChartJob {
    pub suite: String,
    pub filepath: PathBuf,
    pub layout: ChartLayout,
    pub size: (u32, u32),
}

fn plot_err<E: Debug>(err: E) -> eyre::Report {
    eyre!("Drawing chart: {err:?}")
}

/// Parses `#rrggbb` colours as used in the chart settings.
pub fn parse_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        bail!("Unsupported colour {hex}, expected #rrggbb");
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| eyre!("Invalid colour {hex}"))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

pub fn draw_chart(job: &ChartJob, settings: &ChartSettings) -> Result<()> {
    debug!("Plotting {} to {}", job.suite, job.filepath.display());
    match settings.format {
        ImageFormat::Svg => draw_on(
            SVGBackend::new(&job.filepath, job.size).into_drawing_area(),
            &job.layout,
            settings,
        ),
        ImageFormat::Png => draw_on(
            BitMapBackend::new(&job.filepath, job.size).into_drawing_area(),
            &job.layout,
            settings,
        ),
    }
}

fn draw_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    settings: &ChartSettings,
) -> Result<()> {
    let grid = parse_color(&settings.grid_color)?;
    let primary = parse_color(&settings.primary_color)?;
    let aux = parse_color(&settings.aux_color)?;

    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .margin_top(40)
        .x_label_area_size(2 * FONT_SIZE + 2 * TICK_OFFSET as u32)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..layout.x_max, 0f64..layout.y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(grid)
        .light_line_style(WHITE)
        .axis_style(grid)
        .y_labels(layout.y_max.floor() as usize + 1)
        .y_label_formatter(&|y| format!("{y:.0}"))
        .x_label_formatter(&|_| String::new())
        .y_desc("Speedup")
        .label_style((FONT, FONT_SIZE).into_font())
        .draw()
        .map_err(plot_err)?;

    let mut series = vec![(Series::Primary, primary, settings.primary_label.clone())];
    if layout.aux {
        series.push((Series::Aux, aux, settings.aux_label.clone()));
    }
    for (kind, color, label) in series {
        chart
            .draw_series(layout.bars(kind).map(|bar| {
                Rectangle::new([(bar.x0, 0.0), (bar.x1, bar.height)], color.filled())
            }))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    let value_style = (FONT, FONT_SIZE - 2)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(
            layout
                .labels
                .iter()
                .map(|label| Text::new(label.text.clone(), (label.x, label.y), value_style.clone())),
        )
        .map_err(plot_err)?;

    // Program names are placed by hand, the mesh only knows evenly spaced ticks
    let tick_style = (FONT, FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for tick in &layout.ticks {
        let (x, y) = chart.backend_coord(&(tick.x, 0.0));
        let y = if tick.staggered {
            y + 2 * TICK_OFFSET + FONT_SIZE as i32
        } else {
            y + TICK_OFFSET
        };
        root.draw(&Text::new(tick.text.clone(), (x, y), tick_style.clone()))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(grid)
        .label_font((FONT, FONT_SIZE).into_font())
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colours() {
        assert_eq!(parse_color("#2255ee").unwrap(), RGBColor(0x22, 0x55, 0xee));
        assert_eq!(parse_color("ee5500").unwrap(), RGBColor(0xee, 0x55, 0x00));
    }

    #[test]
    fn rejects_bad_colours() {
        assert!(parse_color("#25e").is_err());
        assert!(parse_color("#zz55ee").is_err());
        assert!(parse_color("").is_err());
    }
}
