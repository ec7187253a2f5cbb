use common::config::ChartSettings;

use crate::SpeedupRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Primary,
    Aux,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub series: Series,
    pub x0: f64,
    pub x1: f64,
    /// Drawn height, clipped to the y axis
    pub height: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub x: f64,
    pub text: String,
    /// Every other label is pushed down a line so long names do not collide
    pub staggered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Chart geometry in data coordinates, independent of the drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub x_max: f64,
    pub y_max: f64,
    pub aux: bool,
    pub bars: Vec<Bar>,
    pub ticks: Vec<TickLabel>,
    pub labels: Vec<ValueLabel>,
}

impl ChartLayout {
    pub fn new(records: &[SpeedupRecord], aux: bool, settings: &ChartSettings) -> Self {
        let width = settings.bar_width;
        let y_max = settings.y_max;
        let space = if aux { width * 3.0 } else { width * 2.0 };

        let mut bars = Vec::new();
        let mut ticks = Vec::new();
        let mut last_start = 0.0;
        for (i, record) in records.iter().enumerate() {
            let start = width + i as f64 * space;
            last_start = start;

            bars.push(Bar::new(Series::Primary, start, width, record.speedup, y_max));
            let tick_x = if aux {
                bars.push(Bar::new(
                    Series::Aux,
                    start + width,
                    width,
                    record.aux_speedup,
                    y_max,
                ));
                start + width
            } else {
                start + width / 2.0
            };
            ticks.push(TickLabel {
                x: tick_x,
                text: record.name.clone(),
                staggered: i % 2 == 1,
            });
        }

        let labels = bars
            .iter()
            .filter(|bar| bar.value != 0.0)
            .map(|bar| ValueLabel {
                x: bar.x1,
                y: 1.05 * bar.value.min(y_max),
                text: format!("{:.2}", bar.value),
            })
            .collect();

        Self {
            x_max: last_start + 1.0,
            y_max,
            aux,
            bars,
            ticks,
            labels,
        }
    }

    pub fn bars(&self, series: Series) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(move |bar| bar.series == series)
    }
}

impl Bar {
    fn new(series: Series, x0: f64, width: f64, value: f64, y_max: f64) -> Self {
        Self {
            series,
            x0,
            x1: x0 + width,
            // y_max is not guaranteed to be positive here, so no clamp()
            height: value.max(0.0).min(y_max),
            value,
        }
    }
}
