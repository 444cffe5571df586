//! Temperature chart, one line per city

use crate::config::PlotConfig;
use crate::models::CombinedDataset;
use crate::{CityTempError, Result};
use chrono::{Duration, NaiveDateTime};
use plotters::coord::Shift;
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use std::error::Error;
use std::sync::OnceLock;
use tracing::debug;

const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

type Series<'a> = Vec<(&'a str, Vec<(NaiveDateTime, f64)>)>;

/// Points per city, sorted by city name, with gaps (`NaN`) dropped
#[must_use]
pub fn series_by_city(dataset: &CombinedDataset) -> Series<'_> {
    dataset
        .by_city()
        .into_iter()
        .map(|(city, readings)| {
            let points: Vec<_> = readings
                .into_iter()
                .filter(|r| !r.temperature.is_nan())
                .map(|r| (r.timestamp, r.temperature))
                .collect();
            (city, points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect()
}

/// Make the embedded font available to plotters; registration happens once per process
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA).is_ok());
    if registered {
        Ok(())
    } else {
        Err(CityTempError::plot("embedded chart font could not be loaded"))
    }
}

/// Render the chart to `config.output_path`; `.svg` paths get an SVG, anything else a bitmap
pub fn plot_dataset(dataset: &CombinedDataset, config: &PlotConfig) -> Result<()> {
    let series = series_by_city(dataset);
    if series.is_empty() {
        return Err(CityTempError::plot("no temperature values to plot"));
    }
    ensure_font()?;

    let path = config.output_path.as_path();
    let size = (config.width, config.height);
    debug!("Plotting {} series to {}", series.len(), path.display());

    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let drawn = if is_svg {
        draw(SVGBackend::new(path, size).into_drawing_area(), &series)
    } else {
        draw(BitMapBackend::new(path, size).into_drawing_area(), &series)
    };

    drawn.map_err(|e| CityTempError::plot(e.to_string()))
}

fn draw<DB>(root: DrawingArea<DB, Shift>, series: &Series<'_>) -> std::result::Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut points = series.iter().flat_map(|(_, points)| points.iter().copied());
    let Some((first_dt, first_temp)) = points.next() else {
        return Ok(());
    };

    let (mut min_dt, mut max_dt) = (first_dt, first_dt);
    let (mut min_temp, mut max_temp) = (first_temp, first_temp);
    for (dt, temp) in points {
        min_dt = min_dt.min(dt);
        max_dt = max_dt.max(dt);
        min_temp = min_temp.min(temp);
        max_temp = max_temp.max(temp);
    }
    if min_dt == max_dt {
        max_dt += Duration::hours(1);
    }
    let y_padding = if (max_temp - min_temp).abs() > 1e-6 {
        (max_temp - min_temp) * 0.1
    } else {
        1.0
    };

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Temperature Over Time", (FONT_FAMILY, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            RangedDateTime::from(min_dt..max_dt),
            (min_temp - y_padding)..(max_temp + y_padding),
        )?;

    chart
        .configure_mesh()
        .x_desc("Date/Time")
        .y_desc("Temperature (°F)")
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%m-%d %Hh").to_string())
        .light_line_style(BLACK.mix(0.15))
        .draw()?;

    for (index, (city, points)) in series.iter().enumerate() {
        let color = Palette99::pick(index).mix(1.0);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(*city)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 2, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
