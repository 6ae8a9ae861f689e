// Chart rendering for the plot projection.
//
// One line series per region over the year axis, a dashed horizontal line at
// the mean of all plotted values, comma-grouped y labels, rotated year
// ticks, and a legend column to the right of the plot area. Rendered to a
// PNG file; the caller prints its path.
use crate::types::PlotProjection;
use crate::util::format_int;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontTransform;
use std::error::Error;
use std::path::Path;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 640;
const LEGEND_WIDTH: i32 = 200;

pub fn render(projection: &PlotProjection, out_path: &Path) -> Result<(), Box<dyn Error>> {
    if projection.points.is_empty() {
        return Err("nothing to plot".into());
    }

    // Points arrive grouped by region, so contiguous runs form the series.
    let mut series: Vec<(String, Vec<(i32, f64)>)> = Vec::new();
    for p in &projection.points {
        match series.last_mut() {
            Some((region, pts)) if *region == p.region => pts.push((p.year, p.value)),
            _ => series.push((p.region.clone(), vec![(p.year, p.value)])),
        }
    }

    let mut x_min = i32::MAX;
    let mut x_max = i32::MIN;
    let mut y_lo = projection.mean;
    let mut y_hi = projection.mean;
    for p in &projection.points {
        x_min = x_min.min(p.year);
        x_max = x_max.max(p.year);
        y_lo = y_lo.min(p.value);
        y_hi = y_hi.max(p.value);
    }
    if x_min == x_max {
        x_max += 1;
    }
    let pad = ((y_hi - y_lo) * 0.05).max(1.0);
    let (y_lo, y_hi) = (y_lo - pad, y_hi + pad);

    let root = BitMapBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let (chart_area, legend_area) = root.split_horizontally(WIDTH as i32 - LEGEND_WIDTH);

    let mut chart = ChartBuilder::on(&chart_area)
        .caption("Emissions by region", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(58)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .x_labels(((x_max - x_min) as usize + 1).min(16))
        .x_label_formatter(&|year| year.to_string())
        .x_label_style(
            ("sans-serif", 13)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_formatter(&|v| format_int(v.round() as i64))
        .draw()?;

    for (idx, (_, pts)) in series.iter().enumerate() {
        let color = Palette99::pick(idx);
        chart.draw_series(LineSeries::new(pts.iter().copied(), color.stroke_width(2)))?;
    }

    chart.draw_series(DashedLineSeries::new(
        [(x_min, projection.mean), (x_max, projection.mean)],
        8,
        5,
        BLACK.stroke_width(1),
    ))?;

    // Region name at each region's peak year.
    for (region, year, value) in &projection.peaks {
        chart.draw_series(std::iter::once(Text::new(
            region.clone(),
            (*year, *value),
            ("sans-serif", 13).into_font(),
        )))?;
    }

    legend_area.draw(&Text::new(
        "Regions".to_string(),
        (10, 30),
        ("sans-serif", 16).into_font(),
    ))?;
    for (idx, (region, _)) in series.iter().enumerate() {
        let y = 56 + idx as i32 * 22;
        let color = Palette99::pick(idx);
        legend_area.draw(&PathElement::new(vec![(10, y), (38, y)], color.stroke_width(2)))?;
        legend_area.draw(&Text::new(
            region.clone(),
            (46, y - 7),
            ("sans-serif", 14).into_font(),
        ))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_projection_is_rejected_before_touching_the_backend() {
        let projection = PlotProjection {
            points: Vec::new(),
            mean: 0.0,
            peaks: Vec::new(),
        };
        assert!(render(&projection, Path::new("/nonexistent/out.png")).is_err());
    }
}
