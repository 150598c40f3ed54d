//! Diagnostic charts rendered to bitmap files via plotters.

use crate::selection::SelectionTrace;
use faer::Col;
use log::info;
use plotters::prelude::*;
use std::error::Error;

/// Pad a value range so degenerate (flat) data still renders.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(1e-6);
    (min - pad, max + pad)
}

/// Scatter of observed against predicted values with the identity line.
pub fn observed_vs_predicted(
    observed: &Col<f64>,
    predicted: &Col<f64>,
    path: &str,
    dims: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let (lo, hi) = padded_range(observed.iter().chain(predicted.iter()).copied());

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .set_all_label_area_size(50)
        .caption("observed vs predicted", ("sans-serif", 30).into_font())
        .build_cartesian_2d(lo..hi, lo..hi)?;
    chart.configure_mesh().x_desc("predicted").y_desc("observed").draw()?;

    chart.draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], &BLACK))?;
    chart.draw_series(
        (0..observed.nrows())
            .map(|i| Circle::new((predicted[i], observed[i]), 3, BLUE.filled())),
    )?;

    root.present()?;
    info!("wrote observed-vs-predicted chart to {}", path);
    Ok(())
}

/// Scatter of residuals against fitted values with a zero reference line.
pub fn residuals_vs_fitted(
    fitted: &Col<f64>,
    residuals: &Col<f64>,
    path: &str,
    dims: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let (x_lo, x_hi) = padded_range(fitted.iter().copied());
    let (y_lo, y_hi) = padded_range(residuals.iter().copied());
    let y_lo = y_lo.min(-1e-6);
    let y_hi = y_hi.max(1e-6);

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .set_all_label_area_size(50)
        .caption("residuals vs fitted", ("sans-serif", 30).into_font())
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart.configure_mesh().x_desc("fitted").y_desc("residual").draw()?;

    chart.draw_series(LineSeries::new(vec![(x_lo, 0.0), (x_hi, 0.0)], &BLACK))?;
    chart.draw_series(
        (0..fitted.nrows()).map(|i| Circle::new((fitted[i], residuals[i]), 3, RED.filled())),
    )?;

    root.present()?;
    info!("wrote residuals-vs-fitted chart to {}", path);
    Ok(())
}

/// Criterion score per search step from a selection trace.
pub fn selection_trace_chart(
    trace: &SelectionTrace,
    path: &str,
    dims: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let scores = trace.scores();
    let (y_lo, y_hi) = padded_range(scores.iter().copied());
    let x_hi = scores.len().saturating_sub(1).max(1) as f64;

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .set_all_label_area_size(50)
        .caption("selection trace", ("sans-serif", 30).into_font())
        .build_cartesian_2d(0.0..x_hi, y_lo..y_hi)?;
    chart.configure_mesh().x_desc("step").y_desc("score").draw()?;

    let series: Vec<(f64, f64)> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_finite())
        .map(|(i, &s)| (i as f64, s))
        .collect();
    chart.draw_series(LineSeries::new(series.clone(), &BLUE))?;
    chart.draw_series(series.into_iter().map(|p| Circle::new(p, 3, BLUE.filled())))?;

    root.present()?;
    info!("wrote selection-trace chart to {}", path);
    Ok(())
}
