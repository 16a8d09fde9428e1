use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::Column;
use crate::report::{LabeledRows, Report};

const PLOT_HEIGHT: f32 = 320.0;
const PANEL_HEIGHT: f32 = 260.0;

/// Name of the label column, e.g. "Income Quartile".
pub fn group_name(report: &Report) -> String {
    let prefix = match report.settings.key {
        Column::MedianFamilyIncome => "Income",
        Column::GiniIndex => "Gini",
        Column::VacantHousing => "Vacancy",
        Column::PercentUnemployed => "Unemployment",
    };
    let noun = if report.settings.quantiles == 4 {
        "Quartile"
    } else {
        "Quantile"
    };
    format!("{prefix} {noun}")
}

// ---------------------------------------------------------------------------
// Histogram with density curve
// ---------------------------------------------------------------------------

pub fn key_histogram(ui: &mut Ui, report: &Report) {
    let key = report.settings.key;

    let bars: Vec<Bar> = report
        .histogram
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.density)
                .width(b.width())
                .name(format!("{} counties", b.count))
        })
        .collect();
    let chart = BarChart::new(bars)
        .color(Color32::from_rgb(0x4c, 0x72, 0xb0))
        .name(key.display_name());
    let density = Line::new(PlotPoints::from(report.density.clone()))
        .color(Color32::from_rgb(0x2a, 0x3f, 0x6b))
        .width(2.0)
        .name("density");

    Plot::new("key_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label(key.display_name())
        .y_axis_label("Density")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.line(density);
        });
}

// ---------------------------------------------------------------------------
// Scatter of the key against unemployment, coloured by label
// ---------------------------------------------------------------------------

pub fn quartile_scatter(ui: &mut Ui, report: &Report, labeled: &LabeledRows, colors: &ColorMap) {
    let x = report.settings.key;
    let y = Column::PercentUnemployed;
    let group = group_name(report);

    Plot::new("quartile_scatter")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x.display_name())
        .y_axis_label(y.display_name())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for label in labeled.classification.label_range() {
                let points = Points::new(PlotPoints::from(labeled.points(label, x, y)))
                    .radius(2.5)
                    .color(colors.color_for(label))
                    .name(format!("{group} {label}"));
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Linear-model grid: one panel per label, two per row
// ---------------------------------------------------------------------------

pub fn lm_grid(ui: &mut Ui, report: &Report, labeled: &LabeledRows, colors: &ColorMap) {
    let (x, y) = (report.settings.x, report.settings.y);
    let group = group_name(report);
    let labels: Vec<_> = labeled.classification.label_range().collect();

    for pair in labels.chunks(2) {
        ui.columns(2, |cols| {
            for (col, &label) in cols.iter_mut().zip(pair) {
                col.label(format!("{group} = {label}"));

                let points = labeled.points(label, x, y);
                let color = colors.color_for(label);
                let fit_line = labeled.fits.get(&label).map(|fit| {
                    let (lo, hi) = points
                        .iter()
                        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                            (lo.min(p[0]), hi.max(p[0]))
                        });
                    Line::new(PlotPoints::from(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]))
                        .color(color)
                        .width(2.0)
                        .name(format!("fit (n = {}, R² = {:.2})", fit.n, fit.r_squared))
                });

                Plot::new(format!("lm_{label}"))
                    .height(PANEL_HEIGHT)
                    .x_axis_label(x.display_name())
                    .y_axis_label(y.display_name())
                    .allow_scroll(false)
                    .show(col, |plot_ui| {
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .radius(2.0)
                                .color(color.gamma_multiply(0.6)),
                        );
                        if let Some(line) = fit_line {
                            plot_ui.line(line);
                        }
                    });
            }
        });
        ui.add_space(8.0);
    }
}
