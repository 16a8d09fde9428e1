use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use super::plot;
use crate::analysis::describe::Summary;
use crate::data::model::Column;
use crate::state::AppState;

const ACS_URL: &str = "https://www.census.gov/data/developers/data-sets/acs-5year.html";
const CENSUSDATA_URL: &str = "https://pypi.org/project/CensusData/";
const INSTALL_CENSUSDATA: &str = "pip install CensusData";

// ---------------------------------------------------------------------------
// Central panel – the exploration page, top to bottom
// ---------------------------------------------------------------------------

/// Render the page in the central panel.
pub fn exploration_page(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a census extract (File → Open…) or set CENSUS_DATABASE_URL");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            introduction(ui);

            let key = report.settings.key;
            ui.heading(format!("Descriptive Statistics for {key}"));
            ui.label(format!("{} counties in this snapshot.", report.rows));
            match &report.summary {
                Some(summary) => summary_table(ui, summary),
                None => {
                    ui.label("No values to describe.");
                }
            }
            ui.add_space(12.0);

            ui.heading(format!("Distribution of {key}"));
            ui.label(format!("County level {} distribution", key.display_name().to_lowercase()));
            plot::key_histogram(ui, report);
            ui.add_space(12.0);

            let group = plot::group_name(report);
            match &report.labeled {
                Ok(labeled) => {
                    ui.heading(format!(
                        "{key} by {}, coloured by {group}",
                        Column::PercentUnemployed
                    ));
                    plot::quartile_scatter(ui, report, labeled, &state.color_map);
                    ui.add_space(12.0);

                    ui.heading(format!("Linear model analysis by {group}"));
                    ui.label(format!(
                        "{} against {}; pick the axes in the side panel.",
                        report.settings.y, report.settings.x
                    ));
                    plot::lm_grid(ui, report, labeled, &state.color_map);
                }
                Err(e) => {
                    ui.heading(group);
                    ui.label(RichText::new(format!("Cannot derive {key} groups: {e}")).color(Color32::RED));
                    ui.label("Choose the merge or drop policy in the side panel to continue.");
                }
            }
        });
}

fn introduction(ui: &mut Ui) {
    ui.heading(RichText::new("Census Data Exploration").size(26.0));
    ui.label("Explore socially important metrics at the county level.");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("This exploration uses data from the American Community Survey 5-year data released in 2017.");
        ui.hyperlink_to("About the ACS 5-year survey", ACS_URL);
    });
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("The data was collected with Julien Leider's");
        ui.hyperlink_to("CensusData", CENSUSDATA_URL);
        ui.label("package, installed with:");
    });
    ui.code(INSTALL_CENSUSDATA);
    ui.add_space(8.0);

    ui.heading("County Level Summaries");
    ui.label(
        "Variables: Gini Index (income inequality index), Vacant Housing, \
         Percent Unemployed and Median Family Income.",
    );
    ui.add_space(8.0);
}

fn summary_table(ui: &mut Ui, summary: &Summary) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(TableColumn::exact(80.0))
        .column(TableColumn::exact(140.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("statistic");
            });
            header.col(|ui| {
                ui.strong("value");
            });
        })
        .body(|mut body| {
            for (name, value) in summary.rows() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(name);
                    });
                    row.col(|ui| {
                        ui.monospace(format!("{value:.0}"));
                    });
                });
            }
        });
}
