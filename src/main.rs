// Entry point and interactive menu flow.
//
// - Option [1] prints the overview ranking and exports it with a JSON
//   summary.
// - Option [2] runs a detailed (region, year) query via the selector
//   parsers.
// - Option [3] renders the emissions chart for selected regions.
// - Option [0] exits; it is the only way out of the loop.
//
// The pipeline (load, clean, aggregate, join) runs on the first option that
// needs it and is cache-gated, so a warm cache makes startup instant.
mod cache;
mod combine;
mod config;
mod emissions;
mod output;
mod pipeline;
mod plot;
mod population;
mod reports;
mod select;
mod sheet;
mod types;
mod util;

use config::PipelineConfig;
use std::io::{self, Write};
use types::CombinedTable;

/// Read one line of input after printing `label`. Returns the trimmed text.
fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Prompt with a default value; empty input keeps the default.
fn prompt_default(label: &str, default: &str) -> String {
    let entered = prompt(&format!("{} [{}]: ", label, default));
    if entered.is_empty() {
        default.to_string()
    } else {
        entered
    }
}

/// Ask for the spreadsheet locations once, up front.
fn build_config() -> PipelineConfig {
    let defaults = PipelineConfig::default();
    let population_path = prompt_default(
        "Population spreadsheet",
        &defaults.population_path.to_string_lossy(),
    );
    let emissions_path = prompt_default(
        "Emissions spreadsheet",
        &defaults.emissions_path.to_string_lossy(),
    );
    let emissions_sheet = prompt_default("Emissions sheet name", &defaults.emissions_sheet);
    println!();
    PipelineConfig::new(population_path, emissions_path, &emissions_sheet, ".".to_string())
}

/// Run the pipeline on first use and keep the combined table for the rest of
/// the session.
fn ensure_loaded<'a>(
    config: &PipelineConfig,
    slot: &'a mut Option<CombinedTable>,
) -> Option<&'a CombinedTable> {
    if slot.is_none() {
        match pipeline::build(config) {
            Ok(table) => {
                println!(
                    "Note: combined table ready ({} regions, {} years).\n",
                    util::format_int(table.rows.len() as i64),
                    util::format_int(table.years.len() as i64)
                );
                *slot = Some(table);
            }
            Err(e) => {
                eprintln!("Failed to build the pipeline: {}\n", e);
                return None;
            }
        }
    }
    slot.as_ref()
}

fn handle_overview(config: &PipelineConfig, table: &CombinedTable) {
    let rows = reports::overview(table);
    println!("Overview: Emissions Ranking by Region\n");
    output::preview_table_rows(&rows, rows.len());

    let report_path = config.artifact_path("overview_report.csv");
    if let Err(e) = output::write_csv(&report_path, &rows) {
        eprintln!("Write error: {}", e);
    } else {
        println!("(Full table exported to {})", report_path.display());
    }
    let summary = reports::summary(table);
    let summary_path = config.artifact_path("summary.json");
    if let Err(e) = output::write_json(&summary_path, &summary) {
        eprintln!("Write error: {}", e);
    } else {
        println!("(Summary stats exported to {})\n", summary_path.display());
    }
}

/// Print the numbered region list the index selector resolves against.
fn print_region_menu(table: &CombinedTable) {
    println!("Regions:");
    for (idx, region) in table.region_names().iter().enumerate() {
        println!("  [{}] {}", idx + 1, region);
    }
}

fn handle_detail(config: &PipelineConfig, table: &CombinedTable) {
    print_region_menu(table);
    let region_input = prompt("Regions (e.g. 1,3,5; empty for all): ");
    let region_indices = select::parse_index_selection(&region_input, table.rows.len());

    println!("Available years: {}", table.years.join(", "));
    let year_input = prompt("Years (e.g. 2010:2015 or 2010,2012; empty for all): ");
    let years = select::parse_year_selection(&year_input, &table.years);

    let rows = reports::detail(table, &region_indices, &years);
    if rows.is_empty() {
        println!("No data for this selection.\n");
        return;
    }
    println!();
    output::preview_table_rows(&rows, 30);
    let report_path = config.artifact_path("detail_report.csv");
    if let Err(e) = output::write_csv(&report_path, &rows) {
        eprintln!("Write error: {}", e);
    } else {
        println!("(Full table exported to {})\n", report_path.display());
    }
}

fn handle_plot(config: &PipelineConfig, table: &CombinedTable) {
    print_region_menu(table);
    let region_input = prompt("Regions to plot (e.g. 1,3,5; empty for all): ");
    let region_indices = select::parse_index_selection(&region_input, table.rows.len());

    let projection = reports::plot_projection(table, &region_indices);
    if projection.points.is_empty() {
        println!("No data for this selection.\n");
        return;
    }
    let chart_path = config.artifact_path("emissions_chart.png");
    match plot::render(&projection, &chart_path) {
        Ok(()) => {
            println!(
                "Chart written to {} (mean of plotted values: {}).\n",
                chart_path.display(),
                util::format_number(projection.mean, 2)
            );
        }
        Err(e) => eprintln!("Plot error: {}\n", e),
    }
}

fn main() {
    let config = build_config();
    let mut combined: Option<CombinedTable> = None;
    loop {
        println!("[1] Overview report");
        println!("[2] Detailed query");
        println!("[3] Plot emissions");
        println!("[0] Exit\n");
        let choice = prompt("Enter choice: ");
        match choice.as_str() {
            "1" => {
                let Some(table) = ensure_loaded(&config, &mut combined) else {
                    continue;
                };
                handle_overview(&config, table);
            }
            "2" => {
                let Some(table) = ensure_loaded(&config, &mut combined) else {
                    continue;
                };
                handle_detail(&config, table);
            }
            "3" => {
                let Some(table) = ensure_loaded(&config, &mut combined) else {
                    continue;
                };
                handle_plot(&config, table);
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 0, 1, 2 or 3.\n");
            }
        }
    }
}
