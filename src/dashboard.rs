use std::fs;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use wellbeing_charts::*;

use crate::args::Args;
use crate::dashboard::cache::{DatasetCache, DEFAULT_TTL_SECS};
use crate::dashboard::flags::flag_code;

pub mod cache;
pub mod flags;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening data source {path}"))]
    SourceUnavailable {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error opening data source {path}"))]
    SourceUnavailableCsv { source: csv::Error, path: String },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyWorkbook { path: String },
    #[snafu(display("Missing mandatory column {column}"))]
    MissingColumn { column: String },
    #[snafu(display("Cannot parse cell in column {column}, line {lineno}: {content:?}"))]
    InvalidCell {
        column: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error reading line of {path}"))]
    CsvLine { source: csv::Error, path: String },
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display(""))]
    WritingOutput { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

// The informational messages of the empty outcomes. These are part of the
// output contract, not errors.
pub const NO_SELECTION_PROMPT: &str =
    "Please select both an economy and a welfare domain to view data.";
pub const NO_DATA_MESSAGE: &str = "No data available for the selected economy and domain.";
pub const NO_COMPARABLE_MESSAGE: &str =
    "No comparable data available for international comparison.";

fn load_dataset(path: &str, input_type: &Option<String>) -> DashResult<Dataset> {
    let format = match input_type {
        Some(s) => s.clone(),
        None if path.ends_with(".csv") => "csv".to_string(),
        None => "xlsx".to_string(),
    };
    info!("Attempting to read data file {:?} as {}", path, format);
    let observations = match format.as_str() {
        "xlsx" => io_xlsx::read_observations(path)?,
        "csv" => io_csv::read_observations(path)?,
        x => whatever!("Input type not implemented {:?}", x),
    };
    Ok(Dataset::new(observations))
}

fn series_to_json(s: &Series) -> JSValue {
    let kind = match s.kind {
        SeriesKind::Line => "line",
        SeriesKind::Bar => "bar",
        SeriesKind::HorizontalBar => "hbar",
    };
    let color: JSValue = if s.highlighted {
        json!(SELECTED_BAR_COLOR)
    } else if s.kind == SeriesKind::HorizontalBar {
        json!(COMPARISON_BAR_COLOR)
    } else {
        JSValue::Null
    };
    json!({
        "name": s.name,
        "kind": kind,
        "years": s.years,
        "values": s.values,
        "visible": s.visible,
        "color": color,
    })
}

fn panel_to_json(panel: &Panel) -> JSValue {
    let plan = &panel.plan;
    json!({
        "widthPct": panel.width_pct,
        "title": plan.title.lines,
        "subtitle": plan.title.subtitle,
        "xAxis": { "title": plan.x_title, "categoryOrder": plan.year_order },
        "yAxis": { "title": plan.y_title, "reversed": plan.reversed_y },
        "legendY": plan.legend_y,
        "height": plan.height,
        "topMargin": plan.top_margin,
        "series": plan.series.iter().map(series_to_json).collect::<Vec<JSValue>>(),
    })
}

/// The echo of the user selection at the head of the output document.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
struct Selection {
    economy: String,
    flag: Option<&'static str>,
    domain: String,
    #[serde(rename = "internationalComparison")]
    international_comparison: bool,
}

fn view_to_json(view: &DashboardView, economy: &str, domain: &str, compare: bool) -> JSValue {
    let selection = Selection {
        economy: economy.to_string(),
        flag: flag_code(economy),
        domain: domain.to_string(),
        international_comparison: compare,
    };
    match view {
        DashboardView::Rows(rows) => {
            let rows_js: Vec<JSValue> = rows
                .iter()
                .map(|row| {
                    json!({
                        "panels": row.panels.iter().map(panel_to_json).collect::<Vec<JSValue>>()
                    })
                })
                .collect();
            json!({ "selection": selection, "rows": rows_js })
        }
        DashboardView::Empty(reason) => {
            let message = match reason {
                EmptyReason::NoDataForSelection => NO_DATA_MESSAGE,
                EmptyReason::NoComparableData => NO_COMPARABLE_MESSAGE,
            };
            json!({ "selection": selection, "rows": [], "message": message })
        }
    }
}

fn read_reference(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn print_options(dataset: &Dataset) {
    println!("Economies:");
    for economy in dataset.economies() {
        match flag_code(&economy) {
            Some(code) => println!("  {} [{}]", economy, code),
            None => println!("  {}", economy),
        }
    }
    println!("Domains:");
    for domain in dataset.domains() {
        println!("  {}", domain.name);
    }
}

pub fn run(args: &Args) -> DashResult<()> {
    let mut cache = DatasetCache::new(Duration::from_secs(DEFAULT_TTL_SECS));
    let dataset = cache.fetch(Instant::now(), || {
        load_dataset(&args.data, &args.input_type)
    })?;
    info!("Loaded {} observations", dataset.len());

    if args.list_options {
        print_options(&dataset);
        return Ok(());
    }

    let (economy, domain) = match (&args.economy, &args.domain) {
        (Some(e), Some(d)) => (e.clone(), d.clone()),
        _ => {
            println!("{}", NO_SELECTION_PROMPT);
            return Ok(());
        }
    };

    let view = if args.compare {
        build_comparison_view(&dataset, &economy, &domain)
    } else {
        build_breakdown_view(&dataset.economy_domain_rows(&economy, &domain))
    };

    let result_js = view_to_json(&view, &economy, &domain, args.compare);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match &args.out {
        Some(path) if path != "stdout" => {
            fs::write(path, &pretty_js).context(WritingOutputSnafu {})?;
        }
        _ => println!("{}", pretty_js),
    }

    // The reference plans, if provided for comparison
    if let Some(reference_p) = &args.reference {
        let reference = read_reference(reference_p)?;
        let pretty_js_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference string");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_ref(), "\n");
            whatever!("Difference detected between produced plans and reference plans")
        }
    }

    Ok(())
}
