use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::config::*;

/// Units that are a flavour of percentage all display the same way.
pub fn normalize_unit(full_unit: &str) -> String {
    if full_unit.to_lowercase().contains("percentage") {
        "Percentage".to_string()
    } else {
        full_unit.to_string()
    }
}

/// Greedy word wrap. Words are never broken: a word longer than `width`
/// gets a line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits a comparison chart title into at most three lines.
///
/// Short titles stay on one line. Longer ones break after the label; a long
/// description additionally breaks near its midpoint, at the closest word
/// boundary within ten characters of it.
pub fn split_comparison_title(label: &str, description: &str) -> Vec<String> {
    let combined = format!("{}: {}", label, description);
    if combined.chars().count() <= TITLE_SPLIT_THRESHOLD {
        return vec![combined];
    }
    let mut lines = vec![format!("{}:", label)];
    let desc: Vec<char> = description.chars().collect();
    if desc.len() > DESCRIPTION_SPLIT_THRESHOLD {
        let mid = desc.len() / 2;
        let lo = mid.saturating_sub(10);
        let hi = (mid + 10).min(desc.len());
        match (lo..hi).find(|&i| desc[i] == ' ') {
            Some(i) => {
                lines.push(desc[..i].iter().collect());
                lines.push(desc[i + 1..].iter().collect());
            }
            None => {
                lines.push(desc[..mid].iter().collect());
                lines.push(desc[mid..].iter().collect());
            }
        }
    } else {
        lines.push(description.to_string());
    }
    lines
}

fn make_series(name: &str, rows: &[&Observation], visible: bool) -> Series {
    let mut points: Vec<(i32, f64)> = rows.iter().map(|o| (o.year, o.value)).collect();
    points.sort_by_key(|p| p.0);
    let years: Vec<i32> = points.iter().map(|p| p.0).collect();
    let values: Vec<f64> = points.iter().map(|p| p.1).collect();
    let distinct_years: BTreeSet<i32> = years.iter().cloned().collect();
    let kind = if distinct_years.len() >= LINE_POINT_THRESHOLD {
        SeriesKind::Line
    } else {
        SeriesKind::Bar
    };
    Series {
        name: name.to_string(),
        years,
        values,
        kind,
        visible,
        highlighted: false,
    }
}

/// Builds the plan of one breakdown chart: the total series (always
/// visible) overlaid with one initially hidden series per breakdown
/// category. With `dim` set to None and an empty `breakdown`, this is the
/// "basic" chart over the total alone; with None and an empty `total`, the
/// fallback chart over the raw measure subset.
pub fn plan_breakdown_chart(
    measure: &Measure,
    unit: &str,
    dim: Option<BreakdownDim>,
    total: &[Observation],
    breakdown: &[Observation],
    charts_in_row: usize,
) -> ChartPlan {
    let mut series: Vec<Series> = Vec::new();

    if !total.is_empty() {
        let rows: Vec<&Observation> = total.iter().collect();
        series.push(make_series("Total", &rows, true));
    }

    if !breakdown.is_empty() {
        let mut groups: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
        for obs in breakdown.iter() {
            let key = match dim {
                Some(d) => d.value(obs).label.clone(),
                None => obs.measure.code.clone(),
            };
            groups.entry(key).or_default().push(obs);
        }
        // The fallback chart has no total to show, so its series must
        // start visible or the panel would render blank.
        let group_visible = total.is_empty() && dim.is_none();
        for (name, rows) in groups.iter() {
            series.push(make_series(name, rows, group_visible));
        }
    }

    let year_order: Vec<i32> = series
        .iter()
        .flat_map(|s| s.years.iter().cloned())
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect();

    let suffix = match dim {
        Some(d) => format!(" ({})", d.note()),
        None => String::new(),
    };
    let full_title = format!("{}: {}{}", measure.label, measure.description, suffix);
    let max_line_length = if charts_in_row <= 1 {
        80
    } else {
        (80 / charts_in_row).max(30)
    };
    let lines = wrap_words(&full_title, max_line_length);
    debug!(
        "plan_breakdown_chart: {:?}: {} series, {} title lines",
        measure.code,
        series.len(),
        lines.len()
    );

    // A crowded legend moves up so it does not collide with the x-axis
    // labels.
    let legend_y = if series.len() > 5 { -0.20 } else { -0.35 };
    let extra_lines = lines.len().saturating_sub(1) as u32;

    ChartPlan {
        title: Title {
            lines,
            subtitle: None,
        },
        x_title: "Year".to_string(),
        y_title: normalize_unit(unit),
        year_order,
        legend_y: Some(legend_y),
        reversed_y: false,
        series,
        height: 430 + 10 * extra_lines,
        top_margin: 70 + 10 * extra_lines,
    }
}

/// Builds the plan of one international comparison chart: one horizontal
/// bar per economy reporting at the resolved year, ordered by descending
/// value, with the selected economy highlighted in place.
pub fn plan_comparison_chart(
    slice: &[Observation],
    selected_economy: &str,
    label: &str,
    description: &str,
    year_info: &ComparableYearResult,
    unit: &str,
) -> ChartPlan {
    let year = match year_info.year {
        Some(y) => y,
        None => return no_comparison_plan(selected_economy),
    };

    // One bar per economy; the cube invariant makes the first row per
    // economy the only one at this year.
    let mut entries: Vec<(&str, f64)> = Vec::new();
    for obs in slice.iter().filter(|o| o.year == year) {
        if !entries.iter().any(|(name, _)| *name == obs.economy.as_str()) {
            entries.push((obs.economy.as_str(), obs.value));
        }
    }
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let series: Vec<Series> = entries
        .iter()
        .map(|(name, value)| Series {
            name: name.to_string(),
            years: vec![year],
            values: vec![*value],
            kind: SeriesKind::HorizontalBar,
            visible: true,
            highlighted: *name == selected_economy,
        })
        .collect();

    let lines = split_comparison_title(label, description);
    let subtitle = format!(
        "{} comparable data ({}) - Comparison with {} other economies",
        year_info.direction.label(),
        year,
        entries.len().saturating_sub(1)
    );
    // The subtitle counts as a title line for the margin computation.
    let title_lines = (lines.len() + 1) as u32;

    ChartPlan {
        title: Title {
            lines,
            subtitle: Some(subtitle),
        },
        x_title: normalize_unit(unit),
        y_title: String::new(),
        year_order: Vec::new(),
        legend_y: None,
        reversed_y: true,
        height: std::cmp::max(450, 100 + 20 * entries.len() as u32),
        top_margin: 60 + 13 * title_lines,
        series,
    }
}

// Callers gate on comparison_count, so a missing year only occurs on
// misuse; still answer with an explicit empty chart rather than panic.
fn no_comparison_plan(selected_economy: &str) -> ChartPlan {
    ChartPlan {
        title: Title {
            lines: vec![format!(
                "No comparable data available for {}",
                selected_economy
            )],
            subtitle: None,
        },
        x_title: String::new(),
        y_title: String::new(),
        year_order: Vec::new(),
        legend_y: None,
        reversed_y: false,
        series: Vec::new(),
        height: 450,
        top_margin: 60,
    }
}
