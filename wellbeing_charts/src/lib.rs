/*!
Chart planning core for a well-being statistics dashboard.

The library turns a flat table of [Observation] rows into ready-to-render
[ChartPlan] structures:

 - [select_breakdowns] partitions one (economy, domain) selection into the
   demographic breakdowns each measure actually reports;
 - [find_comparable_year] resolves the earliest or latest year for which an
   international comparison is possible;
 - [build_breakdown_view] and [build_comparison_view] assemble the full
   [DashboardView] for one user interaction.

The library is purely computational: it performs no IO and no rendering.
See the [manual] for the expected dataset columns and the companion CLI.
*/

mod builder;
mod config;
mod dataset;
pub mod manual;

pub use crate::builder::*;
pub use crate::config::*;
pub use crate::dataset::*;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

/// Partitions the rows of one (economy, domain) selection into one
/// [BreakdownSet] per measure, in ascending measure code order.
///
/// A breakdown dimension is available for a measure iff at least one row
/// has that dimension coded while the other two stay total. Rows coded on
/// several dimensions at once belong to no partition.
pub fn select_breakdowns(rows: &[Observation]) -> Vec<BreakdownSet> {
    let mut by_measure: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
    for obs in rows.iter() {
        by_measure
            .entry(obs.measure.code.clone())
            .or_default()
            .push(obs);
    }

    let mut res: Vec<BreakdownSet> = Vec::new();
    for (code, measure_rows) in by_measure.iter() {
        let first = match measure_rows.first() {
            Some(o) => *o,
            None => continue,
        };

        let total: Vec<Observation> = measure_rows
            .iter()
            .filter(|o| o.age.is_total() && o.sex.is_total() && o.education.is_total())
            .map(|o| (*o).clone())
            .collect();

        let partition = |dim: BreakdownDim| -> Option<Vec<Observation>> {
            let part: Vec<Observation> = measure_rows
                .iter()
                .filter(|o| {
                    !dim.value(o).is_total()
                        && BreakdownDim::all()
                            .iter()
                            .filter(|d| **d != dim)
                            .all(|d| d.value(o).is_total())
                })
                .map(|o| (*o).clone())
                .collect();
            if part.is_empty() {
                None
            } else {
                Some(part)
            }
        };

        let by_sex = partition(BreakdownDim::Sex);
        let by_age = partition(BreakdownDim::Age);
        let by_education = partition(BreakdownDim::Education);

        // Some measures report neither a clean total nor a clean
        // breakdown. Keep the raw subset so the dashboard still shows
        // something for them.
        let basic = if total.is_empty() && by_sex.is_none() && by_age.is_none() && by_education.is_none()
        {
            Some(measure_rows.iter().map(|o| (*o).clone()).collect())
        } else {
            None
        };

        let unit = match total.first() {
            Some(o) => o.unit.clone(),
            None => first.unit.clone(),
        };
        debug!(
            "select_breakdowns: measure {}: {} total rows, sex={} age={} edu={} basic={}",
            code,
            total.len(),
            by_sex.is_some(),
            by_age.is_some(),
            by_education.is_some(),
            basic.is_some()
        );

        res.push(BreakdownSet {
            measure: first.measure.clone(),
            unit,
            total,
            by_sex,
            by_age,
            by_education,
            basic,
        });
    }
    res
}

fn distinct_economies_at(slice: &[Observation], year: i32) -> usize {
    slice
        .iter()
        .filter(|o| o.year == year)
        .map(|o| o.economy.as_str())
        .collect::<BTreeSet<&str>>()
        .len()
}

/// Finds the earliest or latest year of `economy` in `slice` for which at
/// least one other economy also reports, scanning the economy's own years
/// in the requested direction. When no year qualifies, the boundary year
/// (the economy's first year in scan order) is returned with its actual
/// economy count, and the caller decides whether to suppress the chart.
///
/// The result only depends on the inputs: calling this twice returns the
/// same answer.
pub fn find_comparable_year(
    slice: &[Observation],
    economy: &str,
    direction: Direction,
) -> ComparableYearResult {
    let mut years: Vec<i32> = slice
        .iter()
        .filter(|o| o.economy == economy)
        .map(|o| o.year)
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect();
    if direction == Direction::Latest {
        years.reverse();
    }
    if years.is_empty() {
        return ComparableYearResult {
            year: None,
            comparison_count: 0,
            direction,
        };
    }
    for &year in years.iter() {
        let count = distinct_economies_at(slice, year);
        if count >= MIN_COMPARISON_ECONOMIES {
            return ComparableYearResult {
                year: Some(year),
                comparison_count: count,
                direction,
            };
        }
    }
    let boundary = years[0];
    ComparableYearResult {
        year: Some(boundary),
        comparison_count: distinct_economies_at(slice, boundary),
        direction,
    }
}

/// Assembles the time-series view of one (economy, domain) selection: one
/// row of charts per measure, one chart per available breakdown dimension.
///
/// ```
/// use wellbeing_charts::{build_breakdown_view, DashboardView, EmptyReason};
///
/// let view = build_breakdown_view(&[]);
/// assert_eq!(view, DashboardView::Empty(EmptyReason::NoDataForSelection));
/// ```
pub fn build_breakdown_view(rows: &[Observation]) -> DashboardView {
    let mut measure_rows: Vec<MeasureRow> = Vec::new();
    for set in select_breakdowns(rows) {
        let charts_in_row = set.breakdown_count().max(1);
        let mut plans: Vec<ChartPlan> = Vec::new();
        for (dim, part) in [
            (BreakdownDim::Sex, &set.by_sex),
            (BreakdownDim::Age, &set.by_age),
            (BreakdownDim::Education, &set.by_education),
        ] {
            if let Some(part) = part {
                plans.push(plan_breakdown_chart(
                    &set.measure,
                    &set.unit,
                    Some(dim),
                    &set.total,
                    part,
                    charts_in_row,
                ));
            }
        }
        if plans.is_empty() {
            if !set.total.is_empty() {
                plans.push(plan_breakdown_chart(
                    &set.measure,
                    &set.unit,
                    None,
                    &set.total,
                    &[],
                    1,
                ));
            } else if let Some(basic) = &set.basic {
                plans.push(plan_breakdown_chart(&set.measure, &set.unit, None, &[], basic, 1));
            }
        }
        if plans.is_empty() {
            continue;
        }
        let width_pct = 100.0 / plans.len() as f64;
        measure_rows.push(MeasureRow {
            panels: plans
                .into_iter()
                .map(|plan| Panel { plan, width_pct })
                .collect(),
        });
    }
    if measure_rows.is_empty() {
        DashboardView::Empty(EmptyReason::NoDataForSelection)
    } else {
        DashboardView::Rows(measure_rows)
    }
}

/// Builds the earliest/latest comparison panels over one cube slice, or
/// None when no chart of the pair reaches [MIN_COMPARISON_ECONOMIES].
fn comparison_row(
    slice: &[Observation],
    economy: &str,
    label: &str,
    description: &str,
) -> Option<MeasureRow> {
    if slice.is_empty() {
        return None;
    }
    let earliest = find_comparable_year(slice, economy, Direction::Earliest);
    let latest = find_comparable_year(slice, economy, Direction::Latest);
    if earliest.year.is_none() {
        return None;
    }

    let unit = slice[0].unit.clone();
    let mut panels: Vec<Panel> = Vec::new();
    if earliest.year == latest.year {
        // A single year serves both ends of the comparison: show only the
        // latest chart, wider.
        if latest.comparison_count >= MIN_COMPARISON_ECONOMIES {
            panels.push(Panel {
                plan: plan_comparison_chart(slice, economy, label, description, &latest, &unit),
                width_pct: 70.0,
            });
        }
    } else {
        for info in [&earliest, &latest] {
            if info.comparison_count >= MIN_COMPARISON_ECONOMIES {
                panels.push(Panel {
                    plan: plan_comparison_chart(slice, economy, label, description, info, &unit),
                    width_pct: 48.5,
                });
            }
        }
    }
    if panels.is_empty() {
        None
    } else {
        Some(MeasureRow { panels })
    }
}

/// Assembles the international comparison view for one economy across all
/// the measures of one domain. Life expectancy compares males and females
/// separately; every other measure compares on the all-total slice.
pub fn build_comparison_view(dataset: &Dataset, economy: &str, domain: &str) -> DashboardView {
    let mut measure_rows: Vec<MeasureRow> = Vec::new();
    for measure in dataset.measures_in_domain(domain) {
        if measure.label.contains(LIFE_EXPECTANCY_MARKER) {
            for (display, code) in [("Male", "M"), ("Female", "F")] {
                let slice = dataset.cube_slice(&CubeKey::sex_slice(&measure.code, code));
                if let Some(row) = comparison_row(&slice, economy, &measure.label, display) {
                    measure_rows.push(row);
                }
            }
        } else {
            let slice = dataset.cube_slice(&CubeKey::total(&measure.code));
            if let Some(row) =
                comparison_row(&slice, economy, &measure.label, &measure.description)
            {
                measure_rows.push(row);
            }
        }
    }
    if measure_rows.is_empty() {
        DashboardView::Empty(EmptyReason::NoComparableData)
    } else {
        DashboardView::Rows(measure_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(economy: &str, measure: &str, year: i32, value: f64) -> Observation {
        Observation {
            economy: economy.to_string(),
            domain: Domain {
                key: 1,
                name: "Health".to_string(),
            },
            measure: Measure {
                code: measure.to_string(),
                label: measure.to_string(),
                description: format!("Description of {}", measure),
            },
            unit: "Years".to_string(),
            age: Breakdown::total(),
            sex: Breakdown::total(),
            education: Breakdown::total(),
            year,
            value,
        }
    }

    fn with_sex(mut o: Observation, code: &str, label: &str) -> Observation {
        o.sex = Breakdown::coded(code, label);
        o
    }

    fn with_age(mut o: Observation, code: &str, label: &str) -> Observation {
        o.age = Breakdown::coded(code, label);
        o
    }

    // A measure with only total rows over three years renders as a single
    // visible bar chart.
    #[test]
    fn total_only_measure_makes_one_bar_chart() {
        let rows = vec![
            obs("Hong Kong", "LE", 2010, 82.0),
            obs("Hong Kong", "LE", 2014, 83.0),
            obs("Hong Kong", "LE", 2018, 84.0),
        ];
        let view = build_breakdown_view(&rows);
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].panels.len(), 1);
        let plan = &rows[0].panels[0].plan;
        assert_eq!(plan.series.len(), 1);
        assert_eq!(plan.series[0].name, "Total");
        assert_eq!(plan.series[0].kind, SeriesKind::Bar);
        assert!(plan.series[0].visible);
        assert_eq!(rows[0].panels[0].width_pct, 100.0);
    }

    // Five years of totals plus a sex breakdown: one chart with a visible
    // Total line and initially hidden Female/Male lines.
    #[test]
    fn sex_breakdown_makes_one_chart_with_hidden_categories() {
        let mut rows: Vec<Observation> = Vec::new();
        for year in 2015..2020 {
            rows.push(obs("Hong Kong", "EMP", year, 60.0));
            rows.push(with_sex(obs("Hong Kong", "EMP", year, 65.0), "M", "Male"));
            rows.push(with_sex(obs("Hong Kong", "EMP", year, 55.0), "F", "Female"));
        }
        let view = build_breakdown_view(&rows);
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].panels.len(), 1);
        let plan = &rows[0].panels[0].plan;
        // Categories sort by label, after the leading Total.
        let names: Vec<&str> = plan.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Total", "Female", "Male"]);
        assert!(plan.series[0].visible);
        assert!(!plan.series[1].visible);
        assert!(!plan.series[2].visible);
        for s in plan.series.iter() {
            assert_eq!(s.kind, SeriesKind::Line);
        }
        assert!(plan.title.lines[0].contains("(by Sex)"));
    }

    #[test]
    fn two_breakdowns_make_two_half_width_charts() {
        let mut rows: Vec<Observation> = Vec::new();
        for year in 2015..2020 {
            rows.push(obs("Hong Kong", "EMP", year, 60.0));
            rows.push(with_sex(obs("Hong Kong", "EMP", year, 65.0), "M", "Male"));
            rows.push(with_age(
                obs("Hong Kong", "EMP", year, 40.0),
                "Y15T24",
                "15-24",
            ));
        }
        let view = build_breakdown_view(&rows);
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        assert_eq!(rows[0].panels.len(), 2);
        assert_eq!(rows[0].panels[0].width_pct, 50.0);
        // Sex first, then age.
        assert!(rows[0].panels[0].plan.title.lines[0].contains("by Sex"));
        assert!(rows[0].panels[1].plan.title.lines[0].contains("by Age"));
    }

    // A row coded on two dimensions at once belongs to no partition.
    #[test]
    fn partitions_are_disjoint() {
        let mut rows: Vec<Observation> = Vec::new();
        rows.push(obs("Hong Kong", "EMP", 2019, 60.0));
        rows.push(with_sex(obs("Hong Kong", "EMP", 2019, 65.0), "M", "Male"));
        rows.push(with_age(
            with_sex(obs("Hong Kong", "EMP", 2019, 70.0), "M", "Male"),
            "Y15T24",
            "15-24",
        ));
        let sets = select_breakdowns(&rows);
        assert_eq!(sets.len(), 1);
        let set = &sets[0];
        assert_eq!(set.total.len(), 1);
        assert_eq!(set.by_sex.as_ref().map(|p| p.len()), Some(1));
        assert_eq!(set.by_age, None);
        assert_eq!(set.by_education, None);
        assert_eq!(set.basic, None);
        let partitioned = set.total.len() + set.by_sex.as_ref().map(|p| p.len()).unwrap_or(0);
        assert!(partitioned < rows.len());
    }

    #[test]
    fn measure_without_total_or_breakdown_keeps_raw_subset() {
        let rows = vec![with_age(
            with_sex(obs("Hong Kong", "EMP", 2019, 70.0), "M", "Male"),
            "Y15T24",
            "15-24",
        )];
        let sets = select_breakdowns(&rows);
        assert_eq!(sets[0].basic.as_ref().map(|p| p.len()), Some(1));
        // The fallback chart over the raw subset starts visible.
        let view = build_breakdown_view(&rows);
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        assert!(rows[0].panels[0].plan.series.iter().all(|s| s.visible));
    }

    #[test]
    fn measures_come_out_in_code_order() {
        let rows = vec![
            obs("Hong Kong", "SUI", 2019, 10.0),
            obs("Hong Kong", "EMP", 2019, 60.0),
            obs("Hong Kong", "LE", 2019, 84.0),
        ];
        let sets = select_breakdowns(&rows);
        let codes: Vec<&str> = sets.iter().map(|s| s.measure.code.as_str()).collect();
        assert_eq!(codes, vec!["EMP", "LE", "SUI"]);
    }

    // Selected economy reports in 2010 (alone), 2015 (three economies) and
    // 2020 (two economies): earliest resolves to 2015, latest to 2020.
    #[test]
    fn resolver_skips_single_economy_years() {
        let slice = vec![
            obs("Hong Kong", "LE", 2010, 82.0),
            obs("Hong Kong", "LE", 2015, 83.0),
            obs("Norway", "LE", 2015, 82.5),
            obs("Chile", "LE", 2015, 80.0),
            obs("Hong Kong", "LE", 2020, 85.0),
            obs("Norway", "LE", 2020, 83.0),
        ];
        let earliest = find_comparable_year(&slice, "Hong Kong", Direction::Earliest);
        assert_eq!(earliest.year, Some(2015));
        assert_eq!(earliest.comparison_count, 3);
        let latest = find_comparable_year(&slice, "Hong Kong", Direction::Latest);
        assert_eq!(latest.year, Some(2020));
        assert_eq!(latest.comparison_count, 2);
    }

    #[test]
    fn resolver_falls_back_to_boundary_year() {
        let slice = vec![
            obs("Hong Kong", "LE", 2012, 82.0),
            obs("Hong Kong", "LE", 2016, 83.0),
        ];
        let earliest = find_comparable_year(&slice, "Hong Kong", Direction::Earliest);
        assert_eq!(earliest.year, Some(2012));
        assert_eq!(earliest.comparison_count, 1);
        let latest = find_comparable_year(&slice, "Hong Kong", Direction::Latest);
        assert_eq!(latest.year, Some(2016));
        assert_eq!(latest.comparison_count, 1);
    }

    #[test]
    fn resolver_handles_absent_economy() {
        let slice = vec![obs("Norway", "LE", 2015, 82.5)];
        let res = find_comparable_year(&slice, "Hong Kong", Direction::Latest);
        assert_eq!(res.year, None);
        assert_eq!(res.comparison_count, 0);
    }

    #[test]
    fn resolver_is_idempotent() {
        let slice = vec![
            obs("Hong Kong", "LE", 2015, 83.0),
            obs("Norway", "LE", 2015, 82.5),
        ];
        let a = find_comparable_year(&slice, "Hong Kong", Direction::Earliest);
        let b = find_comparable_year(&slice, "Hong Kong", Direction::Earliest);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        assert_eq!(
            build_breakdown_view(&[]),
            DashboardView::Empty(EmptyReason::NoDataForSelection)
        );
    }

    // The economy reports alone in its only year: no comparison chart, and
    // the whole view collapses to the no-comparable-data marker.
    #[test]
    fn lone_economy_yields_no_comparable_data() {
        let ds = Dataset::new(vec![obs("Hong Kong", "LE", 2012, 82.0)]);
        assert_eq!(
            build_comparison_view(&ds, "Hong Kong", "Health"),
            DashboardView::Empty(EmptyReason::NoComparableData)
        );
    }

    #[test]
    fn distinct_years_make_two_panels() {
        let ds = Dataset::new(vec![
            obs("Hong Kong", "EMP", 2015, 60.0),
            obs("Norway", "EMP", 2015, 70.0),
            obs("Chile", "EMP", 2015, 55.0),
            obs("Hong Kong", "EMP", 2020, 62.0),
            obs("Norway", "EMP", 2020, 71.0),
        ]);
        let view = build_comparison_view(&ds, "Hong Kong", "Health");
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].panels.len(), 2);
        assert_eq!(rows[0].panels[0].width_pct, 48.5);
        assert_eq!(rows[0].panels[1].width_pct, 48.5);
        assert_eq!(
            rows[0].panels[0].plan.title.subtitle.as_deref(),
            Some("Earliest comparable data (2015) - Comparison with 2 other economies")
        );
        assert_eq!(
            rows[0].panels[1].plan.title.subtitle.as_deref(),
            Some("Latest comparable data (2020) - Comparison with 1 other economies")
        );
    }

    #[test]
    fn identical_years_make_one_wide_panel() {
        let ds = Dataset::new(vec![
            obs("Hong Kong", "EMP", 2018, 60.0),
            obs("Norway", "EMP", 2018, 70.0),
        ]);
        let view = build_comparison_view(&ds, "Hong Kong", "Health");
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        assert_eq!(rows[0].panels.len(), 1);
        assert_eq!(rows[0].panels[0].width_pct, 70.0);
        // The single panel is the latest chart, not the earliest one.
        assert_eq!(
            rows[0].panels[0].plan.title.subtitle.as_deref(),
            Some("Latest comparable data (2018) - Comparison with 1 other economies")
        );
    }

    #[test]
    fn life_expectancy_compares_each_sex() {
        let mut rows: Vec<Observation> = Vec::new();
        for (economy, m, f) in [("Hong Kong", 81.0, 87.0), ("Norway", 80.0, 84.0)] {
            let mut o = obs(economy, "LE", 2019, m);
            o.measure.label = "Life expectancy at birth".to_string();
            rows.push(with_sex(o.clone(), "M", "Male"));
            o.value = f;
            rows.push(with_sex(o, "F", "Female"));
        }
        let ds = Dataset::new(rows);
        let view = build_comparison_view(&ds, "Hong Kong", "Health");
        let rows = match view {
            DashboardView::Rows(rows) => rows,
            _ => panic!("expected chart rows"),
        };
        // One row per sex, male first.
        assert_eq!(rows.len(), 2);
        assert!(rows[0].panels[0].plan.title.lines[0].contains("Male"));
        assert!(rows[1].panels[0].plan.title.lines[0].contains("Female"));
        // Within each chart the bars only carry that sex's values.
        let male_values: Vec<f64> = rows[0].panels[0]
            .plan
            .series
            .iter()
            .map(|s| s.values[0])
            .collect();
        assert_eq!(male_values, vec![81.0, 80.0]);
    }
}
