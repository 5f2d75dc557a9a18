// ********* Input data structures ***********

/// One value of a demographic breakdown dimension (age, sex or education).
///
/// The source data marks "all categories" with the `_T` sentinel code. The
/// sentinel is resolved at the input boundary so that the selection logic
/// never compares magic strings.
#[derive(Eq, PartialEq, Debug, Clone, Hash, PartialOrd, Ord)]
pub enum BreakdownCode {
    /// All categories combined.
    Total,
    /// A specific category, identified by its code ("M", "Y15T24", ...).
    Coded(String),
}

impl BreakdownCode {
    pub fn is_total(&self) -> bool {
        *self == BreakdownCode::Total
    }
}

/// A breakdown code together with its display label ("Male", "25-64", ...).
/// The label is what appears in chart legends.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Breakdown {
    pub code: BreakdownCode,
    pub label: String,
}

impl Breakdown {
    pub fn total() -> Breakdown {
        Breakdown {
            code: BreakdownCode::Total,
            label: "Total".to_string(),
        }
    }

    pub fn coded(code: &str, label: &str) -> Breakdown {
        Breakdown {
            code: BreakdownCode::Coded(code.to_string()),
            label: label.to_string(),
        }
    }

    pub fn is_total(&self) -> bool {
        self.code.is_total()
    }
}

/// The three breakdown dimensions of the dataset cube.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum BreakdownDim {
    Sex,
    Age,
    Education,
}

impl BreakdownDim {
    pub fn all() -> [BreakdownDim; 3] {
        [BreakdownDim::Sex, BreakdownDim::Age, BreakdownDim::Education]
    }

    /// The suffix appended to chart titles, e.g. "Employment rate (by Sex)".
    pub fn note(&self) -> &'static str {
        match self {
            BreakdownDim::Sex => "by Sex",
            BreakdownDim::Age => "by Age",
            BreakdownDim::Education => "by Education",
        }
    }

    pub fn value<'a>(&self, obs: &'a Observation) -> &'a Breakdown {
        match self {
            BreakdownDim::Sex => &obs.sex,
            BreakdownDim::Age => &obs.age,
            BreakdownDim::Education => &obs.education,
        }
    }
}

/// A top-level welfare category ("Health", "Education", ...). The numeric
/// key controls the ordering in the selection control.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Domain {
    pub key: i32,
    pub name: String,
}

/// A specific indicator within a domain.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Measure {
    pub code: String,
    /// The short display name, rendered bold in chart titles.
    pub label: String,
    /// The longer human description of the indicator.
    pub description: String,
}

/// One row of the dataset. For a fixed (economy, measure) there is at most
/// one observation per (age, sex, education, year) combination.
#[derive(PartialEq, Debug, Clone)]
pub struct Observation {
    pub economy: String,
    pub domain: Domain,
    pub measure: Measure,
    pub unit: String,
    pub age: Breakdown,
    pub sex: Breakdown,
    pub education: Breakdown,
    pub year: i32,
    pub value: f64,
}

// ******** Derived data structures *********

/// The breakdown partitions of one measure for one (economy, domain)
/// selection. Derived fresh per request, never cached.
///
/// The partitions are mutually exclusive: a row belongs to a dimension
/// partition only when that dimension is coded and the other two are total,
/// so no row is counted twice across `total` and the three partitions.
#[derive(PartialEq, Debug, Clone)]
pub struct BreakdownSet {
    pub measure: Measure,
    pub unit: String,
    /// Rows where all three breakdown dimensions are total.
    pub total: Vec<Observation>,
    pub by_sex: Option<Vec<Observation>>,
    pub by_age: Option<Vec<Observation>>,
    pub by_education: Option<Vec<Observation>>,
    /// The full measure subset, used for the fallback chart when the
    /// measure reports neither a total nor any clean breakdown.
    pub basic: Option<Vec<Observation>>,
}

impl BreakdownSet {
    /// Number of available breakdown dimensions.
    pub fn breakdown_count(&self) -> usize {
        [&self.by_sex, &self.by_age, &self.by_education]
            .iter()
            .filter(|p| p.is_some())
            .count()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Direction {
    Earliest,
    Latest,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Earliest => "Earliest",
            Direction::Latest => "Latest",
        }
    }
}

/// Outcome of the comparable-year search for one slice.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ComparableYearResult {
    /// None when the selected economy has no data at all in the slice.
    pub year: Option<i32>,
    /// Distinct economies reporting at `year`. A chart is only produced
    /// when this reaches [MIN_COMPARISON_ECONOMIES].
    pub comparison_count: usize,
    pub direction: Direction,
}

// ******** Chart plan (the output contract to the renderer) *********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SeriesKind {
    /// Connected line with markers.
    Line,
    /// Discrete vertical bars.
    Bar,
    /// One horizontal bar per economy (comparison mode). The series name
    /// is the category on the y axis and `values` holds the single value.
    HorizontalBar,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Series {
    pub name: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
    pub kind: SeriesKind,
    /// Initially visible. Hidden series can only be enabled through the
    /// legend.
    pub visible: bool,
    /// The selected economy's bar in comparison mode, drawn with a
    /// distinct fill color but not repositioned.
    pub highlighted: bool,
}

/// A chart title, pre-wrapped into display lines. The first line starts
/// with the measure label, which the renderer draws bold.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Title {
    pub lines: Vec<String>,
    /// The smaller-font comparison context line, comparison mode only.
    pub subtitle: Option<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartPlan {
    pub title: Title,
    pub x_title: String,
    pub y_title: String,
    /// Category ordering of the time axis, ascending. Empty in comparison
    /// mode where the y axis carries economies instead.
    pub year_order: Vec<i32>,
    /// Vertical offset of the horizontal legend; None hides the legend.
    pub legend_y: Option<f64>,
    /// Highest value at the top (comparison mode).
    pub reversed_y: bool,
    pub series: Vec<Series>,
    /// Target pixel height.
    pub height: u32,
    pub top_margin: u32,
}

/// One chart within a row, with its width as a percentage of the row.
#[derive(PartialEq, Debug, Clone)]
pub struct Panel {
    pub plan: ChartPlan,
    pub width_pct: f64,
}

/// The charts of one measure, laid out side by side.
#[derive(PartialEq, Debug, Clone)]
pub struct MeasureRow {
    pub panels: Vec<Panel>,
}

/// The outcome of one user interaction: either chart rows, or an explicit
/// empty-result marker that the UI renders as a descriptive message.
#[derive(PartialEq, Debug, Clone)]
pub enum DashboardView {
    Rows(Vec<MeasureRow>),
    Empty(EmptyReason),
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum EmptyReason {
    /// The filtered selection has no rows.
    NoDataForSelection,
    /// Every comparison chart of the domain was suppressed for lack of a
    /// second reporting economy.
    NoComparableData,
}

// ********* Constants **********

/// A series needs at least this many distinct time periods to render as a
/// connected line; below that it renders as discrete bars.
pub const LINE_POINT_THRESHOLD: usize = 4;

/// Minimum number of distinct economies for a comparison chart.
pub const MIN_COMPARISON_ECONOMIES: usize = 2;

/// Combined titles longer than this are split at the label separator.
pub const TITLE_SPLIT_THRESHOLD: usize = 60;

/// Descriptions longer than this are further split near their midpoint.
pub const DESCRIPTION_SPLIT_THRESHOLD: usize = 50;

/// Measures whose label contains this run the international comparison
/// once per sex instead of once on the total.
pub const LIFE_EXPECTANCY_MARKER: &str = "Life expectancy";

/// Fill color of the selected economy's bar in comparison mode.
pub const SELECTED_BAR_COLOR: &str = "rgb(31, 119, 180)";

/// Fill color of the other economies' bars in comparison mode.
pub const COMPARISON_BAR_COLOR: &str = "rgb(158, 202, 225)";
