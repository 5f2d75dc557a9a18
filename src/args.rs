use clap::Parser;

/// This is a chart planning program for a well-being statistics dashboard.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file containing the well-being dataset, in Excel (.xlsx) or CSV format.
    /// For more information about the expected columns, read the documentation.
    #[clap(short, long, value_parser)]
    pub data: String,

    /// (default from the file extension) The type of the input: 'xlsx' or 'csv'.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The display name of the selected economy, as it appears in the 'Reference area' column.
    #[clap(short, long, value_parser)]
    pub economy: Option<String>,

    /// The display name of the selected welfare domain ('Health', 'Education', ...).
    #[clap(long, value_parser)]
    pub domain: Option<String>,

    /// If passed as an argument, plans the international comparison charts instead of the
    /// time-series breakdown charts.
    #[clap(long, takes_value = false)]
    pub compare: bool,

    /// If passed as an argument, prints the available economies and domains and exits.
    #[clap(long, takes_value = false)]
    pub list_options: bool,

    /// (file path, 'stdout' or empty) If specified, the chart plans will be written in JSON
    /// format to the given location instead of the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing chart plans in JSON format. If provided, welldash
    /// will check that the produced output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
