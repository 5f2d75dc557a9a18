// Primitives for reading the dataset from CSV files.

use std::io::Read;

use csv::ReaderBuilder;
use log::debug;

use snafu::prelude::*;

use wellbeing_charts::Observation;

use crate::dashboard::io_common::{observation_from_cells, ColumnSchema};
use crate::dashboard::{CsvLineSnafu, DashResult, SourceUnavailableCsvSnafu};

pub fn read_observations(path: &str) -> DashResult<Vec<Observation>> {
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(SourceUnavailableCsvSnafu { path })?;
    parse_observations(rdr, path)
}

fn parse_observations<R: Read>(mut rdr: csv::Reader<R>, path: &str) -> DashResult<Vec<Observation>> {
    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineSnafu { path })?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => Vec::new(),
    };
    debug!("header: {:?}", headers);
    let schema = ColumnSchema::from_headers(&headers)?;

    let mut res: Vec<Observation> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // Header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineSnafu { path })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if schema.value_cell(&cells).trim().is_empty() {
            debug!("Skipping line {} with empty value", lineno);
            continue;
        }
        res.push(observation_from_cells(&schema, &cells, lineno)?);
    }
    Ok(res)
}
