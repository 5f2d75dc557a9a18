// Primitives for reading the dataset from Excel spreadsheets.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;

use snafu::prelude::*;

use wellbeing_charts::Observation;

use crate::dashboard::io_common::{observation_from_cells, ColumnSchema};
use crate::dashboard::{DashResult, EmptyWorkbookSnafu, SourceUnavailableSnafu};

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => format!("{}", f),
        DataType::Int(i) => format!("{}", i),
        DataType::Bool(b) => format!("{}", b),
        _ => String::new(),
    }
}

pub fn read_observations(path: &str) -> DashResult<Vec<Observation>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(SourceUnavailableSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyWorkbookSnafu { path })?
        .context(SourceUnavailableSnafu { path })?;

    let mut rows = wrange.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };
    debug!("header: {:?}", headers);
    let schema = ColumnSchema::from_headers(&headers)?;

    let mut res: Vec<Observation> = Vec::new();
    for (idx, row) in rows.enumerate() {
        // Header is line 1.
        let lineno = idx + 2;
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if schema.value_cell(&cells).trim().is_empty() {
            debug!("Skipping line {} with empty value", lineno);
            continue;
        }
        res.push(observation_from_cells(&schema, &cells, lineno)?);
    }
    Ok(res)
}
