// Column schema and row parsing shared by the xlsx and csv readers.

use log::debug;

use snafu::prelude::*;

use wellbeing_charts::{Breakdown, Domain, Measure, Observation};

use crate::dashboard::{DashResult, InvalidCellSnafu, MissingColumnSnafu};

/// The sentinel the source data uses for "all categories".
pub const TOTAL_CODE: &str = "_T";

pub const COL_ECONOMY: &str = "Reference area";
pub const COL_DOMAIN_KEY: &str = "DOMAIN";
pub const COL_DOMAIN: &str = "Domain";
pub const COL_MEASURE_CODE: &str = "MEASURE";
pub const COL_MEASURE: &str = "Measure";
pub const COL_NAME: &str = "Name";
pub const COL_UNIT: &str = "Unit of measure";
pub const COL_AGE_CODE: &str = "AGE";
pub const COL_AGE: &str = "Age";
pub const COL_SEX_CODE: &str = "SEX";
pub const COL_SEX: &str = "Sex";
pub const COL_EDUCATION_CODE: &str = "EDUCATION_LEV";
pub const COL_EDUCATION: &str = "Education level";
pub const COL_YEAR: &str = "TIME_PERIOD";
pub const COL_VALUE: &str = "OBS_VALUE";

/// Positions of the dataset columns in the header row. The code columns
/// are mandatory; the label columns are optional and fall back to the
/// codes.
pub struct ColumnSchema {
    economy: usize,
    domain_key: usize,
    domain: usize,
    measure_code: usize,
    measure: usize,
    name: Option<usize>,
    unit: usize,
    age_code: usize,
    age: Option<usize>,
    sex_code: usize,
    sex: Option<usize>,
    education_code: usize,
    education: Option<usize>,
    year: usize,
    value: usize,
}

impl ColumnSchema {
    pub fn from_headers(headers: &[String]) -> DashResult<ColumnSchema> {
        let find = |column: &str| -> Option<usize> { headers.iter().position(|h| h == column) };
        let require = |column: &str| -> DashResult<usize> {
            find(column).context(MissingColumnSnafu { column })
        };
        Ok(ColumnSchema {
            economy: require(COL_ECONOMY)?,
            domain_key: require(COL_DOMAIN_KEY)?,
            domain: require(COL_DOMAIN)?,
            measure_code: require(COL_MEASURE_CODE)?,
            measure: require(COL_MEASURE)?,
            name: find(COL_NAME),
            unit: require(COL_UNIT)?,
            age_code: require(COL_AGE_CODE)?,
            age: find(COL_AGE),
            sex_code: require(COL_SEX_CODE)?,
            sex: find(COL_SEX),
            education_code: require(COL_EDUCATION_CODE)?,
            education: find(COL_EDUCATION),
            year: require(COL_YEAR)?,
            value: require(COL_VALUE)?,
        })
    }

    pub fn value_cell<'a>(&self, cells: &'a [String]) -> &'a str {
        cell(cells, self.value)
    }
}

fn cell<'a>(cells: &'a [String], idx: usize) -> &'a str {
    cells.get(idx).map(|s| s.as_str()).unwrap_or("")
}

fn breakdown(code: &str, label: &str) -> Breakdown {
    if code == TOTAL_CODE || code.is_empty() {
        Breakdown::total()
    } else if label.is_empty() {
        Breakdown::coded(code, code)
    } else {
        Breakdown::coded(code, label)
    }
}

fn parse_int(schema_column: &str, content: &str, lineno: usize) -> DashResult<i32> {
    // Excel sources render integers as floats ("2015.0").
    match content.trim().parse::<i32>() {
        Ok(x) => Ok(x),
        Err(_) => match content.trim().parse::<f64>() {
            Ok(x) => Ok(x as i32),
            Err(_) => InvalidCellSnafu {
                column: schema_column,
                lineno,
                content,
            }
            .fail(),
        },
    }
}

fn parse_number(schema_column: &str, content: &str, lineno: usize) -> DashResult<f64> {
    content.trim().parse::<f64>().ok().context(InvalidCellSnafu {
        column: schema_column,
        lineno,
        content,
    })
}

/// Parses one data row. The caller is expected to skip rows with an empty
/// value cell before calling this.
pub fn observation_from_cells(
    schema: &ColumnSchema,
    cells: &[String],
    lineno: usize,
) -> DashResult<Observation> {
    let description = cell(cells, schema.measure).to_string();
    // The short display name falls back to the description when the Name
    // column is absent or blank.
    let label = match schema.name.map(|i| cell(cells, i)) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => description.clone(),
    };
    let obs = Observation {
        economy: cell(cells, schema.economy).to_string(),
        domain: Domain {
            key: parse_int(COL_DOMAIN_KEY, cell(cells, schema.domain_key), lineno)?,
            name: cell(cells, schema.domain).to_string(),
        },
        measure: Measure {
            code: cell(cells, schema.measure_code).to_string(),
            label,
            description,
        },
        unit: cell(cells, schema.unit).to_string(),
        age: breakdown(
            cell(cells, schema.age_code),
            schema.age.map(|i| cell(cells, i)).unwrap_or(""),
        ),
        sex: breakdown(
            cell(cells, schema.sex_code),
            schema.sex.map(|i| cell(cells, i)).unwrap_or(""),
        ),
        education: breakdown(
            cell(cells, schema.education_code),
            schema.education.map(|i| cell(cells, i)).unwrap_or(""),
        ),
        year: parse_int(COL_YEAR, cell(cells, schema.year), lineno)?,
        value: parse_number(COL_VALUE, schema.value_cell(cells), lineno)?,
    };
    debug!("observation_from_cells: line {}: {:?}", lineno, obs);
    Ok(obs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashError;

    fn headers() -> Vec<String> {
        [
            COL_ECONOMY,
            COL_DOMAIN_KEY,
            COL_DOMAIN,
            COL_MEASURE_CODE,
            COL_MEASURE,
            COL_NAME,
            COL_UNIT,
            COL_AGE_CODE,
            COL_AGE,
            COL_SEX_CODE,
            COL_SEX,
            COL_EDUCATION_CODE,
            COL_EDUCATION,
            COL_YEAR,
            COL_VALUE,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_a_full_row() {
        let schema = ColumnSchema::from_headers(&headers()).unwrap();
        let cells = row(&[
            "Hong Kong",
            "1",
            "Health",
            "LE",
            "Life expectancy at birth",
            "Life expectancy",
            "Years",
            "_T",
            "Total",
            "F",
            "Female",
            "_T",
            "Total",
            "2015.0",
            "87.3",
        ]);
        let obs = observation_from_cells(&schema, &cells, 2).unwrap();
        assert_eq!(obs.economy, "Hong Kong");
        assert_eq!(obs.domain.key, 1);
        assert_eq!(obs.measure.label, "Life expectancy");
        assert_eq!(obs.measure.description, "Life expectancy at birth");
        assert!(obs.age.is_total());
        assert_eq!(obs.sex, Breakdown::coded("F", "Female"));
        assert_eq!(obs.year, 2015);
        assert_eq!(obs.value, 87.3);
    }

    #[test]
    fn label_columns_fall_back_to_codes() {
        let short: Vec<String> = headers()
            .into_iter()
            .filter(|h| h != COL_NAME && h != COL_AGE && h != COL_SEX && h != COL_EDUCATION)
            .collect();
        let schema = ColumnSchema::from_headers(&short).unwrap();
        let cells = row(&[
            "Hong Kong",
            "1",
            "Health",
            "LE",
            "Life expectancy at birth",
            "Years",
            "Y15T24",
            "_T",
            "_T",
            "2015",
            "87.3",
        ]);
        let obs = observation_from_cells(&schema, &cells, 2).unwrap();
        assert_eq!(obs.measure.label, "Life expectancy at birth");
        assert_eq!(obs.age, Breakdown::coded("Y15T24", "Y15T24"));
    }

    #[test]
    fn missing_mandatory_column_fails_fast() {
        let short: Vec<String> = headers()
            .into_iter()
            .filter(|h| h != COL_VALUE)
            .collect();
        let res = ColumnSchema::from_headers(&short);
        match res {
            Err(DashError::MissingColumn { column, .. }) => assert_eq!(column, COL_VALUE),
            x => panic!("expected MissingColumn, got {:?}", x.map(|_| ())),
        }
    }

    #[test]
    fn bad_numbers_report_the_line() {
        let schema = ColumnSchema::from_headers(&headers()).unwrap();
        let mut cells = row(&[
            "Hong Kong",
            "1",
            "Health",
            "LE",
            "Life expectancy at birth",
            "",
            "Years",
            "_T",
            "",
            "_T",
            "",
            "_T",
            "",
            "2015",
            "eighty",
        ]);
        let res = observation_from_cells(&schema, &cells, 17);
        match res {
            Err(DashError::InvalidCell { lineno, .. }) => assert_eq!(lineno, 17),
            x => panic!("expected InvalidCell, got {:?}", x.map(|_| ())),
        }
        cells[13] = "later".to_string();
        assert!(observation_from_cells(&schema, &cells, 17).is_err());
    }
}
