/*!

This is the long-form manual for `wellbeing_charts` and `welldash`.

## Input data

The dashboard consumes one flat table of indicator observations, either as
an Excel spreadsheet (.xlsx, first sheet) or as a CSV file. The first row
carries the column headers. The following columns are mandatory:

| Column           | Content                                              |
|------------------|------------------------------------------------------|
| `Reference area` | Economy display name ("Hong Kong", "Norway", ...)    |
| `DOMAIN`         | Numeric sort key of the welfare domain               |
| `Domain`         | Domain display name ("Health", "Education", ...)     |
| `MEASURE`        | Measure code ("LE", "EMP", ...)                      |
| `Measure`        | Measure description text                             |
| `Unit of measure`| Display unit; any percentage flavour displays as "Percentage" |
| `AGE`            | Age breakdown code, `_T` for all ages                |
| `SEX`            | Sex breakdown code, `_T` for both sexes              |
| `EDUCATION_LEV`  | Education breakdown code, `_T` for all levels        |
| `TIME_PERIOD`    | Year of the observation                              |
| `OBS_VALUE`      | The observed value; rows with an empty value are skipped |

The optional `Name` column gives the short bold display name of a measure
(falling back to `Measure` when absent), and the optional `Age`, `Sex` and
`Education level` columns give the legend labels of the breakdown codes
(falling back to the raw codes).

A missing mandatory column aborts the load with an explicit error naming
the column. Cells that cannot be parsed as numbers where a number is
expected abort with the offending line number.

## Running the dashboard

List the available selections:

```bash
welldash -d wellbeing.xlsx --list-options
```

Plan the time-series charts of one (economy, domain) selection:

```bash
welldash -d wellbeing.xlsx -e 'Hong Kong' --domain Health
```

Plan the international comparison charts instead:

```bash
welldash -d wellbeing.xlsx -e 'Hong Kong' --domain Health --compare
```

The output is a JSON document describing each chart: title lines, series
with their visibility, axis configuration and pixel sizing. A renderer
(plotly or any other charting front end) can consume it directly. Use
`--out` to write it to a file instead of stdout, and `--reference` to
check it against a previously stored output.

## Chart conventions

- A series renders as a connected line when it spans at least 4 distinct
  years, and as discrete bars otherwise.
- In a breakdown chart, the `Total` series starts visible and each
  demographic category starts hidden; categories are enabled through the
  legend.
- An international comparison chart shows one horizontal bar per economy
  reporting at the resolved year, sorted by descending value, with the
  selected economy's bar in a darker fill. A chart is suppressed when
  fewer than two economies report.
- Measures whose name contains "Life expectancy" compare males and
  females in separate charts instead of the combined total.

*/
