use std::path::Path;

use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::models::{Dataset, Row};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Loads a gradebook from a spreadsheet (first sheet) or from delimited text.
pub fn load_dataset(path: &Path, delimiter: u8) -> anyhow::Result<Dataset> {
    let table = if is_workbook(path) {
        read_workbook(path)?
    } else {
        read_delimited(path, delimiter)?
    };

    let dataset = Dataset::from_rows(table)?;
    info!(
        path = %path.display(),
        columns = dataset.header.cells.len(),
        rows = dataset.rows.len(),
        "loaded gradebook"
    );
    Ok(dataset)
}

fn read_delimited(path: &Path, delimiter: u8) -> anyhow::Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut table = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("failed to read row {} of {}", index + 1, path.display()))?;
        table.push(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

fn read_workbook(path: &Path) -> anyhow::Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let sheet = first_sheet(&workbook.sheet_names())?;
    debug!(path = %path.display(), sheet = %sheet, "reading first sheet");

    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("failed to read sheet {sheet} of {}", path.display()))?;
    Ok(range_to_table(&range))
}

pub fn first_sheet(names: &[String]) -> anyhow::Result<String> {
    match names.first() {
        Some(name) => Ok(name.clone()),
        None => bail!("no sheet found in workbook"),
    }
}

/// Converts a sheet range into text rows anchored at cell A1.
///
/// Trailing empty cells are dropped so rows stay ragged like the sheet itself.
pub fn range_to_table(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };

    let mut table: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row: Vec<String> = vec![String::new(); first_col as usize];
        row.extend(cells.iter().map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string(),
        }));
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }
        table.push(row);
    }
    table
}

impl Dataset {
    /// Splits a raw table into its header and data rows, numbering rows from 1.
    pub fn from_rows(table: Vec<Vec<String>>) -> anyhow::Result<Self> {
        if table.is_empty() {
            bail!("no rows found: the table is empty");
        }
        if table.len() < 2 {
            bail!("not enough rows: the table has a header but no data");
        }

        let mut rows = table
            .into_iter()
            .enumerate()
            .map(|(index, cells)| Row::new(index + 1, cells));
        let header = rows.next().context("missing header row")?;

        Ok(Dataset {
            header,
            rows: rows.collect(),
        })
    }
}
