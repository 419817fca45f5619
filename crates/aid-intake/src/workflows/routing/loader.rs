use super::RuleTableError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

pub(crate) type Sheet = HashMap<String, String>;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub(crate) fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
}

/// Reads every worksheet; the first row of each is a header.
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<(String, Sheet)>, RuleTableError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| RuleTableError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(workbook
        .worksheets()
        .into_iter()
        .map(|(name, range)| (name, sheet_from_range(&range)))
        .collect())
}

fn sheet_from_range(range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new();
    let Some((last_row, _)) = range.end() else {
        return sheet;
    };

    for row in 1..=last_row {
        let key = range.get_value((row, 0)).and_then(cell_text);
        let value = range.get_value((row, 1)).and_then(cell_text);
        if let (Some(key), Some(value)) = (key, value) {
            sheet.insert(key, value);
        }
    }

    sheet
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(text) => text.clone(),
        other => other.to_string(),
    };
    non_blank(&text)
}

/// Reads one sheet from CSV; the first record is a header.
pub(crate) fn read_csv_sheet<R: Read>(sheet: &str, reader: R) -> Result<Sheet, RuleTableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Sheet::new();

    for record in csv_reader.records() {
        let record = record.map_err(|source| RuleTableError::Csv {
            sheet: sheet.to_string(),
            source,
        })?;

        let key = record.get(0).and_then(non_blank);
        let value = record.get(1).and_then(non_blank);
        if let (Some(key), Some(value)) = (key, value) {
            entries.insert(key, value);
        }
    }

    Ok(entries)
}

/// Reads each `*.csv` file in `dir` as a sheet named by its file stem.
pub(crate) fn read_csv_dir(dir: &Path) -> Result<Vec<(String, Sheet)>, RuleTableError> {
    let io_error = |source: std::io::Error| RuleTableError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_csv = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let file = std::fs::File::open(&path).map_err(|source| RuleTableError::Io {
            path: path.clone(),
            source,
        })?;
        sheets.push((name.to_string(), read_csv_sheet(name, file)?));
    }

    Ok(sheets)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
