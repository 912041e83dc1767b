use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, warn};

use crate::models::InputError;
use crate::resolver::table::{Column, Table};

/// Read a spreadsheet into the column model. Excel extensions go straight
/// to calamine; everything else is parsed as CSV first, falling back to
/// the Excel reader for workbooks that were uploaded with a .csv name.
pub fn load_table(path: &Path) -> Result<Table, InputError> {
    if !path.exists() {
        return Err(InputError::UnreadableInput {
            path: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }

    let is_excel = path
        .extension()
        .map_or(false, |ext| ext == "xlsx" || ext == "xls" || ext == "xlsm");

    let loaded = if is_excel {
        load_excel(path)
    } else {
        load_csv(path).or_else(|csv_err| {
            debug!("CSV parse failed ({csv_err}), retrying as Excel workbook");
            load_excel(path)
        })
    };

    loaded.map_err(|reason| InputError::UnreadableInput {
        path: path.display().to_string(),
        reason,
    })
}

fn load_csv(path: &Path) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Column> = headers
        .into_iter()
        .map(|name| Column {
            name,
            values: Vec::new(),
        })
        .collect();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                // mirror of the "skip bad lines" posture: a mangled row
                // never sinks the whole file
                warn!("Skipping unparseable row: {e}");
                continue;
            }
        };
        for (i, column) in columns.iter_mut().enumerate() {
            let cell = record.get(i).map(str::trim).unwrap_or("");
            column
                .values
                .push((!cell.is_empty()).then(|| cell.to_string()));
        }
    }

    Ok(Table { columns })
}

fn load_excel(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no sheets".to_string())?
        .map_err(|e| e.to_string())?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    let mut columns: Vec<Column> = headers
        .into_iter()
        .map(|name| Column {
            name,
            values: Vec::new(),
        })
        .collect();

    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            let cell = row.get(i).map(cell_to_string).unwrap_or_default();
            let cell = cell.trim();
            column
                .values
                .push((!cell.is_empty()).then(|| cell.to_string()));
        }
    }

    Ok(Table { columns })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_plain_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Contact").unwrap();
        writeln!(file, "Acme Corp,a@x.com").unwrap();
        writeln!(file, "Globex,y.com").unwrap();
        file.flush().unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].name, "Contact");
        assert_eq!(
            table.columns[1].non_empty_values().collect::<Vec<_>>(),
            vec!["a@x.com", "y.com"]
        );
    }

    #[test]
    fn blank_cells_become_none() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Contact").unwrap();
        writeln!(file, "Acme Corp,").unwrap();
        writeln!(file, ",y.com").unwrap();
        file.flush().unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.columns[0].values, vec![Some("Acme Corp".into()), None]);
        assert_eq!(table.columns[1].values, vec![None, Some("y.com".into())]);
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Contact").unwrap();
        writeln!(file, "Acme Corp").unwrap();
        file.flush().unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.columns[1].values, vec![None]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_table(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, InputError::UnreadableInput { .. }));
    }

    #[test]
    fn binary_junk_is_an_input_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x01, 0x02, 0x03]).unwrap();
        file.flush().unwrap();

        assert!(load_table(file.path()).is_err());
    }
}
