//! Dataset loader for SQLite databases, CSV and Parquet files

use std::path::Path;

use polars::prelude::*;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use super::error::{AnalysisError, AnalysisResult};

/// A single SQLite cell, copied out of the row before the statement advances.
enum SqlCell {
    Null,
    Number(f64),
    Text(String),
}

/// Load the record table from `path`.
///
/// SQLite files (`.db`, `.sqlite`, `.sqlite3`) are queried with
/// `SELECT * FROM "<table>"`. CSV and Parquet files are read whole and
/// `table` is ignored.
pub fn load_records(path: &Path, table: &str) -> AnalysisResult<DataFrame> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match extension.as_str() {
        "db" | "sqlite" | "sqlite3" => load_sqlite_table(path, table)?,
        "csv" => LazyCsvReader::new(path).finish()?.collect()?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())?.collect()?,
        _ => return Err(AnalysisError::UnsupportedFormat(extension)),
    };

    debug!(rows = df.height(), cols = df.width(), "loaded record table");
    Ok(df)
}

/// Read a full table from a SQLite file into a DataFrame.
///
/// The connection is opened read-only and closed before returning. If the
/// read fails the connection is dropped before the error propagates.
pub fn load_sqlite_table(path: &Path, table: &str) -> AnalysisResult<DataFrame> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    match read_table(&conn, table) {
        Ok(df) => {
            conn.close().map_err(|(_, e)| AnalysisError::Database(e))?;
            Ok(df)
        }
        Err(e) => {
            drop(conn);
            Err(e)
        }
    }
}

/// List the tables and views in a SQLite file, sorted by name.
pub fn list_tables(path: &Path) -> AnalysisResult<Vec<String>> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let names = table_names(&conn)?;
    conn.close().map_err(|(_, e)| AnalysisError::Database(e))?;
    Ok(names)
}

fn table_names(conn: &Connection) -> AnalysisResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn read_table(conn: &Connection, table: &str) -> AnalysisResult<DataFrame> {
    let available = table_names(conn)?;
    if !available.iter().any(|name| name.eq_ignore_ascii_case(table)) {
        return Err(AnalysisError::TableNotFound {
            table: table.to_string(),
            available,
        });
    }

    let sql = format!("SELECT * FROM {}", quote_identifier(table));
    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut cells: Vec<Vec<SqlCell>> = names.iter().map(|_| Vec::new()).collect();

    let mut rows = stmt.query([])?;
    let mut blob_cells = 0usize;
    while let Some(row) = rows.next()? {
        for (idx, column) in cells.iter_mut().enumerate() {
            let cell = match row.get_ref(idx)? {
                ValueRef::Null => SqlCell::Null,
                ValueRef::Integer(v) => SqlCell::Number(v as f64),
                ValueRef::Real(v) => SqlCell::Number(v),
                ValueRef::Text(bytes) => SqlCell::Text(String::from_utf8_lossy(bytes).into_owned()),
                ValueRef::Blob(_) => {
                    blob_cells += 1;
                    SqlCell::Null
                }
            };
            column.push(cell);
        }
    }

    if blob_cells > 0 {
        warn!(blob_cells, "BLOB values are not supported and were read as null");
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(cells)
        .map(|(name, values)| build_column(name, values))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// A column is numeric when every non-null cell is INTEGER or REAL.
/// Anything else becomes a text identifier column.
fn build_column(name: &str, values: Vec<SqlCell>) -> Column {
    let numeric = values
        .iter()
        .all(|cell| matches!(cell, SqlCell::Null | SqlCell::Number(_)));

    if numeric {
        let floats: Vec<Option<f64>> = values
            .into_iter()
            .map(|cell| match cell {
                SqlCell::Number(v) => Some(v),
                _ => None,
            })
            .collect();
        Column::new(name.into(), floats)
    } else {
        let text: Vec<Option<String>> = values
            .into_iter()
            .map(|cell| match cell {
                SqlCell::Null => None,
                SqlCell::Number(v) => Some(v.to_string()),
                SqlCell::Text(s) => Some(s),
            })
            .collect();
        Column::new(name.into(), text)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Split the record table into its numeric feature subset and identifier names.
///
/// Numeric columns are cast to Float64 with non-finite values turned into
/// nulls. Columns listed in `exclude` are treated as identifiers even when
/// numeric (e.g. FIPS codes). Column order is preserved.
pub fn split_numeric(df: &DataFrame, exclude: &[String]) -> AnalysisResult<(DataFrame, Vec<String>)> {
    for name in exclude {
        if df.column(name).is_err() {
            warn!(column = %name, "excluded column not present in dataset");
        }
    }

    let mut numeric: Vec<Column> = Vec::new();
    let mut identifiers: Vec<String> = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        if !col.dtype().is_primitive_numeric() || exclude.contains(&name) {
            identifiers.push(name);
            continue;
        }

        let cast = col.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = cast
            .f64()?
            .iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        numeric.push(Column::new(name.as_str().into(), values));
    }

    if numeric.is_empty() {
        return Err(AnalysisError::NoNumericFeatures);
    }

    debug!(
        numeric = numeric.len(),
        identifiers = identifiers.len(),
        "split record table"
    );
    Ok((DataFrame::new(numeric)?, identifiers))
}

/// Count null cells across every column.
pub fn count_missing(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}
