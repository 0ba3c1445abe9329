//! Loading the symbol list from a CSV export (e.g. a screener download).

use std::{fs::File, io::Read, path::Path};

use crate::errors::SymbolFileError;

/// Header of the column holding bare tickers.
pub const SYMBOL_COLUMN: &str = "Symbol";

/// Reads bare tickers from the `Symbol` column of a CSV file.
pub fn load_symbols(path: &Path) -> Result<Vec<String>, SymbolFileError> {
    let file = File::open(path).map_err(|source| SymbolFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_symbols(file)
}

/// Reads bare tickers from CSV data.
///
/// Other columns are ignored; values are trimmed and blank cells skipped.
/// Order and duplicates are preserved.
pub fn read_symbols<R: Read>(reader: R) -> Result<Vec<String>, SymbolFileError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| SymbolFileError::Csv { record: 0, source })?
        .clone();
    let Some(idx) = headers.iter().position(|h| h.trim() == SYMBOL_COLUMN) else {
        return Err(SymbolFileError::MissingSymbolColumn {
            found: headers.iter().collect::<Vec<_>>().join(", "),
        });
    };

    let mut symbols = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|source| SymbolFileError::Csv {
            record: i as u64 + 1,
            source,
        })?;
        if let Some(value) = record.get(idx).map(str::trim).filter(|v| !v.is_empty()) {
            symbols.push(value.to_string());
        }
    }
    Ok(symbols)
}
