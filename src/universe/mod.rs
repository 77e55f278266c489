// Symbol universe module
use std::fs;
use std::path::Path;

use tracing::debug;

/// Load the trading universe from a CSV file. The first line is the
/// `symbol` header and is skipped; the rest are trimmed and blank
/// lines dropped. A missing file is an error.
pub fn load_universe(path: impl AsRef<Path>) -> crate::Result<Vec<String>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let symbols: Vec<String> = raw
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    debug!("Loaded {} symbols from {}", symbols.len(), path.display());
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_skips_header_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "symbol").unwrap();
        writeln!(file, "AAPL").unwrap();
        writeln!(file, "  MSFT  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "NVDA").unwrap();
        let symbols = load_universe(file.path()).unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn test_header_only_file_is_empty_universe() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "symbol").unwrap();
        let symbols = load_universe(file.path()).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_universe("/nonexistent/universe.csv").is_err());
    }
}
