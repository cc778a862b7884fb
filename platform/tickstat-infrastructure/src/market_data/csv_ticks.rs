use std::fs::File;
use std::path::{Path, PathBuf};
use tickstat_domain::repositories::market_data::TickSource;
use tickstat_domain::value_objects::tick::Tick;

pub const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "symbol", "price"];

/// Tick CSV with a header row containing at least `timestamp,symbol,price`.
#[derive(Debug, Clone)]
pub struct CsvTickSource {
    path: PathBuf,
}

impl CsvTickSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TickSource for CsvTickSource {
    fn describe(&self) -> String {
        format!("csv({})", self.path.display())
    }

    fn load_ticks(&self) -> Result<Vec<Tick>, String> {
        load_csv(&self.path)
    }
}

pub fn load_csv(path: &Path) -> Result<Vec<Tick>, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open tick CSV {}: {}", path.display(), err))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| format!("failed to read CSV header {}: {}", path.display(), err))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (Some(ts_idx), Some(sym_idx), Some(px_idx)) =
        (column("timestamp"), column("symbol"), column("price"))
    else {
        let found: Vec<&str> = headers.iter().collect();
        return Err(format!(
            "CSV must contain columns {:?}. Found: {:?}",
            REQUIRED_COLUMNS, found
        ));
    };

    let mut ticks = Vec::new();
    // Line 1 is the header.
    for (row_num, record) in reader.records().enumerate().map(|(i, r)| (i + 2, r)) {
        let record =
            record.map_err(|err| format!("failed to parse CSV row at line {row_num}: {err}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let timestamp = field(ts_idx);
        let symbol = field(sym_idx);
        let raw_price = field(px_idx);
        if timestamp.is_empty() || symbol.is_empty() {
            return Err(format!(
                "bad row at line {row_num}: empty timestamp or symbol ({:?})",
                record
            ));
        }
        let price: f64 = raw_price
            .parse()
            .map_err(|err| format!("bad row at line {row_num}: price {raw_price:?}: {err}"))?;
        if !price.is_finite() {
            return Err(format!(
                "bad row at line {row_num}: price must be finite (got {raw_price})"
            ));
        }

        ticks.push(Tick::new(timestamp, symbol, price));
    }

    metrics::counter!("tickstat.infra.csv.rows_total").increment(ticks.len() as u64);
    tracing::info!(path = %path.display(), rows = ticks.len(), "rows loaded");
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::{load_csv, CsvTickSource};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tickstat_domain::repositories::market_data::TickSource;

    fn unique_tmp_path(name: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("tickstat_{name}_{}_{}", std::process::id(), now))
    }

    fn write_tmp(name: &str, contents: &str) -> PathBuf {
        let path = unique_tmp_path(name);
        fs::write(&path, contents).expect("write csv");
        path
    }

    #[test]
    fn load_csv_reads_rows_in_order_and_trims_fields() {
        let path = write_tmp(
            "ticks_ok.csv",
            "timestamp,symbol,price,volume\n\
2024-01-01T09:30:00, AAPL ,10.5,100\n\
2024-01-01T09:30:01,AAPL, 11 ,200\n",
        );
        let ticks = load_csv(&path).expect("load csv");
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].symbol, "AAPL");
        assert_eq!(ticks[0].price, 10.5);
        assert_eq!(ticks[1].timestamp, "2024-01-01T09:30:01");
        assert_eq!(ticks[1].price, 11.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let path = write_tmp("ticks_order.csv", "price,timestamp,symbol\n5,t0,MSFT\n");
        let ticks = CsvTickSource::new(&path).load_ticks().expect("load");
        assert_eq!(ticks[0].symbol, "MSFT");
        assert_eq!(ticks[0].price, 5.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_columns_are_reported_with_found_headers() {
        let path = write_tmp("ticks_cols.csv", "timestamp,ticker,price\nt0,AAPL,1\n");
        let err = load_csv(&path).expect_err("missing symbol");
        assert!(err.contains("CSV must contain columns"));
        assert!(err.contains("ticker"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn bad_price_reports_line_number() {
        let path = write_tmp(
            "ticks_bad.csv",
            "timestamp,symbol,price\nt0,AAPL,1\nt1,AAPL,abc\n",
        );
        let err = load_csv(&path).expect_err("bad price");
        assert!(err.contains("line 3"), "{err}");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let path = write_tmp("ticks_inf.csv", "timestamp,symbol,price\nt0,AAPL,inf\n");
        let err = load_csv(&path).expect_err("inf");
        assert!(err.contains("must be finite"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_csv(&unique_tmp_path("nope.csv")).expect_err("missing");
        assert!(err.contains("failed to open tick CSV"));
        assert!(CsvTickSource::new("x.csv").describe().contains("x.csv"));
    }
}
