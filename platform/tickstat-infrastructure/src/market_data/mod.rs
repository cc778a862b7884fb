mod csv_ticks;

pub use csv_ticks::{load_csv, CsvTickSource, REQUIRED_COLUMNS};
