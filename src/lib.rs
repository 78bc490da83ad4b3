use log::LevelFilter;
pub mod chart;
pub mod curve;
pub mod date;
pub mod error;
pub mod linelist;
pub mod plot;
pub mod process;

pub use chart::ChartOptions;
pub use curve::{Bucket, Epicurve, Frequency};
pub use date::{normalize_date, DateValue};
pub use error::{EpicurveError, Result};
pub use linelist::{CaseRecord, LineList};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const ONSET_COLUMN: &str = "Approx onset date";
pub const REPORT_COLUMN: &str = "Approx reporting date";
pub const DEFAULT_TITLE: &str = "Approximate onset or report date";

/// Builds the epicurve of a line list from its unified onset/report dates.
/// `freq` is matched on its first letter: "day", "m", "Year", ...
pub fn epicurve(linelist: &LineList, freq: &str, title: Option<&str>) -> Result<Epicurve> {
    let freq: Frequency = freq.parse()?;
    Ok(Epicurve::build(&linelist.dates(), freq, title))
}

/// env_logger at info level, debug when verbose; RUST_LOG still takes precedence
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();
}
