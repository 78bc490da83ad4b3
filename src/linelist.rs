use crate::date::{normalize_date, DateValue};
use crate::error::{EpicurveError, Result};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One case of the line list, only the date fields are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub onset: DateValue,
    pub report: DateValue,
}

impl CaseRecord {
    pub fn new(onset: DateValue, report: DateValue) -> CaseRecord {
        CaseRecord { onset, report }
    }

    /// onset date when present, report date otherwise
    pub fn unified_date(&self) -> Option<NaiveDate> {
        self.onset.or(&self.report)
    }
}

/// The main struct for the line list
#[derive(Debug, Clone, Default)]
pub struct LineList {
    pub records: Vec<CaseRecord>,
}

impl LineList {
    pub fn new(capacity: usize) -> LineList {
        LineList {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Init a LineList from a csv file with a header row.
    /// The onset and report columns are looked up by name,
    /// a missing column is an error, an unparseable date is not.
    pub fn from_csv(
        fin: &Path,
        onset_col: &str,
        report_col: &str,
        date_format: &str,
    ) -> Result<LineList> {
        let file = File::open(fin).map_err(|source| EpicurveError::Io {
            path: fin.to_path_buf(),
            source,
        })?;
        let linelist = LineList::from_reader(file, fin, onset_col, report_col, date_format)?;
        info!(
            "read {} records from {}, {} without any usable date",
            linelist.len(),
            fin.display(),
            linelist.missing_count()
        );
        Ok(linelist)
    }

    /// same as `from_csv` for any reader, `source` is only used in messages
    pub fn from_reader<R: Read>(
        rdr: R,
        source: &Path,
        onset_col: &str,
        report_col: &str,
        date_format: &str,
    ) -> Result<LineList> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        // only the two date cells are decoded, other columns may hold any encoding
        let headers = rdr.byte_headers()?.clone();
        let column_index = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim() == name)
                .ok_or_else(|| EpicurveError::MissingColumn {
                    column: name.to_string(),
                    path: source.to_path_buf(),
                })
        };
        let onset_idx = column_index(onset_col)?;
        let report_idx = column_index(report_col)?;
        debug!(
            "onset column '{}' at {}, report column '{}' at {}",
            onset_col, onset_idx, report_col, report_idx
        );

        let mut linelist = LineList::new(1000);
        for result in rdr.byte_records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let cell = |idx: usize| record.get(idx).map(String::from_utf8_lossy);
            let onset = normalize_date(cell(onset_idx).as_deref(), date_format);
            let report = normalize_date(cell(report_idx).as_deref(), date_format);
            for (col, v) in [(onset_col, &onset), (report_col, &report)].iter() {
                if let DateValue::Malformed(raw) = v {
                    warn!(
                        "line {}: could not parse '{}' in column '{}' with format {}, treated as missing",
                        line, raw, col, date_format
                    );
                }
            }
            linelist.records.push(CaseRecord::new(onset, report));
        }
        Ok(linelist)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// the unified date column, one entry per record
    pub fn dates(&self) -> Vec<Option<NaiveDate>> {
        self.records.iter().map(|r| r.unified_date()).collect()
    }

    /// number of records with neither onset nor report date
    pub fn missing_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.unified_date().is_none())
            .count()
    }

    /// number of date cells that were present but could not be parsed
    pub fn malformed_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.onset.is_malformed() as usize + r.report.is_malformed() as usize)
            .sum()
    }
}
