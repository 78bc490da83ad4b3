use crate::date::month_start;
use crate::error::{EpicurveError, Result};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;

/// Aggregation granularity of an epicurve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Day,
    Month,
    Year,
}

impl Frequency {
    pub fn name(&self) -> &'static str {
        match self {
            Frequency::Day => "day",
            Frequency::Month => "month",
            Frequency::Year => "year",
        }
    }

    /// the bucket holding `d` at this frequency
    pub fn bucket(&self, d: NaiveDate) -> Option<Bucket> {
        match self {
            Frequency::Day => Some(Bucket::Day(d)),
            Frequency::Month => month_start(d).map(Bucket::Month),
            Frequency::Year => Some(Bucket::Year(d.year())),
        }
    }
}

/// Matched on the first letter, case-insensitive: "day", "D", "daily" are all `Day`.
impl FromStr for Frequency {
    type Err = EpicurveError;

    fn from_str(s: &str) -> Result<Frequency> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('d') => Ok(Frequency::Day),
            Some('m') => Ok(Frequency::Month),
            Some('y') => Ok(Frequency::Year),
            _ => Err(EpicurveError::UnknownFrequency(s.to_string())),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of an epicurve bar. Month buckets hold the first day of the month.
/// Ordering is chronological within one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Day(NaiveDate),
    Month(NaiveDate),
    Year(i32),
}

impl Bucket {
    /// first day covered by the bucket
    pub fn start(&self) -> Option<NaiveDate> {
        match self {
            Bucket::Day(d) | Bucket::Month(d) => Some(*d),
            Bucket::Year(y) => NaiveDate::from_ymd_opt(*y, 1, 1),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Bucket::Day(d) => d.format("%Y-%m-%d").to_string(),
            Bucket::Month(d) => d.format("%Y-%m").to_string(),
            Bucket::Year(y) => y.to_string(),
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Serialize)]
struct BucketRow {
    bucket: String,
    count: usize,
}

/// Count of new cases per bucket at one frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Epicurve {
    pub freq: Frequency,
    pub title: String,
    counts: BTreeMap<Bucket, usize>,
}

impl Epicurve {
    /// Counts the dates per bucket, missing dates are skipped.
    /// Without a title the curve is named after the date column, "dates".
    pub fn build(dates: &[Option<NaiveDate>], freq: Frequency, title: Option<&str>) -> Epicurve {
        let mut counts: BTreeMap<Bucket, usize> = BTreeMap::new();
        let mut skipped = 0usize;
        for d in dates.iter() {
            match d.and_then(|d| freq.bucket(d)) {
                Some(b) => *counts.entry(b).or_insert(0) += 1,
                None => skipped += 1,
            }
        }
        let curve = Epicurve {
            freq,
            title: title.unwrap_or("dates").to_string(),
            counts,
        };
        info!(
            "{} epicurve: {} cases in {} buckets, {} records without date",
            freq,
            curve.total(),
            curve.len(),
            skipped
        );
        for (b, c) in curve.counts.iter() {
            debug!("{} {}", b, c);
        }
        curve
    }

    pub fn counts(&self) -> &BTreeMap<Bucket, usize> {
        &self.counts
    }

    pub fn get(&self, bucket: &Bucket) -> usize {
        self.counts.get(bucket).copied().unwrap_or(0)
    }

    /// sum over all buckets, equals the number of records with a date
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// number of buckets
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// writes the bucket and count columns as csv, the header also for an empty curve
    pub fn to_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
        wtr.write_record(&["bucket", "count"])?;
        for (b, &count) in self.counts.iter() {
            wtr.serialize(BucketRow {
                bucket: b.label(),
                count,
            })?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl std::fmt::Display for Epicurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, count\n", self.freq)?;
        for (b, c) in self.counts.iter() {
            write!(f, "{},{}\n", b, c)?
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn five_rows() -> Vec<Option<NaiveDate>> {
        vec![
            Some(ymd(2020, 1, 1)),
            Some(ymd(2020, 1, 2)),
            Some(ymd(2020, 2, 1)),
            Some(ymd(2021, 1, 1)),
            None,
        ]
    }

    #[test]
    fn frequency_matches_first_letter() {
        assert_eq!("day".parse::<Frequency>().unwrap(), Frequency::Day);
        assert_eq!("D".parse::<Frequency>().unwrap(), Frequency::Day);
        assert_eq!("Month".parse::<Frequency>().unwrap(), Frequency::Month);
        assert_eq!("y".parse::<Frequency>().unwrap(), Frequency::Year);
        assert_eq!("yearly".parse::<Frequency>().unwrap(), Frequency::Year);
        assert!("week".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn day_counts() {
        let c = Epicurve::build(&five_rows(), Frequency::Day, None);
        assert_eq!(c.len(), 4);
        for d in [ymd(2020, 1, 1), ymd(2020, 1, 2), ymd(2020, 2, 1), ymd(2021, 1, 1)].iter() {
            assert_eq!(c.get(&Bucket::Day(*d)), 1);
        }
        assert_eq!(c.total(), 4);
        assert_eq!(c.title, "dates");
    }

    #[test]
    fn month_counts() {
        let c = Epicurve::build(&five_rows(), Frequency::Month, Some("t"));
        let got: Vec<(String, usize)> = c.counts().iter().map(|(b, n)| (b.label(), *n)).collect();
        assert_eq!(
            got,
            vec![
                ("2020-01".to_string(), 2),
                ("2020-02".to_string(), 1),
                ("2021-01".to_string(), 1)
            ]
        );
        assert_eq!(c.title, "t");
    }

    #[test]
    fn year_counts() {
        let c = Epicurve::build(&five_rows(), Frequency::Year, None);
        assert_eq!(c.get(&Bucket::Year(2020)), 3);
        assert_eq!(c.get(&Bucket::Year(2021)), 1);
        assert_eq!(c.len(), 2);
        assert_eq!(c.max_count(), 3);
    }

    #[test]
    fn same_month_different_days() {
        let dates = vec![Some(ymd(2020, 3, 4)), Some(ymd(2020, 3, 28))];
        let day = Epicurve::build(&dates, Frequency::Day, None);
        let month = Epicurve::build(&dates, Frequency::Month, None);
        assert_eq!(day.get(&Bucket::Day(ymd(2020, 3, 4))), 1);
        assert_eq!(day.get(&Bucket::Day(ymd(2020, 3, 28))), 1);
        assert_eq!(month.get(&Bucket::Month(ymd(2020, 3, 1))), 2);
        assert_eq!(month.len(), 1);
    }

    #[test]
    fn all_missing_gives_empty_curves() {
        let dates = vec![None, None, None];
        for f in [Frequency::Day, Frequency::Month, Frequency::Year].iter() {
            let c = Epicurve::build(&dates, *f, None);
            assert!(c.is_empty());
            assert_eq!(c.total(), 0);
            assert_eq!(c.max_count(), 0);
        }
        assert!(Epicurve::build(&[], Frequency::Day, None).is_empty());
    }

    #[test]
    fn buckets_are_chronological() {
        let dates = vec![Some(ymd(2021, 1, 1)), Some(ymd(2019, 6, 1)), Some(ymd(2020, 1, 1))];
        let c = Epicurve::build(&dates, Frequency::Year, None);
        let years: Vec<Bucket> = c.counts().keys().copied().collect();
        assert_eq!(years, vec![Bucket::Year(2019), Bucket::Year(2020), Bucket::Year(2021)]);
    }

    #[test]
    fn exports_csv() {
        let c = Epicurve::build(&five_rows(), Frequency::Month, None);
        let mut out: Vec<u8> = Vec::new();
        c.to_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "bucket,count\n2020-01,2\n2020-02,1\n2021-01,1\n"
        );
    }

    #[test]
    fn empty_curve_exports_header_only() {
        let c = Epicurve::build(&[None, None], Frequency::Month, None);
        let mut out: Vec<u8> = Vec::new();
        c.to_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bucket,count\n");
    }

    #[test]
    fn display_lists_buckets() {
        let c = Epicurve::build(&five_rows(), Frequency::Year, None);
        assert_eq!(c.to_string(), "year, count\n2020,3\n2021,1\n");
    }
}
