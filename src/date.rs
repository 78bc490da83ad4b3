use chrono::NaiveDate;

/// Outcome of normalizing one date cell of the line list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Present(NaiveDate),
    /// empty or whitespace-only cell
    Absent,
    /// non-empty cell that does not match the format, keeps the raw text
    Malformed(String),
}

impl DateValue {
    /// the missing-value view, both `Absent` and `Malformed` give `None`
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Present(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, DateValue::Present(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DateValue::Malformed(_))
    }

    /// keeps `self` when present, otherwise falls back to `other`
    pub fn or(&self, other: &DateValue) -> Option<NaiveDate> {
        self.date().or_else(|| other.date())
    }
}

/// Parses a line-list date with a chrono strftime pattern.
/// Never fails, unparseable input is reported through the returned value.
pub fn normalize_date(raw: Option<&str>, format: &str) -> DateValue {
    let s = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return DateValue::Absent,
    };
    match NaiveDate::parse_from_str(s, format) {
        Ok(d) => DateValue::Present(d),
        Err(_) => DateValue::Malformed(s.to_string()),
    }
}

/// First day of the month containing `d`.
pub fn month_start(d: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1)
}

/// First day of the month following the month of `d`.
pub fn next_month_start(d: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    }
}
