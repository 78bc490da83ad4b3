use crate::curve::{Bucket, Epicurve, Frequency};
use crate::date::next_month_start;
use crate::error::{EpicurveError, Result};
use chrono::prelude::*;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::convert::TryFrom;
use std::path::Path;

/// above this number of buckets the date labels are drawn vertically
pub const ROTATE_LABELS_ABOVE: usize = 12;

/// Size and style of the epicurve charts.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub y_desc: String,
    pub color: RGBColor,
}

impl Default for ChartOptions {
    fn default() -> ChartOptions {
        ChartOptions {
            width: 1600,
            height: 800,
            y_desc: "new cases".to_string(),
            color: RGBColor(200, 60, 60),
        }
    }
}

/// Plots the epicurve as a bar chart, svg when `fout` ends with .svg, png otherwise.
/// Each call draws on its own backend, nothing is shared between charts.
pub fn plot(curve: &Epicurve, fout: &Path, opts: &ChartOptions) -> Result<()> {
    let size = (opts.width, opts.height);
    let is_svg = fout
        .extension()
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);
    let drawn = if is_svg {
        let root = SVGBackend::new(fout, size).into_drawing_area();
        draw(&root, curve, opts)
    } else {
        let root = BitMapBackend::new(fout, size).into_drawing_area();
        draw(&root, curve, opts)
    };
    drawn.map_err(|e| EpicurveError::Plot(format!("{}: {}", fout.display(), e)))?;
    info!(
        "saved {} epicurve with {} buckets to {}",
        curve.freq,
        curve.len(),
        fout.display()
    );
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &Epicurve,
    opts: &ChartOptions,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    if curve.is_empty() {
        let cx = (opts.width / 2) as i32;
        let cy = (opts.height / 2) as i32;
        root.draw(&Text::new(
            curve.title.clone(),
            (cx - 200, cy - 60),
            ("sans-serif", 30).into_font().color(&BLACK),
        ))?;
        root.draw(&Text::new(
            "no cases with a usable date",
            (cx - 200, cy),
            ("sans-serif", 24).into_font().color(&BLACK),
        ))?;
    } else {
        match curve.freq {
            Frequency::Year => draw_categorical(root, curve, opts)?,
            Frequency::Day | Frequency::Month => draw_chronological(root, curve, opts)?,
        }
    }
    root.present()?;
    Ok(())
}

/// day and month curves, bars placed on a datetime axis
fn draw_chronological<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &Epicurve,
    opts: &ChartOptions,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let bars: Vec<(DateTime<Utc>, DateTime<Utc>, u32)> = curve
        .counts()
        .iter()
        .filter_map(|(b, &c)| bar_extent(b).map(|(x0, x1)| (x0, x1, count_u32(c))))
        .collect();
    let (xmindt, xmaxdt) = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => (first.0, last.1),
        _ => return Ok(()),
    };
    let xmargin = (xmaxdt - xmindt) / 20;
    let xmindt = xmindt - xmargin;
    let xmaxdt = xmaxdt + xmargin;
    let xfmt = label_format(curve.freq);
    let font = ("sans-serif", 20).into_font();
    let label_font = if rotate_labels(curve.len()) {
        font.transform(FontTransform::Rotate90)
    } else {
        font
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&curve.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(100)
        .build_cartesian_2d(xmindt..xmaxdt, 0u32..y_limit(curve.max_count()))?;
    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
        .set_all_tick_mark_size(2)
        .label_style(("sans-serif", 20))
        .x_label_style(TextStyle::from(label_font))
        .y_desc(opts.y_desc.as_str())
        .x_labels(curve.len().min(14)) // max number of labels
        .x_label_formatter(&|x: &DateTime<Utc>| x.format(xfmt).to_string())
        .x_desc(format!("{} [{}]", curve.freq, xfmt.replace("%", "")))
        .draw()?;

    let fill = opts.color.filled();
    chart.draw_series(
        bars.iter()
            .map(|&(x0, x1, c)| Rectangle::new([(x0, 0), (x1, c)], fill)),
    )?;
    chart.draw_series(
        bars.iter()
            .map(|&(x0, x1, c)| Rectangle::new([(x0, 0), (x1, c)], BLACK.stroke_width(1))),
    )?;
    Ok(())
}

/// year curves, one labelled segment per year
fn draw_categorical<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &Epicurve,
    opts: &ChartOptions,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let data: Vec<(String, u32)> = curve
        .counts()
        .iter()
        .map(|(b, &c)| (b.label(), count_u32(c)))
        .collect();

    let mut chart = ChartBuilder::on(root)
        .caption(&curve.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(
            (0..data.len()).into_segmented(),
            0u32..y_limit(curve.max_count()),
        )?;
    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
        .label_style(("sans-serif", 20))
        .y_desc(opts.y_desc.as_str())
        .x_labels(data.len())
        .x_label_formatter(&|x: &SegmentValue<usize>| {
            if let SegmentValue::CenterOf(idx) = x {
                if let Some((label, _)) = data.get(*idx) {
                    return label.clone();
                }
            }
            String::new()
        })
        .x_desc(curve.freq.name())
        .draw()?;

    let fill = opts.color.filled();
    chart.draw_series(data.iter().enumerate().map(|(idx, (_, c))| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(idx), 0), (SegmentValue::Exact(idx + 1), *c)],
            fill,
        );
        bar.set_margin(0, 0, 10, 10);
        bar
    }))?;
    Ok(())
}

fn to_utc(d: NaiveDate) -> Option<DateTime<Utc>> {
    d.and_hms_opt(0, 0, 0)
        .map(|dt| TimeZone::from_utc_datetime(&Utc, &dt))
}

/// horizontal extent of the bar of a bucket, the bucket interval minus a 10% gap on both sides
pub fn bar_extent(b: &Bucket) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = b.start()?;
    let end = match b {
        Bucket::Day(d) => d.succ_opt()?,
        Bucket::Month(d) => next_month_start(*d)?,
        Bucket::Year(y) => NaiveDate::from_ymd_opt(*y + 1, 1, 1)?,
    };
    let x0 = to_utc(start)?;
    let x1 = to_utc(end)?;
    let gap = (x1 - x0) / 10;
    Some((x0 + gap, x1 - gap))
}

pub fn label_format(freq: Frequency) -> &'static str {
    match freq {
        Frequency::Day => "%Y-%m-%d",
        Frequency::Month => "%Y-%m",
        Frequency::Year => "%Y",
    }
}

pub fn rotate_labels(buckets: usize) -> bool {
    buckets > ROTATE_LABELS_ABOVE
}

/// counts beyond the u32 axis saturate at its maximum
pub fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// upper limit of the count axis, 10% headroom and never zero
pub fn y_limit(max_count: usize) -> u32 {
    let max = count_u32(max_count);
    max.saturating_add(max / 10).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_bar_within_its_day() {
        let (x0, x1) = bar_extent(&Bucket::Day(ymd(2020, 1, 1))).unwrap();
        assert_eq!(x0.date_naive(), ymd(2020, 1, 1));
        assert_eq!(x1.date_naive(), ymd(2020, 1, 1));
        assert_eq!(x1 - x0, chrono::Duration::hours(24) * 8 / 10);
    }

    #[test]
    fn month_bar_covers_whole_month() {
        let (x0, x1) = bar_extent(&Bucket::Month(ymd(2020, 2, 1))).unwrap();
        assert_eq!(x0.date_naive(), ymd(2020, 2, 3));
        assert_eq!(x1.date_naive(), ymd(2020, 2, 26));
        let (_, dec_end) = bar_extent(&Bucket::Month(ymd(2020, 12, 1))).unwrap();
        assert_eq!(dec_end.date_naive(), ymd(2020, 12, 28));
    }

    #[test]
    fn count_axis_has_headroom() {
        assert_eq!(y_limit(0), 1);
        assert_eq!(y_limit(3), 4);
        assert_eq!(y_limit(50), 56);
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(count_u32(7), 7);
        assert_eq!(count_u32(usize::MAX), u32::MAX);
        assert_eq!(y_limit(usize::MAX), u32::MAX);
        assert_eq!(y_limit(u32::MAX as usize - 1), u32::MAX);
    }

    fn curve(freq: Frequency, dates: &[Option<NaiveDate>]) -> Epicurve {
        Epicurve::build(dates, freq, Some("Approximate onset or report date"))
    }

    fn sample_dates() -> Vec<Option<NaiveDate>> {
        let mut dates: Vec<Option<NaiveDate>> = (1..=20).map(|d| Some(ymd(2020, 1, d))).collect();
        dates.extend(vec![
            Some(ymd(2020, 1, 2)),
            Some(ymd(2020, 3, 15)),
            Some(ymd(2021, 7, 1)),
            None,
        ]);
        dates
    }

    fn assert_written(fout: &Path) {
        let meta = std::fs::metadata(fout).unwrap();
        assert!(meta.len() > 0, "{} is empty", fout.display());
    }

    #[test]
    fn plots_every_frequency_to_png_and_svg() {
        let dir = tempfile::tempdir().unwrap();
        let opts = ChartOptions::default();
        let dates = sample_dates();
        for freq in [Frequency::Day, Frequency::Month, Frequency::Year].iter() {
            for ext in ["png", "svg"].iter() {
                let fout = dir.path().join(format!("{}.{}", freq, ext));
                plot(&curve(*freq, &dates), &fout, &opts).unwrap();
                assert_written(&fout);
            }
        }
    }

    #[test]
    fn svg_extension_selects_svg_backend() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("month.SVG");
        plot(&curve(Frequency::Month, &sample_dates()), &fout, &ChartOptions::default()).unwrap();
        let content = std::fs::read_to_string(&fout).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn empty_curve_still_plots() {
        let dir = tempfile::tempdir().unwrap();
        let opts = ChartOptions::default();
        for freq in [Frequency::Day, Frequency::Month, Frequency::Year].iter() {
            let empty = curve(*freq, &[None, None]);
            assert!(empty.is_empty());
            for ext in ["png", "svg"].iter() {
                let fout = dir.path().join(format!("empty_{}.{}", freq, ext));
                plot(&empty, &fout, &opts).unwrap();
                assert_written(&fout);
            }
        }
    }

    #[test]
    fn single_bucket_plots() {
        let dir = tempfile::tempdir().unwrap();
        let opts = ChartOptions {
            width: 400,
            height: 300,
            ..ChartOptions::default()
        };
        let one = vec![Some(ymd(2020, 6, 1))];
        for freq in [Frequency::Day, Frequency::Month, Frequency::Year].iter() {
            let fout = dir.path().join(format!("one_{}.png", freq));
            plot(&curve(*freq, &one), &fout, &opts).unwrap();
            assert_written(&fout);
        }
    }

    #[test]
    fn labels_follow_frequency() {
        assert_eq!(label_format(Frequency::Day), "%Y-%m-%d");
        assert_eq!(label_format(Frequency::Month), "%Y-%m");
        assert!(!rotate_labels(5));
        assert!(rotate_labels(ROTATE_LABELS_ABOVE + 1));
    }
}
