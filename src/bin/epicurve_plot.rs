use anyhow::Context;
use epicurve_lpp::chart::{plot, ChartOptions};
use epicurve_lpp::plot::parse_cli;
use epicurve_lpp::{init_logger, Epicurve, Frequency, LineList};
use log::info;

fn main() -> anyhow::Result<()> {
    let cfg = parse_cli();
    init_logger(cfg.verbose);
    info!(
        "read line list from {} and plot to {}",
        cfg.csvin.display(),
        cfg.outdir.display()
    );
    let linelist = LineList::from_csv(&cfg.csvin, &cfg.onset_col, &cfg.report_col, &cfg.date_format)
        .with_context(|| format!("could not load line list {}", cfg.csvin.display()))?;
    let dates = linelist.dates();
    let opts = ChartOptions::default();
    std::fs::create_dir_all(&cfg.outdir)
        .with_context(|| format!("could not create output directory {}", cfg.outdir.display()))?;

    let day = Epicurve::build(&dates, Frequency::Day, Some(cfg.title.as_str()));
    plot(&day, &cfg.outdir.join("day.png"), &opts)?;

    // the yearly curve is only saved on request
    let year = Epicurve::build(&dates, Frequency::Year, Some(cfg.title.as_str()));
    match &cfg.year_out {
        Some(p) => plot(&year, p, &opts)?,
        None => info!("yearly epicurve not saved\n{}", year),
    }

    let month = Epicurve::build(&dates, Frequency::Month, Some(cfg.title.as_str()));
    plot(&month, &cfg.outdir.join("month.png"), &opts)?;
    Ok(())
}
