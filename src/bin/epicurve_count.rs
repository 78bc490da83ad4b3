use anyhow::Context;
use epicurve_lpp::process::parse_cli;
use epicurve_lpp::{init_logger, Epicurve, LineList};
use log::info;
use std::fs::File;

fn main() -> anyhow::Result<()> {
    let cfg = parse_cli();
    init_logger(cfg.verbose);
    info!(
        "read line list from {} and save {} counts to {}",
        cfg.csvin.display(),
        cfg.freq,
        cfg.csvout.display()
    );
    let linelist = LineList::from_csv(&cfg.csvin, &cfg.onset_col, &cfg.report_col, &cfg.date_format)
        .with_context(|| format!("could not load line list {}", cfg.csvin.display()))?;
    let curve = Epicurve::build(&linelist.dates(), cfg.freq, None);
    let fout = File::create(&cfg.csvout)
        .with_context(|| format!("could not create {}", cfg.csvout.display()))?;
    curve.to_csv(fout)?;
    info!("wrote {} buckets, {} cases", curve.len(), curve.total());
    Ok(())
}
