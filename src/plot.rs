use super::{DATE_FORMAT, DEFAULT_TITLE, ONSET_COLUMN, REPORT_COLUMN, VERSION};
use clap::{App, Arg};
use std::path::PathBuf;

/// Settings of the epicurve_plot app.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub csvin: PathBuf,
    pub onset_col: String,
    pub report_col: String,
    pub date_format: String,
    pub title: String,
    pub outdir: PathBuf,
    pub year_out: Option<PathBuf>,
    pub verbose: bool,
}

/// Takes the CLI arguments that control the plotting of the epicurves.
pub fn parse_cli() -> PlotConfig {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the line list csv file")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .required(true)
        .default_value("linelist.csv");
    let arg_onset = Arg::with_name("onset_column")
        .help("name of the onset date column, preferred when present")
        .long("onset")
        .takes_value(true)
        .default_value(ONSET_COLUMN);
    let arg_report = Arg::with_name("report_column")
        .help("name of the report date column, used when the onset date is missing")
        .long("report")
        .takes_value(true)
        .default_value(REPORT_COLUMN);
    let arg_format = Arg::with_name("date_format")
        .help("strftime format of the date columns")
        .short("d")
        .long("date-format")
        .takes_value(true)
        .default_value(DATE_FORMAT);
    let arg_title = Arg::with_name("title")
        .help("title of the charts")
        .short("t")
        .long("title")
        .takes_value(true)
        .default_value(DEFAULT_TITLE);
    let arg_outdir = Arg::with_name("outdir")
        .help("directory for day.png and month.png")
        .short("o")
        .long("outdir")
        .takes_value(true)
        .default_value(".");
    let arg_year_out = Arg::with_name("year_out")
        .help("also save the yearly epicurve, png or svg")
        .short("y")
        .long("year-out")
        .takes_value(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print the counts of every bucket")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    let cli_args = App::new("Epicurve_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot the daily, monthly, and yearly epicurves of a line list")
        .arg(arg_csvin)
        .arg(arg_onset)
        .arg(arg_report)
        .arg(arg_format)
        .arg(arg_title)
        .arg(arg_outdir)
        .arg(arg_year_out)
        .arg(arg_verbose)
        .get_matches();
    PlotConfig {
        csvin: PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default()),
        onset_col: String::from(cli_args.value_of("onset_column").unwrap_or_default()),
        report_col: String::from(cli_args.value_of("report_column").unwrap_or_default()),
        date_format: String::from(cli_args.value_of("date_format").unwrap_or_default()),
        title: String::from(cli_args.value_of("title").unwrap_or_default()),
        outdir: PathBuf::from(cli_args.value_of("outdir").unwrap_or_default()),
        year_out: cli_args.value_of("year_out").map(PathBuf::from),
        verbose: cli_args.is_present("verbose"),
    }
}
