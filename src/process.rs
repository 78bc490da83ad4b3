use super::{DATE_FORMAT, ONSET_COLUMN, REPORT_COLUMN, VERSION};
use crate::curve::Frequency;
use clap::{value_t, App, Arg, ArgMatches};
use std::path::{Path, PathBuf};

/// Settings of the epicurve_count app.
#[derive(Debug, Clone)]
pub struct CountConfig {
    pub csvin: PathBuf,
    pub csvout: PathBuf,
    pub onset_col: String,
    pub report_col: String,
    pub date_format: String,
    pub freq: Frequency,
    pub verbose: bool,
}

/// default output next to the input: cases.csv -> cases_month.csv
pub fn default_output(csvin: &Path, freq: Frequency) -> PathBuf {
    let stem = csvin
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "epicurve".to_string());
    csvin.with_file_name(format!("{}_{}.csv", stem, freq))
}

/// Takes the CLI arguments to set the counting parameters, exits on invalid values.
pub fn parse_cli() -> CountConfig {
    let cli_args = count_app().get_matches();
    config_from_matches(&cli_args).unwrap_or_else(|e| e.exit())
}

/// The clap app of epicurve_count.
pub fn count_app() -> App<'static, 'static> {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the line list csv file")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .required(true);
    let arg_csvout = Arg::with_name("output_csvfile")
        .help("name of the output csv file with the bucket counts")
        .short("o")
        .long("output")
        .takes_value(true);
    let arg_freq = Arg::with_name("frequency")
        .help("aggregation of the new cases")
        .short("q")
        .long("freq")
        .takes_value(true)
        .possible_values(&["day", "month", "year", "d", "m", "y"])
        .default_value("day");
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
    let arg_verbose = Arg::with_name("verbose")
        .help("print the counts of every bucket")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);

    App::new("count the new cases of a line list")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli to export the epicurve counts of a line list as csv")
        .arg(arg_csvin)
        .arg(arg_csvout)
        .arg(arg_freq)
        .arg(arg_onset)
        .arg(arg_report)
        .arg(arg_format)
        .arg(arg_verbose)
}

pub fn config_from_matches(cli_args: &ArgMatches) -> Result<CountConfig, clap::Error> {
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let freq = value_t!(cli_args, "frequency", Frequency)?;
    let csvout = match cli_args.value_of("output_csvfile") {
        Some(p) => PathBuf::from(p),
        None => default_output(&csvin, freq),
    };
    Ok(CountConfig {
        csvin,
        csvout,
        onset_col: String::from(cli_args.value_of("onset_column").unwrap_or_default()),
        report_col: String::from(cli_args.value_of("report_column").unwrap_or_default()),
        date_format: String::from(cli_args.value_of("date_format").unwrap_or_default()),
        freq,
        verbose: cli_args.is_present("verbose"),
    })
}
