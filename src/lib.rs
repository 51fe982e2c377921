pub mod error;
pub mod model;
pub mod normalize;
pub mod output;
pub mod render;
pub mod source;
pub mod track;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{value_parser, Arg, Command};
use error::PipelineResult;
use log::info;
use source::{DynamoDbSource, JsonFileSource, RecordSource};
use std::path::PathBuf;

pub const DEFAULT_TABLE: &str = "ShipCords";
pub const DEFAULT_REGION: &str = "eu-central-1";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table: String,
    pub region: String,
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub zoom: u8,
    pub csv: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table: DEFAULT_TABLE.to_string(),
            region: DEFAULT_REGION.to_string(),
            input: None,
            output: PathBuf::from(output::DEFAULT_OUTPUT),
            zoom: render::DEFAULT_ZOOM,
            csv: None,
        }
    }
}

fn command() -> Command {
    Command::new("ship_tracks")
        .version("0.1")
        .about("plot stored ship positions as tracks on a map [html]")
        .arg(
            Arg::new("table")
                .long("table")
                .default_value(DEFAULT_TABLE)
                .help("table to scan"),
        )
        .arg(
            Arg::new("region")
                .long("region")
                .default_value(DEFAULT_REGION)
                .help("region of the table"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .value_parser(value_parser!(PathBuf))
                .help("read a saved scan result instead of the table"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .default_value(output::DEFAULT_OUTPUT)
                .help("map file to write"),
        )
        .arg(
            Arg::new("zoom")
                .long("zoom")
                .value_parser(value_parser!(u8))
                .default_value("5")
                .help("initial zoom level"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .value_parser(value_parser!(PathBuf))
                .help("also export the sorted positions as csv"),
        )
}

pub fn get_arg() -> Result<Config> {
    get_arg_from(std::env::args_os())
}

/// Bad flags come back as errors; only `--help` and `--version` exit here.
pub fn get_arg_from<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command()
        .try_get_matches_from(args)
        .or_else(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => Err(e),
        })?;
    Ok(config_from(matches))
}

fn config_from(matches: clap::ArgMatches) -> Config {
    let defaults = Config::default();
    Config {
        table: matches
            .get_one::<String>("table")
            .cloned()
            .unwrap_or(defaults.table),
        region: matches
            .get_one::<String>("region")
            .cloned()
            .unwrap_or(defaults.region),
        input: matches.get_one::<PathBuf>("input").cloned(),
        output: matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or(defaults.output),
        zoom: matches.get_one::<u8>("zoom").copied().unwrap_or(defaults.zoom),
        csv: matches.get_one::<PathBuf>("csv").cloned(),
    }
}

pub fn source_for(config: &Config) -> Box<dyn RecordSource> {
    match &config.input {
        Some(path) => Box::new(JsonFileSource::new(path.clone())),
        None => Box::new(DynamoDbSource::new(&config.table, &config.region)),
    }
}

pub fn run(config: Config) -> Result<()> {
    let source = source_for(&config);
    process(source.as_ref(), &config)?;
    Ok(())
}

/// The single line the binary prints for a finished run.
pub fn outcome_line(result: &Result<PathBuf>) -> String {
    match result {
        Ok(output) => format!("Map has been saved as '{}'.", output.display()),
        Err(e) => format!("Error occurred: {e}"),
    }
}

/// fetch -> normalize -> sort -> group -> render -> write. Nothing is
/// written unless every earlier stage succeeded, and the CSV export only
/// lands once the map is in place.
pub fn process(source: &dyn RecordSource, config: &Config) -> PipelineResult<render::RenderedMap> {
    let records = source.fetch_all()?;
    let rows = normalize::normalize_all(&records)?;
    let sorted = track::sort_rows(rows);
    let tracks = track::assemble(&sorted);
    info!("{} rows across {} vessels", sorted.len(), tracks.len());

    let map = render::render(&sorted, &tracks, config.zoom)?;

    let staged_csv = match &config.csv {
        Some(csv_path) => Some(output::stage_csv(&sorted, csv_path)?),
        None => None,
    };

    if let Err(e) = output::write_map(&map, &config.output) {
        if let Some(staged) = staged_csv {
            staged.discard();
        }
        return Err(e);
    }

    if let Some(staged) = staged_csv {
        staged.commit()?;
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_gives_default_config() {
        let matches = command().try_get_matches_from(["ship_tracks"]).unwrap();

        assert_eq!(config_from(matches), Config::default());
    }

    #[test]
    fn arguments_override_defaults() {
        let matches = command()
            .try_get_matches_from([
                "ship_tracks",
                "--table",
                "Other",
                "--input",
                "scan.json",
                "-o",
                "out.html",
                "--zoom",
                "8",
                "--csv",
                "rows.csv",
            ])
            .unwrap();

        let config = config_from(matches);

        assert_eq!(config.table, "Other");
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.input, Some(PathBuf::from("scan.json")));
        assert_eq!(config.output, PathBuf::from("out.html"));
        assert_eq!(config.zoom, 8);
        assert_eq!(config.csv, Some(PathBuf::from("rows.csv")));
    }

    #[test]
    fn zoom_must_be_a_number() {
        assert!(get_arg_from(["ship_tracks", "--zoom", "far"]).is_err());
    }

    #[test]
    fn bad_flag_is_reported_as_error_line() {
        let result = get_arg_from(["ship_tracks", "--no-such-flag"]).map(|c| c.output);

        assert!(outcome_line(&result).starts_with("Error occurred: "));
    }

    #[test]
    fn success_line_names_output() {
        let result: Result<PathBuf> = Ok(PathBuf::from(output::DEFAULT_OUTPUT));

        assert_eq!(
            outcome_line(&result),
            "Map has been saved as 'ship_tracks_map.html'."
        );
    }

    #[test]
    fn empty_input_line() {
        let result: Result<PathBuf> = Err(error::PipelineError::EmptyInput.into());

        assert_eq!(
            outcome_line(&result),
            "Error occurred: no position records to plot"
        );
    }
}
