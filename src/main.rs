use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use workday_markdown::aggregate::default_cutoff;
use workday_markdown::convert::{ConvertOptions, convert};
use workday_markdown::{ConvertError, Result};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.file.exists() {
        return Err(ConvertError::InputNotFound(cli.file));
    }

    let options = ConvertOptions {
        since: resolve_cutoff(cli.since, Local::now().date_naive()),
        input: cli.file,
        output: cli.output,
    };
    convert(&options)?;
    Ok(())
}

fn resolve_cutoff(since: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    since.unwrap_or_else(|| default_cutoff(today))
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| ConvertError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert a Workday feedback export (XLSX) to a Markdown file."
)]
struct Cli {
    /// Feedback file or folder of feedback files.
    #[arg(long)]
    file: PathBuf,

    /// Day from which feedback is collected (YYYY-MM-DD); defaults to six
    /// months ago.
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Write the report here instead of a temporary file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn since_parses_as_calendar_date() {
        let cli = Cli::try_parse_from(["workday-markdown", "--file", "in.xlsx", "--since", "2024-06-01"])
            .expect("arguments parsed");

        assert_eq!(cli.file, PathBuf::from("in.xlsx"));
        assert_eq!(cli.since, Some(day(2024, 6, 1)));
        assert_eq!(cli.output, None);
        assert_eq!(resolve_cutoff(cli.since, day(2024, 10, 18)), day(2024, 6, 1));
    }

    #[test]
    fn missing_since_falls_back_to_six_months() {
        let cli = Cli::try_parse_from(["workday-markdown", "--file", "exports", "--output", "out.md"])
            .expect("arguments parsed");

        assert_eq!(cli.since, None);
        assert_eq!(cli.output, Some(PathBuf::from("out.md")));
        assert_eq!(resolve_cutoff(cli.since, day(2024, 10, 18)), day(2024, 4, 18));
    }

    #[test]
    fn file_is_required() {
        let error = Cli::try_parse_from(["workday-markdown", "--since", "2024-06-01"])
            .err()
            .expect("usage error");
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let error = Cli::try_parse_from(["workday-markdown", "--file", "in.xlsx", "--verbose"])
            .err()
            .expect("usage error");
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn malformed_since_is_rejected() {
        let error = Cli::try_parse_from(["workday-markdown", "--file", "in.xlsx", "--since", "01/06/2024"])
            .err()
            .expect("usage error");
        assert_eq!(error.kind(), ErrorKind::ValueValidation);
    }
}
