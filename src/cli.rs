//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use estat_dl_core::api::{DEFAULT_LANG, DEFAULT_PAGE_SIZE};
use estat_dl_core::download::DEFAULT_CONCURRENCY;

/// Bulk download utility for the e-Stat statistics REST API.
///
/// estat-dl searches the table listing, paginates large tables, and
/// fetches every page concurrently to local storage.
#[derive(Parser, Debug)]
#[command(name = "estat-dl")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the table listing and print matching tables
    Search(SearchArgs),
    /// Search the table listing and download every page of each match
    Download(DownloadArgs),
    /// Extract downloaded zip archives
    Extract(ExtractArgs),
}

/// API access arguments shared by network commands.
#[derive(Args, Debug)]
pub struct ApiArgs {
    /// Application identifier issued for API access
    #[arg(long, env = "ESTAT_APP_ID")]
    pub app_id: String,

    /// Response language (J or E)
    #[arg(long, default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Override the API base URL (useful against a local test server)
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Table listing filters shared by search and download.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Government statistics code (8 digits)
    #[arg(long)]
    pub stats_code: Option<String>,

    /// Free-text search keyword
    #[arg(long)]
    pub search_word: Option<String>,

    /// Survey years (YYYY, YYYYMM, or YYYYMM-YYYYMM)
    #[arg(long)]
    pub survey_years: Option<String>,

    /// Maximum number of listing entries to request
    #[arg(long)]
    pub limit: Option<u64>,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Write the raw listing response as pretty JSON to this path
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Arguments for the `download` subcommand.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Directory receiving one subdirectory per table
    #[arg(short = 'o', long, default_value = "./downloads")]
    pub output_dir: PathBuf,

    /// Maximum concurrent fetches (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Rows per page request
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u64,

    /// Charset of CSV payloads as served by the API
    #[arg(long, default_value = "utf-8")]
    pub read_encoding: String,

    /// Charset used for the files written to disk (e.g. cp932 for
    /// spreadsheet tools on Windows)
    #[arg(long, default_value = "utf-8")]
    pub write_encoding: String,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Zip archives to extract
    #[arg(required = true)]
    pub archives: Vec<PathBuf>,

    /// Directory receiving extracted entries
    #[arg(short = 't', long, default_value = ".")]
    pub target_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_cli_download_default_args() {
        let cli = parse(&["estat-dl", "download", "--app-id", "X"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        let Command::Download(args) = cli.command else {
            panic!("expected download command");
        };
        assert_eq!(args.concurrency, 10); // DEFAULT_CONCURRENCY
        assert_eq!(args.page_size, 100_000); // DEFAULT_PAGE_SIZE
        assert_eq!(args.api.lang, "J");
        assert_eq!(args.read_encoding, "utf-8");
        assert_eq!(args.write_encoding, "utf-8");
        assert_eq!(args.output_dir, PathBuf::from("./downloads"));
        assert!(!args.no_progress);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = parse(&["estat-dl", "-v", "search", "--app-id", "X"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = parse(&["estat-dl", "-vv", "search", "--app-id", "X"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let cli = parse(&["estat-dl", "-q", "search", "--app-id", "X"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_concurrency_range() {
        let cli = parse(&[
            "estat-dl", "download", "--app-id", "X", "-c", "30",
        ])
        .unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download command");
        };
        assert_eq!(args.concurrency, 30);

        let result = parse(&["estat-dl", "download", "--app-id", "X", "-c", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let result = parse(&["estat-dl", "download", "--app-id", "X", "-c", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_search_filters() {
        let cli = parse(&[
            "estat-dl",
            "search",
            "--app-id",
            "X",
            "--stats-code",
            "00200502",
            "--search-word",
            "population",
            "--limit",
            "10",
        ])
        .unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.filter.stats_code.as_deref(), Some("00200502"));
        assert_eq!(args.filter.search_word.as_deref(), Some("population"));
        assert_eq!(args.filter.limit, Some(10));
        assert!(args.save.is_none());
    }

    #[test]
    fn test_cli_extract_requires_archives() {
        let result = parse(&["estat-dl", "extract"]);
        assert!(result.is_err());

        let cli = parse(&["estat-dl", "extract", "a.zip", "b.zip", "-t", "out"]).unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.archives.len(), 2);
        assert_eq!(args.target_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = parse(&["estat-dl", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = parse(&["estat-dl", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
