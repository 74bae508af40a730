//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use celldict::DEFAULT_PAGE_CAP;

/// Mirror Sogou Pinyin cell dictionaries to local storage.
///
/// Celldict walks the site's paginated category listings, resolves each
/// entry's detail page to its downloadable `.scel` resource, and stores the
/// resources flatly under the download directory, skipping files already
/// present.
#[derive(Parser, Debug)]
#[command(name = "celldict")]
#[command(author, version, about)]
pub struct Args {
    /// Download root directory for .scel files
    #[arg(short, long, default_value = "/tmp/cell")]
    pub dir: PathBuf,

    /// Maximum listing pages examined per category
    #[arg(short = 'p', long, default_value_t = DEFAULT_PAGE_CAP, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// Number of crawl workers (default: available CPU parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// First category ID to crawl
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub start_id: u64,

    /// Last category ID to crawl (unbounded when omitted)
    #[arg(long)]
    pub end_id: Option<u64>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["celldict"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("/tmp/cell"));
        assert_eq!(args.max_pages, 100); // DEFAULT_PAGE_CAP
        assert_eq!(args.workers, None);
        assert_eq!(args.start_id, 1);
        assert_eq!(args.end_id, None);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_dir_flag() {
        let args = Args::try_parse_from(["celldict", "--dir", "/data/scel"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("/data/scel"));

        let args = Args::try_parse_from(["celldict", "-d", "/data/scel"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("/data/scel"));
    }

    #[test]
    fn test_cli_max_pages_flag() {
        let args = Args::try_parse_from(["celldict", "--max-pages", "5"]).unwrap();
        assert_eq!(args.max_pages, 5);
    }

    #[test]
    fn test_cli_max_pages_zero_rejected() {
        let result = Args::try_parse_from(["celldict", "-p", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_id_range_flags() {
        let args =
            Args::try_parse_from(["celldict", "--start-id", "100", "--end-id", "200"]).unwrap();
        assert_eq!(args.start_id, 100);
        assert_eq!(args.end_id, Some(200));
    }

    #[test]
    fn test_cli_start_id_zero_rejected() {
        let result = Args::try_parse_from(["celldict", "--start-id", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_workers_flag() {
        let args = Args::try_parse_from(["celldict", "-w", "4"]).unwrap();
        assert_eq!(args.workers, Some(4));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["celldict", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["celldict", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["celldict", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["celldict", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
