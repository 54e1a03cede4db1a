//! Command-line interface definitions.
//!
//! Source URLs come only from flags. At least one source is required; a
//! source without a URL is skipped.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for the transfer bonus scraper.
///
/// # Examples
///
/// ```sh
/// # Both sources, CSV files in the current directory
/// transfer_bonuses --url-partners https://example.com/partners --url-bonuses https://example.com/bonuses
///
/// # Bonuses only, using the original single-URL flag
/// transfer_bonuses --url https://example.com/bonuses
///
/// # Abort with a non-zero exit status on the first failure
/// transfer_bonuses --url-bonuses https://example.com/bonuses --strict
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("sources").required(true).multiple(true).args(["url_partners", "url_bonuses"])))]
pub struct Cli {
    /// Page listing transfer partner tables
    #[arg(long)]
    pub url_partners: Option<Url>,

    /// Page listing current transfer bonuses
    #[arg(long, visible_alias = "url")]
    pub url_bonuses: Option<Url>,

    /// Directory receiving the CSV files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Fail on the first fetch, parse or coercion error instead of logging it.
    ///
    /// Only the error policy changes: files are written with the same
    /// columns in the same order as without this flag.
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "transfer_bonuses",
            "--url-partners",
            "https://example.com/partners",
            "--url-bonuses",
            "https://example.com/bonuses",
        ]);

        assert_eq!(
            cli.url_partners.as_ref().map(Url::as_str),
            Some("https://example.com/partners")
        );
        assert_eq!(
            cli.url_bonuses.as_ref().map(Url::as_str),
            Some("https://example.com/bonuses")
        );
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert!(!cli.strict);
    }

    #[test]
    fn test_legacy_url_flag_means_bonuses() {
        let cli = Cli::parse_from([
            "transfer_bonuses",
            "--url",
            "https://example.com/bonuses",
            "-o",
            "/tmp/out",
            "--strict",
        ]);

        assert!(cli.url_partners.is_none());
        assert!(cli.url_bonuses.is_some());
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
        assert!(cli.strict);
    }

    #[test]
    fn test_requires_a_source_flag() {
        let result = Cli::try_parse_from(["transfer_bonuses", "--strict"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_invalid_url() {
        let result = Cli::try_parse_from(["transfer_bonuses", "--url-bonuses", "not a url"]);
        assert!(result.is_err());
    }
}
