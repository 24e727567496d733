use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::{Span, Timestamp};
use snaplink_shortener::config::{DEFAULT_BASE_URL, DEFAULT_CODE_LENGTH};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const BASE_URL_ENV: &str = "SNAPLINK_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "SNAPLINK_STORAGE_BACKEND";
pub const STORAGE_FILE_ENV: &str = "SNAPLINK_STORAGE_FILE";
pub const CODE_LENGTH_ENV: &str = "SNAPLINK_CODE_LENGTH";
pub const LOG_FORMAT_ENV: &str = "SNAPLINK_LOG_FORMAT";
pub const PASSWORD_ENV: &str = "SNAPLINK_PASSWORD";

pub const DEFAULT_STORAGE_FILE: &str = "urls.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "file")]
    File,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snaplink", version, about = "Shorten, resolve and inspect URLs")]
pub struct CLI {
    /// Prefix of composed short URLs.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        global = true,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    /// JSON snapshot holding every short URL.
    #[arg(long, global = true, env = STORAGE_FILE_ENV, default_value = DEFAULT_STORAGE_FILE)]
    pub storage_file: PathBuf,

    /// Length of random codes.
    #[arg(long, global = true, env = CODE_LENGTH_ENV, default_value_t = DEFAULT_CODE_LENGTH)]
    pub code_length: usize,

    /// Use random codes instead of deriving aliases from the URL.
    #[arg(long, global = true)]
    pub no_smart_alias: bool,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten one URL.
    Create(CreateArgs),
    /// Shorten many URLs with default options.
    Bulk {
        urls: Vec<String>,
        /// Read additional URLs from a file, one per line.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Follow a short code, counting a click.
    Resolve {
        code: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// Show a short URL without counting a click.
    Info { code: String },
    Delete { code: String },
    /// List short URLs, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    Recent {
        #[arg(long)]
        limit: Option<usize>,
    },
    Stats,
    /// Print an HTML snippet embedding the short URL.
    Embed { code: String },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub url: String,

    #[arg(long)]
    pub alias: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// Expire after this long, e.g. `7d` or `12h`.
    #[arg(long, conflicts_with = "expires_at")]
    pub expires_in: Option<Span>,

    /// Expire at this ISO-8601 time; no offset means UTC.
    #[arg(long, value_parser = snaplink_core::timestamp::parse)]
    pub expires_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        CLI::command().debug_assert();
    }

    #[test]
    fn parses_create_with_duration() {
        let cli = CLI::try_parse_from([
            "snaplink",
            "--storage",
            "in-memory",
            "create",
            "https://example.com",
            "--alias",
            "ex",
            "--expires-in",
            "7d",
        ])
        .unwrap();

        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.alias.as_deref(), Some("ex"));
        assert_eq!(args.expires_in.unwrap().get_days(), 7);
    }

    #[test]
    fn expiry_flags_conflict() {
        let result = CLI::try_parse_from([
            "snaplink",
            "create",
            "https://example.com",
            "--expires-in",
            "1h",
            "--expires-at",
            "2030-01-01T00:00:00",
        ]);
        assert!(result.is_err());
    }
}
