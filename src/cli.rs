//! CLI definition and parsing.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - Global flags may appear before or after the subcommand.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::curl::{CurlInvocation, Header};

/// A small toolbox: environment lookup, a minimal curl, and UTF-8 BOM editing.
#[derive(Parser, Debug, Clone)]
#[command(name = "ytool", author, version, about)]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, global = true, value_parser = parse_level)]
    pub log_level: Option<LogLevel>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print the config file location used by ytool and exit.
    #[arg(long)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Environment variable operations
    #[command(subcommand)]
    Env(EnvCommand),
    /// A curl-like HTTP client
    #[command(subcommand)]
    Curl(CurlCommand),
    /// File BOM header operations
    #[command(subcommand)]
    Bom(BomCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum EnvCommand {
    /// Print the value of an environment variable
    Get {
        /// Variable name
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CurlCommand {
    /// Send a GET request
    #[command(after_help = "Example: ytool curl get -u http://www.example.com")]
    Get(CurlArgs),
    /// Send a POST request
    #[command(after_help = "Example: ytool curl post -u http://localhost:8080/api -b '{\"k\":1}'")]
    Post(CurlArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CurlArgs {
    /// Request URL (overrides the curl file)
    #[arg(short = 'u', long, value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// Request body (overrides the curl file)
    #[arg(short = 'b', long)]
    pub body: Option<String>,

    /// Load a saved curl command from a file
    #[arg(short = 'l', long, value_hint = ValueHint::FilePath)]
    pub load: Option<PathBuf>,

    /// Extra header `Key: Value` (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<Header>,

    /// Print the status line and response headers before the body
    #[arg(short = 'i', long)]
    pub include: bool,
}

impl CurlArgs {
    pub fn invocation(&self) -> CurlInvocation<'_> {
        CurlInvocation {
            url: self.url.as_deref(),
            body: self.body.as_deref(),
            load: self.load.as_deref(),
            headers: self.headers.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum BomCommand {
    /// Add a UTF-8 BOM to a file
    #[command(after_help = "Example: ytool bom add ./test.txt")]
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Remove the UTF-8 BOM from a file
    #[command(after_help = "Example: ytool bom remove ./test.txt")]
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Report whether a file starts with a UTF-8 BOM
    #[command(after_help = "Example: ytool bom exist ./test.txt")]
    Exist {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    s.parse()
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_subcommands_parse() {
        let args = Args::parse_from(["ytool", "bom", "add", "./a.txt"]);
        assert!(matches!(
            args.command,
            Some(Command::Bom(BomCommand::Add { ref path })) if path == &PathBuf::from("./a.txt")
        ));
        let args = Args::parse_from(["ytool", "bom", "exist", "b.txt", "--debug"]);
        assert!(args.debug);
    }

    #[test]
    fn curl_headers_repeat_and_validate() {
        let args = Args::parse_from([
            "ytool", "curl", "post", "-u", "http://h/", "-H", "A: 1", "-H", "B: 2", "-b", "x",
        ]);
        let Some(Command::Curl(CurlCommand::Post(c))) = args.command else {
            panic!("expected curl post");
        };
        assert_eq!(c.headers.len(), 2);
        assert_eq!(c.invocation().body, Some("x"));

        let bad = Args::try_parse_from(["ytool", "curl", "get", "-H", "nocolon"]);
        assert!(bad.is_err());
    }

    #[test]
    fn env_get_requires_exactly_one_name() {
        assert!(Args::try_parse_from(["ytool", "env", "get"]).is_err());
        assert!(Args::try_parse_from(["ytool", "env", "get", "A", "B"]).is_err());
        assert!(Args::try_parse_from(["ytool", "env", "get", "PATH"]).is_ok());
    }

    #[test]
    fn overrides_and_level_precedence() {
        let args = Args::parse_from(["ytool", "--log-level", "quiet", "--debug", "--log-file", "/tmp/y.log"]);
        let mut cfg = Config::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/y.log")));
        assert!(Args::try_parse_from(["ytool", "--log-level", "loud"]).is_err());
    }
}
