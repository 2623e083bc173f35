//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `convert`: Replace Chinese display text with translation calls
//! - `init`: Write a default `.i18nrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Convert(cmd)) => cmd.args.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Dictionary file mapping keys to text (overrides config file)
    #[arg(long, value_name = "FILE")]
    pub dict: Option<PathBuf>,

    /// Only use keys under this prefix, e.g. `order` (overrides config file)
    #[arg(long, value_name = "PREFIX")]
    pub match_path: Option<String>,

    /// Leave text without a dictionary key unchanged instead of using the text as key
    #[arg(long, overrides_with = "no_skip_unmatched")]
    pub skip_unmatched: bool,

    /// Use the text as key when no dictionary key exists (overrides config file)
    #[arg(long, overrides_with = "skip_unmatched")]
    pub no_skip_unmatched: bool,

    /// Actually write converted files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// File that collects text without a dictionary key (overrides config file)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// `Some` when a skip flag was given; the last one wins.
    pub fn skip_unmatched_flag(&self) -> Option<bool> {
        match (self.skip_unmatched, self.no_skip_unmatched) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Files or directories to convert (default: `includes` from the config file)
    pub paths: Vec<String>,

    #[command(flatten)]
    pub args: ConvertArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace Chinese text in templates and scripts with translation calls
    Convert(ConvertCommand),
    /// Initialize a new .i18nrc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_convert_flags() {
        let args = Arguments::parse_from([
            "i18n-convert",
            "convert",
            "src/views",
            "--dict",
            "zh.json",
            "--match-path",
            "order",
            "--skip-unmatched",
            "--apply",
            "-v",
        ]);
        assert!(args.verbose());
        let Some(Command::Convert(cmd)) = args.command else {
            panic!("Expected convert command");
        };
        assert_eq!(cmd.paths, vec!["src/views"]);
        assert_eq!(cmd.args.dict, Some(PathBuf::from("zh.json")));
        assert_eq!(cmd.args.match_path.as_deref(), Some("order"));
        assert_eq!(cmd.args.skip_unmatched_flag(), Some(true));
        assert!(cmd.args.apply);
        assert!(cmd.args.log_file.is_none());
    }

    #[test]
    fn test_skip_unmatched_flags() {
        let flag = |extra: &[&str]| {
            let args = Arguments::parse_from(["i18n-convert", "convert"].iter().chain(extra));
            let Some(Command::Convert(cmd)) = args.command else {
                panic!("Expected convert command");
            };
            cmd.args.skip_unmatched_flag()
        };
        assert_eq!(flag(&[]), None);
        assert_eq!(flag(&["--no-skip-unmatched"]), Some(false));
        assert_eq!(flag(&["--no-skip-unmatched", "--skip-unmatched"]), Some(true));
        assert_eq!(flag(&["--skip-unmatched", "--no-skip-unmatched"]), Some(false));
    }

    #[test]
    fn test_no_command() {
        let args = Arguments::parse_from(["i18n-convert"]);
        assert!(args.command.is_none());
        assert!(!args.verbose());
    }

    #[test]
    fn test_verify_cli() {
        Arguments::command().debug_assert();
    }
}
