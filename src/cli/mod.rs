//! Defines the bufferlist CLI through clap types.

mod completions;
mod show;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use thiserror::Error;

pub use self::completions::CompletionsCommand;
pub use self::show::ShowCommand;

/// Command line options that bufferlist accepts, defined using the clap crate.
#[derive(Debug, Parser)]
#[clap(name = "bufferlist", version, about)]
pub struct Options {
    #[clap(flatten)]
    pub global: GlobalOptions,

    /// Subcommand to run in this invocation.
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Options {
    pub fn run(self) -> anyhow::Result<()> {
        match self.subcommand {
            Subcommand::Show(subcommand) => subcommand.run(self.global),
            Subcommand::Completions(subcommand) => subcommand.run(),
        }
    }
}

#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times.
    #[clap(long("verbose"), short, global(true), action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Set color behavior. Valid values are auto, always, and never.
    #[clap(long("color"), global(true), default_value("auto"))]
    pub color: ColorChoice,

    /// Also write a detailed log to a daily file in this directory.
    #[clap(long("log-dir"), global(true))]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl FromStr for ColorChoice {
    type Err = ColorChoiceParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(ColorChoiceParseError {
                attempted: source.to_owned(),
            }),
        }
    }
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => termcolor::ColorChoice::Auto,
            ColorChoice::Always => termcolor::ColorChoice::Always,
            ColorChoice::Never => termcolor::ColorChoice::Never,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid color choice '{attempted}'. Valid values are: auto, always, never")]
pub struct ColorChoiceParseError {
    attempted: String,
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Show(ShowCommand),
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Options::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let options = Options::try_parse_from([
            "bufferlist",
            "show",
            "default.session",
            "-vv",
            "--color",
            "never",
        ])
        .unwrap();

        assert_eq!(options.global.verbosity, 2);
        assert_eq!(options.global.color, ColorChoice::Never);
        assert!(matches!(options.subcommand, Subcommand::Show(_)));
    }

    #[test]
    fn bad_color_choice() {
        let error = "sometimes".parse::<ColorChoice>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid color choice 'sometimes'. Valid values are: auto, always, never"
        );
    }
}
