use crate::commands::{check::CheckArgs, match_lines::MatchArgs};

pub mod check;
pub mod match_lines;

/// Subcommands for genregex
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Compile and optimize a pattern configuration, then describe it.
    Check(CheckArgs),

    /// Match input lines against a pattern configuration.
    Match(MatchArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Check(cmd) => cmd.run(),
            Commands::Match(cmd) => cmd.run(),
        }
    }
}
