// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::model::RecipeId;

/// Command-line arguments for `kitchenbot`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kitchenbot",
    version,
    about = "Drive a simulated kitchen robot: single operations or guided recipes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Kitchenbot.toml` in the current working directory, or the
    /// built-in configuration if that file does not exist.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `KITCHENBOT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print catalog and recipes, but run nothing.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the operations the robot can perform.
    Operations,

    /// List factory and user recipes.
    Recipes,

    /// Run one operation in manual mode.
    RunTask {
        /// Operation id (chop, dice, knead, saute, boil, steam).
        operation: String,

        /// Override the preset duration.
        #[arg(long, value_name = "SECONDS")]
        duration: Option<u32>,
    },

    /// Run a recipe in guided cooking mode.
    RunRecipe {
        id: RecipeId,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
