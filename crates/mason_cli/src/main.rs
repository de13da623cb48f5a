//! Mason CLI — the command-line interface for the mason build orchestrator.
//!
//! Provides `mason build` for incremental compilation and linking,
//! `mason clean` for removing build artifacts, and `mason init` for
//! project scaffolding.

#![warn(missing_docs)]

mod build;
mod clean;
mod init;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand};

/// The mason version, stamped into dependency records for invalidation.
pub const MASON_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Mason — an incremental build orchestrator for C projects.
#[derive(Parser, Debug)]
#[command(name = "mason", version, about = "Mason build orchestrator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output (per-unit staleness reasons).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `mason.toml` configuration file or project directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run. Defaults to `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile stale source units and link the executable.
    Build(BuildArgs),
    /// Remove build artifacts (objects and the executable).
    Clean(CleanArgs),
    /// Create a new mason project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes
        /// the current directory.
        name: Option<String>,
    },
}

/// Arguments for the `mason build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Number of parallel compile jobs (default: one per CPU).
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Arguments for the `mason clean` subcommand.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Also remove dependency records (full reset; the next build is cold).
    #[arg(long)]
    pub full: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-unit staleness detail.
    pub verbose: bool,
    /// Optional path to a custom config file or project directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    // A bare `mason` builds, like a bare `make`.
    let command = cli
        .command
        .unwrap_or(Command::Build(BuildArgs { jobs: None }));

    let result = match command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
        Command::Init { name } => init::run(name.as_deref(), &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["mason", "build"]);
        match cli.command {
            Some(Command::Build(args)) => assert!(args.jobs.is_none()),
            _ => panic!("expected Build command"),
        }
        assert!(!cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn bare_invocation_means_build() {
        // `mason` with no subcommand builds, like a bare `make`.
        let cli = Cli::parse_from(["mason"]);
        assert!(cli.command.is_none());

        let command = cli
            .command
            .unwrap_or(Command::Build(BuildArgs { jobs: None }));
        match command {
            Command::Build(args) => assert!(args.jobs.is_none()),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn bare_invocation_accepts_global_flags() {
        let cli = Cli::parse_from(["mason", "--quiet"]);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_build_with_jobs() {
        let cli = Cli::parse_from(["mason", "build", "--jobs", "4"]);
        match cli.command {
            Some(Command::Build(args)) => assert_eq!(args.jobs, Some(4)),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_clean_full() {
        let cli = Cli::parse_from(["mason", "clean", "--full"]);
        match cli.command {
            Some(Command::Clean(args)) => assert!(args.full),
            _ => panic!("expected Clean command"),
        }
    }

    #[test]
    fn parse_init_with_name() {
        let cli = Cli::parse_from(["mason", "init", "my_project"]);
        match cli.command {
            Some(Command::Init { name }) => assert_eq!(name.as_deref(), Some("my_project")),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::parse_from(["mason", "build", "--quiet", "--config", "proj/mason.toml"]);
        assert!(cli.quiet);
        assert_eq!(cli.config.as_deref(), Some("proj/mason.toml"));
    }
}
