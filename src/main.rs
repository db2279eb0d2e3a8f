mod commands;
mod config;
mod confirm;
mod diagnostics;
mod error;
mod locate;
mod matcher;
mod paths;
mod report;
mod request;
mod store;
mod sync;
mod synthesizer;
mod template;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Overrides;
use crate::report::Format;

#[derive(Parser)]
#[command(
    name = "entrypoint",
    version,
    about = "Keep add_executable declarations in CMakeLists.txt in sync with single-file entry points"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Declare a source file as an executable in its nearest CMakeLists.txt
    Add {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: Format,
        /// Never prompt; decline overwriting a conflicting declaration
        #[arg(long, conflicts_with = "yes")]
        no_input: bool,
        #[command(flatten)]
        target: TargetArgs,
        /// Overwrite a conflicting declaration without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Report whether a source file is already declared (0 present, 1 absent, 3 conflict)
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Show or edit .entrypoint.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
        /// Project root holding .entrypoint.toml
        #[arg(long, default_value = ".")]
        project_root: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a setting: executable_name, runtime_output_directory, skip_overwrite_confirmation
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Print the effective settings
    Show,
}

#[derive(Args)]
struct TargetArgs {
    /// Executable name template (%FILENAME% is the source name without extension)
    #[arg(long)]
    name: Option<String>,
    /// Runtime output directory template (%PROJECT_DIR%, %FILE_DIR%); empty omits it
    #[arg(long)]
    output_dir: Option<String>,
    /// Project root: settings location and fallback build-file directory
    #[arg(long, default_value = ".")]
    project_root: PathBuf,
    /// Source file to declare
    source: PathBuf,
}

impl TargetArgs {
    /// Convert parsed arguments into a command target.
    fn into_target(self, skip_overwrite_confirmation: bool) -> commands::Target {
        return commands::Target {
            overrides: Overrides {
                executable_name: self.name,
                runtime_output_directory: self.output_dir,
                skip_overwrite_confirmation,
            },
            project_root: self.project_root,
            source: self.source,
        };
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| return EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Add { format, no_input, target, yes } => commands::add(&target.into_target(yes), no_input, format),
        Commands::Check { target } => commands::check(&target.into_target(false)),
        Commands::Config { action, project_root } => match action {
            ConfigAction::Set { key, value } => {
                commands::config_set(&project_root, &key, &value).map(|()| return ExitCode::SUCCESS)
            },
            ConfigAction::Show => commands::config_show(&project_root).map(|()| return ExitCode::SUCCESS),
        },
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}
