//! autopkgtest-runner entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use autopkgtest_runner::commands::{
    check_command, config_command, exit_code_for, gui_command, run_command, RunOptions,
};
use autopkgtest_runner::output::print_error;
use autopkgtest_runner::Virtualization;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autopkgtest-runner")]
#[command(
    version,
    about = "Run Debian autopkgtest suites against local package directories",
    after_help = "EXAMPLES:
    # Open the window
    autopkgtest-runner

    # Run the tests of a package from the terminal
    autopkgtest-runner run ~/src/hello
    autopkgtest-runner run ~/src/hello --backend schroot

    # Check whether a directory has a test control file
    autopkgtest-runner check ~/src/hello"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the graphical interface (default)
    Gui,

    /// Run autopkgtest on a package directory and stream its output
    Run {
        /// Package source directory
        directory: PathBuf,

        /// Virtualization backend (null, schroot, lxc, qemu); defaults to the stored setting
        #[arg(short, long, value_parser = parse_backend)]
        backend: Option<Virtualization>,

        /// Test tool executable to use instead of autopkgtest
        #[arg(long)]
        tool: Option<PathBuf>,
    },

    /// Check a package directory for debian/tests/control
    Check {
        /// Package source directory
        directory: PathBuf,
    },

    /// Show configuration paths and stored values
    Config {
        /// Store a new default virtualization backend
        #[arg(short, long, value_parser = parse_backend)]
        backend: Option<Virtualization>,
    },
}

fn parse_backend(name: &str) -> Result<Virtualization, String> {
    Virtualization::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = Virtualization::all().iter().map(|v| v.as_arg()).collect();
        format!("unknown backend '{}' (expected one of: {})", name, names.join(", "))
    })
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        None | Some(Commands::Gui) => gui_command(),

        Some(Commands::Run {
            directory,
            backend,
            tool,
        }) => match run_command(&RunOptions {
            directory,
            backend,
            tool,
        }) {
            Ok(outcome) => std::process::exit(exit_code_for(outcome)),
            Err(e) => Err(e),
        },

        Some(Commands::Check { directory }) => check_command(&directory).map(|check| {
            if !check.has_control() {
                std::process::exit(1);
            }
        }),

        Some(Commands::Config { backend }) => config_command(backend),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
