mod phase;

use anyhow::Result;
use clap::{Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "svphaser";
    pub const BIN_NAME: &str = "svphaser";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Assign structural variants to haplotypes using HP-tagged long reads.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log debug messages")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(phase::cli::create_phase_cli())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    // RUST_LOG, when set, takes precedence
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_module_path(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // PHASE
        //
        Some((phase::cli::PHASE_CMD, matches)) => {
            phase::handlers::run_phase(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
