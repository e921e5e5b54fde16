use clap::{Arg, Command, arg, value_parser};

use std::path::PathBuf;

pub const PHASE_CMD: &str = "phase";
pub const DEFAULT_OUT_DIR: &str = ".";

pub fn create_phase_cli() -> Command {
    Command::new(PHASE_CMD)
        .about("Phase the SVs of a VCF against an HP-tagged, indexed BAM.")
        .arg(
            Arg::new("sv_vcf")
                .help("SV calls, plain or gzipped VCF")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("bam")
                .help("Indexed BAM with HP-tagged reads")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            arg!(-o --"out-dir" <DIR> "Directory for the outputs, created if missing")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUT_DIR),
        )
        .arg(
            arg!(--"min-support" <N> "Minimum supporting reads [default: 10]")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--"major-delta" <F> "Majority fraction for a single-haplotype call [default: 0.70]")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--"equal-delta" <F> "Largest imbalance called as both haplotypes [default: 0.25]")
                .value_parser(value_parser!(f64)),
        )
        .arg(arg!(--"gq-bins" <SPEC> "GQ labels, e.g. \"30:High,10:Moderate\"; empty disables"))
        .arg(
            arg!(-t --threads <N> "Worker threads [default: all cores]")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--config <FILE> "TOML settings file; flags override it")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--progress "Show a progress bar")
                .action(clap::ArgAction::SetTrue),
        )
}
