use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use svphaser_io::BamEvidenceOpener;
use svphaser_phasing::{PhaseSettings, phase_vcf};

/// Settings given on the command line; unset flags stay `None`.
fn settings_from_flags(matches: &ArgMatches) -> PhaseSettings {
    PhaseSettings {
        min_support: matches.get_one::<u32>("min-support").copied(),
        major_delta: matches.get_one::<f64>("major-delta").copied(),
        equal_delta: matches.get_one::<f64>("equal-delta").copied(),
        gq_bins: matches.get_one::<String>("gq-bins").cloned(),
        threads: matches.get_one::<usize>("threads").copied(),
        progress: matches.get_flag("progress").then_some(true),
    }
}

pub fn run_phase(matches: &ArgMatches) -> Result<()> {
    let vcf = matches
        .get_one::<PathBuf>("sv_vcf")
        .context("A path to the SV VCF is required.")?;
    let bam = matches
        .get_one::<PathBuf>("bam")
        .context("A path to the BAM is required.")?;
    let out_dir = matches
        .get_one::<PathBuf>("out-dir")
        .context("An output directory is required.")?;

    let file_settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => PhaseSettings::from_toml_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => PhaseSettings::default(),
    };
    let settings = file_settings.merge(settings_from_flags(matches));

    info!("Phasing {} against {}", vcf.display(), bam.display());
    let opener = BamEvidenceOpener::new(bam);
    let outputs = phase_vcf(vcf, &opener, &settings, out_dir)
        .with_context(|| format!("Failed to phase {}", vcf.display()))?;

    println!("{}", outputs.phased_vcf.display());
    println!("{}", outputs.phased_csv.display());

    Ok(())
}
