use clap::Parser;
use log::info;
use rawbids_core::cli::Cli;
use rawbids_core::{Dcm2niix, Outcome, Subject};
use std::path::PathBuf;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let mut subject = match Subject::new(&cli.raw_dir, &cli.out_dir) {
        Ok(subject) => subject,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!(
        "standardizing {} ({} data, {} raw sessions)",
        subject.subject_id(),
        subject.site(),
        subject.raw_session_count()
    );

    let binary = cli
        .converter
        .unwrap_or_else(|| PathBuf::from(subject.profile().converter_name()));
    let converter = Dcm2niix::new(binary);

    match subject.standardize(&converter) {
        Ok(Outcome::Standardized) => {
            println!("Standardized {}", subject.subject_id());
        }
        Ok(Outcome::AlreadyStandardized) => {
            println!(
                "{} is already standardized, nothing to do",
                subject.subject_id()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Warn)
            .init();
    }
}
