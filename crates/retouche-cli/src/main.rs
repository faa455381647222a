// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Retouche — command-line front end for the filter library.
//
// Entry point. Initialises logging, parses arguments, runs one command and
// reports failures in plain language.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use retouche_core::RetoucheError;
use retouche_core::human_errors::{HumanError, Severity, humanize_error};

use cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("Retouche starting");

    match commands::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("command failed: {err:#}");
            match err.downcast_ref::<RetoucheError>() {
                Some(retouche_err) => {
                    let human = humanize_error(retouche_err);
                    eprintln!("{}", render(&human));
                    ExitCode::from(exit_code(human.severity))
                }
                None => {
                    eprintln!("{err:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Exit status per severity, from the BSD sysexits set.
fn exit_code(severity: Severity) -> u8 {
    match severity {
        // EX_TEMPFAIL
        Severity::Transient => 75,
        // EX_USAGE
        Severity::ActionRequired => 64,
        // EX_DATAERR
        Severity::Permanent => 65,
    }
}

fn render(human: &HumanError) -> String {
    let mut text = format!("{}\n{}", human.message, human.suggestion);
    if human.retriable {
        text.push_str("\nRunning the same command again may work.");
    }
    text
}
