//! Command-line front end for the mdplanner engine.
//!
//! # Responsibility
//! - Report the engine version and the sections it understands.
//! - List the projects found in the configured data directory.
//! - Write logs under `MDPLANNER_LOG_DIR` when it is set.

use log::error;
use mdplanner_core::{engine_version, init_logging, ProjectStore, SectionRegistry};
use std::process::ExitCode;

const LOG_DIR_VAR: &str = "MDPLANNER_LOG_DIR";

fn main() -> ExitCode {
    let registry = SectionRegistry::standard();
    println!(
        "mdplanner version={} sections={}",
        engine_version(),
        registry.len()
    );

    let store = match ProjectStore::from_env() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("settings error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(dir) = std::env::var(LOG_DIR_VAR) {
        if let Err(err) = init_logging(store.settings().log_level, &dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match store.scan_projects() {
        Ok(projects) => {
            println!(
                "data_dir={} projects={}",
                store.settings().data_dir.display(),
                projects.len()
            );
            for project in projects {
                println!("{}\t{}\t{}", project.filename, project.name, project.last_updated);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=project_scan module=cli status=error error_code={}", err.code());
            eprintln!("scan failed: {err}");
            ExitCode::FAILURE
        }
    }
}
