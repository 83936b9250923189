//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `userbook_core` linkage and logging bootstrap.
//! - Run a short CRUD scenario and print the resulting stats as JSON.
//!
//! Reads `USERBOOK_LOG_LEVEL` and `USERBOOK_LOG_DIR` from the environment.

use std::process::ExitCode;
use userbook_core::{
    init_logging, InMemoryUserRepository, LogConfig, ServiceError, UserInput, UserService,
};

fn main() -> ExitCode {
    let started = LogConfig::from_env().and_then(|config| init_logging(&config));
    if let Err(err) = started {
        eprintln!("userbook logging disabled: {err}");
    }

    println!("userbook_core version={}", userbook_core::core_version());

    match run_scenario() {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("userbook scenario failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_scenario() -> Result<String, Box<dyn std::error::Error>> {
    let service = UserService::new(InMemoryUserRepository::new());

    let first = service.create_user(&UserInput::new("Ana Ruiz", "ana@example.com", 25))?;
    service.create_user(&UserInput::new("Bo Chen", "bo@example.com", 35))?;
    let third = service.create_user(&UserInput::new("Cy Okafor", "cy@example.com", 44))?;

    let mut edited = third.to_input();
    edited.age = 45;
    service.update_user(third.id, &edited)?;

    match service.create_user(&UserInput::new("", "invalid-email", -5)) {
        Err(ServiceError::Validation(reason)) => log::info!("event=smoke_reject reason={reason:?}"),
        Err(other) => return Err(other.into()),
        Ok(user) => return Err(format!("invalid input accepted as user {}", user.id).into()),
    }

    service.get_user(first.id)?;
    let stats = service.stats();
    Ok(serde_json::to_string_pretty(&stats)?)
}
