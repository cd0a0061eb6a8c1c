//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `staffing_core` linkage.
//! - Open the configured database and report record counts.
//! - Keep output deterministic for quick local sanity checks.

use log::info;
use staffing_core::{
    AssignmentScope, CoreConfig, EmployeeScope, SqliteAssignmentRepository,
    SqliteEmployeeRepository, SqliteStoreRepository, StoreScope,
};
use staffing_core::{AssignmentRepository, EmployeeRepository, StoreRepository};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("staffing_core ping={}", staffing_core::ping());
    println!("staffing_core version={}", staffing_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    let file_logging = staffing_core::init_logging(&config)?;
    println!("logging file_output={file_logging} level={}", config.log_level);

    let conn = config.open_db()?;
    let stores = SqliteStoreRepository::try_new(&conn)?;
    let employees = SqliteEmployeeRepository::try_new(&conn)?;
    let assignments = SqliteAssignmentRepository::try_new(&conn)?;

    let store_count = stores.list_stores(&StoreScope::all())?.len();
    let active_store_count = stores.list_stores(&StoreScope::all().active())?.len();
    let employee_count = employees.list_employees(&EmployeeScope::all())?.len();
    let unassigned_count = employees
        .list_employees(&EmployeeScope::all().active().unassigned())?
        .len();
    let current_count = assignments
        .list_assignments(&AssignmentScope::all().current())?
        .len();

    info!(
        "event=cli_summary module=cli status=ok stores={store_count} employees={employee_count} current_assignments={current_count}"
    );
    println!("stores total={store_count} active={active_store_count}");
    println!("employees total={employee_count} active_unassigned={unassigned_count}");
    println!("assignments current={current_count}");
    Ok(())
}
