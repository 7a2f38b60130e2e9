//! PostgreSQL container entrypoint.
//!
//! Startup sequence:
//! 1. `postgres-init <cmd> [args...]` with `<cmd>` not a flag and not
//!    `postgres`: drop to the postgres account and exec `<cmd>`
//! 2. As root: chown the data and socket directories to postgres
//! 3. No `PG_VERSION` in the data directory: run `initdb` as postgres, then
//!    install `postgresql.conf` and `pg_hba.conf`
//! 4. Drop to postgres and exec `postgres -D <data> -c config_file=... [args...]`

mod profile;

use std::ffi::OsString;
use std::process::ExitCode;

use init_common::{Settings, SystemHost, controller, log};

fn main() -> ExitCode {
    log::init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let result = Settings::from_env()
        .and_then(|settings| controller::run(&SystemHost, &profile::postgres(&settings), &args));

    match result {
        Ok(never) => match never {},
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
