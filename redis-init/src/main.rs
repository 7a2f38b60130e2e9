//! Redis container entrypoint.
//!
//! Runs the same state machine as postgres-init without a bootstrap step:
//! arbitrary commands are exec'd as the redis account; otherwise root sets
//! `vm.overcommit_memory=1` (best-effort), drops to redis and execs
//! `redis-server <config> [args...]`.

mod profile;

use std::ffi::OsString;
use std::process::ExitCode;

use init_common::{Settings, SystemHost, controller, log};

fn main() -> ExitCode {
    log::init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let result = Settings::from_env()
        .and_then(|settings| controller::run(&SystemHost, &profile::redis(&settings), &args));

    match result {
        Ok(never) => match never {},
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
