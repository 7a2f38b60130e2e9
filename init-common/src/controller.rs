use std::convert::Infallible;
use std::ffi::OsString;

use tracing::info;

use crate::error::InitResult;
use crate::host::Host;
use crate::profile::ServiceProfile;
use crate::router::{Route, route};
use crate::{fixer, initializer, launcher, tuning};

/// Run one entrypoint invocation to the final exec.
///
/// `args` is argv without argv[0]. Only returns on failure; the caller
/// should report the error and exit 1.
pub fn run(
    host: &dyn Host,
    profile: &ServiceProfile,
    args: &[OsString],
) -> InitResult<Infallible> {
    match route(args, &profile.server_name) {
        Route::Command { program, args } => {
            info!(
                program = %program.to_string_lossy(),
                "arbitrary command requested, skipping initialization"
            );
            launcher::launch_command(host, profile.identity, &program, &args)
        }
        Route::Server { args } => {
            fixer::fix_ownership(host, profile);
            tuning::apply_tunables(host, &profile.tunables);
            initializer::ensure_initialized(host, profile)?;
            launcher::launch_server(host, profile, &args)
        }
    }
}
