//! Privilege drop and the final exec.
//!
//! Everything here is one-way: after `drop_privileges` the process cannot
//! regain root, and a successful exec never returns. Any failure on this
//! path is fatal; there is no fallback service.

use std::convert::Infallible;
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

use tracing::{debug, info};

use crate::error::{InitError, InitResult};
use crate::host::Host;
use crate::policy::must_succeed;
use crate::profile::{Identity, ServerArgs, ServiceProfile};

/// Become `identity` if running as root: supplementary groups, then gid, then uid.
///
/// The uid goes last because once it changes the process loses the right to
/// change its groups.
pub fn drop_privileges(host: &dyn Host, identity: Identity) -> InitResult<()> {
    if !host.is_privileged() {
        debug!("not running as root, keeping current identity");
        return Ok(());
    }

    info!(%identity, "dropping privileges");
    must_succeed("setgroups", host.set_groups(&[identity.gid]))?;
    must_succeed("setgid", host.set_gid(identity.gid))?;
    must_succeed("setuid", host.set_uid(identity.uid))?;
    Ok(())
}

/// Argument vector for the managed server, argv[0] included.
///
/// Tokens equal to the server's own name are dropped from the caller's
/// arguments so `entrypoint postgres -p 5433` does not pass `postgres` twice.
pub fn server_argv(profile: &ServiceProfile, caller_args: &[OsString]) -> Vec<OsString> {
    let name = OsStr::new(&profile.server_name);
    let mut passthrough = caller_args
        .iter()
        .filter(|arg| arg.as_os_str() != name)
        .cloned()
        .peekable();

    let mut argv = vec![OsString::from(&profile.server_name)];
    match &profile.server_args {
        ServerArgs::DataDirAndConfig { config_name } => {
            let mut config_file = OsString::from("config_file=");
            config_file.push(profile.data_dir.join(config_name));
            argv.push("-D".into());
            argv.push(profile.data_dir.clone().into_os_string());
            argv.push("-c".into());
            argv.push(config_file);
        }
        ServerArgs::ConfigPositional { default_config } => {
            let config = passthrough
                .next_if(|arg| !arg.as_bytes().starts_with(b"-"))
                .unwrap_or_else(|| default_config.clone().into_os_string());
            argv.push(config);
        }
    }
    argv.extend(passthrough);
    argv
}

/// Drop privileges and replace this process with the managed server.
pub fn launch_server(
    host: &dyn Host,
    profile: &ServiceProfile,
    caller_args: &[OsString],
) -> InitResult<Infallible> {
    drop_privileges(host, profile.identity)?;

    let argv = server_argv(profile, caller_args);
    info!(
        program = %profile.server_bin.display(),
        args = ?argv,
        "starting server"
    );
    exec(host, profile.server_bin.as_os_str(), &argv, false)
}

/// Drop privileges and replace this process with an arbitrary command from `PATH`.
pub fn launch_command(
    host: &dyn Host,
    identity: Identity,
    program: &OsStr,
    args: &[OsString],
) -> InitResult<Infallible> {
    drop_privileges(host, identity)?;

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(program.to_os_string());
    argv.extend_from_slice(args);
    info!(program = %program.to_string_lossy(), "running command");
    exec(host, program, &argv, true)
}

fn exec(
    host: &dyn Host,
    program: &OsStr,
    argv: &[OsString],
    search_path: bool,
) -> InitResult<Infallible> {
    let program_c = to_cstring(program)?;
    let argv_c = argv
        .iter()
        .map(|arg| to_cstring(arg.as_os_str()))
        .collect::<InitResult<Vec<_>>>()?;

    host.exec(&program_c, &argv_c, search_path)
        .map_err(|source| InitError::Exec {
            program: program.to_string_lossy().into_owned(),
            source,
        })
}

fn to_cstring(arg: &OsStr) -> InitResult<CString> {
    CString::new(arg.as_bytes()).map_err(|_| InitError::NulByte(arg.to_os_string()))
}
