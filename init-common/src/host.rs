//! Operating-system seam for every privileged or irreversible call.
//!
//! The controller never calls `chown`, `setuid` or `execv` directly, nor
//! writes under `/proc/sys`; it goes through [`Host`] so the call order can
//! be observed in tests. [`SystemHost`] is the real implementation.

use std::convert::Infallible;
use std::ffi::{CStr, CString, OsString};
use std::fmt;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::Path;
use std::process::{Command, ExitStatus};

use nix::unistd::{Gid, Uid};

use crate::profile::Identity;

/// How a supervised child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    Exited(i32),
    Signaled(i32),
}

impl ChildExit {
    pub fn success(self) -> bool {
        self == ChildExit::Exited(0)
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ChildExit::Exited(code),
            None => ChildExit::Signaled(status.signal().unwrap_or_default()),
        }
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildExit::Exited(code) => write!(f, "exit status {code}"),
            ChildExit::Signaled(signal) => write!(f, "killed by signal {signal}"),
        }
    }
}

pub trait Host {
    /// True when the effective uid is root.
    fn is_privileged(&self) -> bool;

    fn chown(&self, path: &Path, owner: Identity) -> nix::Result<()>;

    fn chmod(&self, path: &Path, mode: u32) -> std::io::Result<()>;

    fn set_groups(&self, groups: &[Gid]) -> nix::Result<()>;

    fn set_gid(&self, gid: Gid) -> nix::Result<()>;

    fn set_uid(&self, uid: Uid) -> nix::Result<()>;

    /// Write `value` to a kernel parameter file such as one under `/proc/sys`.
    fn write_tunable(&self, path: &Path, value: &str) -> std::io::Result<()>;

    /// Run `program` as a child and block until it exits.
    ///
    /// With `identity` set, the child switches to it between fork and exec;
    /// the parent keeps its own credentials.
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        identity: Option<Identity>,
    ) -> std::io::Result<ChildExit>;

    /// Replace the current process image. Only ever returns on failure.
    ///
    /// `search_path` resolves `program` through `PATH` like `execvp`.
    fn exec(&self, program: &CStr, argv: &[CString], search_path: bool) -> nix::Result<Infallible>;
}

/// [`Host`] backed by real system calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn is_privileged(&self) -> bool {
        Uid::effective().is_root()
    }

    fn chown(&self, path: &Path, owner: Identity) -> nix::Result<()> {
        nix::unistd::chown(path, Some(owner.uid), Some(owner.gid))
    }

    fn chmod(&self, path: &Path, mode: u32) -> std::io::Result<()> {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    }

    fn set_groups(&self, groups: &[Gid]) -> nix::Result<()> {
        nix::unistd::setgroups(groups)
    }

    fn set_gid(&self, gid: Gid) -> nix::Result<()> {
        nix::unistd::setgid(gid)
    }

    fn set_uid(&self, uid: Uid) -> nix::Result<()> {
        nix::unistd::setuid(uid)
    }

    fn write_tunable(&self, path: &Path, value: &str) -> std::io::Result<()> {
        std::fs::write(path, value)
    }

    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        identity: Option<Identity>,
    ) -> std::io::Result<ChildExit> {
        let mut command = Command::new(program);
        command.args(args);
        // std clears supplementary groups and applies gid before uid in the child.
        if let Some(identity) = identity {
            command.gid(identity.gid.as_raw()).uid(identity.uid.as_raw());
        }
        command.status().map(ChildExit::from)
    }

    fn exec(&self, program: &CStr, argv: &[CString], search_path: bool) -> nix::Result<Infallible> {
        if search_path {
            nix::unistd::execvp(program, argv)
        } else {
            nix::unistd::execv(program, argv)
        }
    }
}

/// Render a program and its arguments for diagnostics.
pub fn format_command(program: &Path, args: &[OsString]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program.to_string_lossy());
    parts.extend(args.iter().map(|arg| arg.to_string_lossy()));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_command_joins_program_and_args() {
        let args: Vec<OsString> = ["-D", "/data", "--no-locale"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(
            format_command(Path::new("/usr/bin/initdb"), &args),
            "/usr/bin/initdb -D /data --no-locale"
        );
    }

    #[test]
    fn child_exit_success_only_for_zero() {
        assert!(ChildExit::Exited(0).success());
        assert!(!ChildExit::Exited(1).success());
        assert!(!ChildExit::Signaled(9).success());
    }

    #[test]
    fn child_exit_from_status() {
        assert_eq!(ChildExit::from(ExitStatus::from_raw(0)), ChildExit::Exited(0));
        assert_eq!(ChildExit::from(ExitStatus::from_raw(3 << 8)), ChildExit::Exited(3));
        assert_eq!(ChildExit::from(ExitStatus::from_raw(9)), ChildExit::Signaled(9));
    }

    #[test]
    fn child_exit_display() {
        assert_eq!(ChildExit::Exited(1).to_string(), "exit status 1");
        assert_eq!(ChildExit::Signaled(15).to_string(), "killed by signal 15");
    }

    #[test]
    fn run_reports_exit_code() {
        let exit = SystemHost
            .run(Path::new("sh"), &["-c".into(), "exit 3".into()], None)
            .unwrap();
        assert_eq!(exit, ChildExit::Exited(3));
    }

    #[test]
    fn run_reports_spawn_failure() {
        let err = SystemHost
            .run(Path::new("/nonexistent/initdb"), &[], None)
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn write_tunable_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overcommit_memory");
        std::fs::write(&path, "0").unwrap();

        SystemHost.write_tunable(&path, "1").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1");
    }
}
