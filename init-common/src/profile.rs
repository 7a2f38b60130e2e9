//! Fixed identity and paths a service variant runs with.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use nix::unistd::{Gid, Uid};

use crate::settings::TemplatePolicy;

/// The unprivileged account the server ultimately runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub uid: Uid,
    pub gid: Gid,
}

impl Identity {
    pub fn from_raw(uid: u32, gid: u32) -> Self {
        Self {
            uid: Uid::from_raw(uid),
            gid: Gid::from_raw(gid),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

/// A path whose owner (and optionally mode) is corrected on privileged start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPath {
    pub path: PathBuf,
    pub mode: Option<u32>,
}

/// Config file copied into the data directory after the first bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub source: PathBuf,
    pub file_name: String,
}

/// First-boot plan: the marker that proves initialization and the tool that creates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPlan {
    /// File name directly under the data directory. Existence only.
    pub marker: String,
    pub tool: PathBuf,
    pub args: Vec<OsString>,
    pub templates: Vec<Template>,
}

/// How the server's argument vector is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerArgs {
    /// `<name> -D <data-dir> -c config_file=<data-dir>/<config_name> [args...]`
    DataDirAndConfig { config_name: String },
    /// `<name> <config> [args...]`; a leading non-flag argument overrides the config.
    ConfigPositional { default_config: PathBuf },
}

/// A kernel parameter written through `/proc/sys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelTunable {
    pub path: PathBuf,
    pub value: String,
}

/// Everything the controller needs to know about one service variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProfile {
    pub identity: Identity,
    /// Name used as argv[0] and recognized by the router.
    pub server_name: String,
    pub server_bin: PathBuf,
    pub data_dir: PathBuf,
    pub owned_paths: Vec<OwnedPath>,
    pub tunables: Vec<KernelTunable>,
    pub bootstrap: Option<BootstrapPlan>,
    pub server_args: ServerArgs,
    pub template_policy: TemplatePolicy,
}

impl ServiceProfile {
    pub fn marker_path(&self) -> Option<PathBuf> {
        self.bootstrap
            .as_ref()
            .map(|plan| self.data_dir.join(&plan.marker))
    }

    pub fn template_destination(&self, template: &Template) -> PathBuf {
        self.data_dir.join(&template.file_name)
    }
}
