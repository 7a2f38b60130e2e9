//! Shared core for the database container entrypoints.
//!
//! Every invocation walks the same linear path:
//! 1. Route: arbitrary command (drop privileges, exec it) or managed server
//! 2. Fix ownership of the data and runtime directories (root only)
//! 3. Apply kernel tunables (root only, best-effort)
//! 4. Bootstrap the data directory once, guarded by a marker file
//! 5. Drop privileges (groups, gid, then uid) and exec the server

pub mod controller;
pub mod error;
pub mod fixer;
pub mod host;
pub mod initializer;
pub mod launcher;
pub mod log;
pub mod policy;
pub mod profile;
pub mod router;
pub mod settings;
pub mod tuning;

pub use error::{InitError, InitResult};
pub use host::{ChildExit, Host, SystemHost};
pub use profile::{
    BootstrapPlan, Identity, KernelTunable, OwnedPath, ServerArgs, ServiceProfile, Template,
};
pub use settings::{Settings, TemplatePolicy};
