use std::ffi::OsString;

use crate::host::ChildExit;

/// Fatal startup errors. Any of these ends the entrypoint with exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("{operation} failed: {detail}")]
    Operation { operation: String, detail: String },

    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed: {command} ({exit})")]
    Command { command: String, exit: ChildExit },

    #[error("failed to exec {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: nix::Error,
    },

    #[error("argument contains a NUL byte: {0:?}")]
    NulByte(OsString),

    #[error("invalid {name}={value:?}: expected {expected}")]
    Setting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type InitResult<T> = Result<T, InitError>;
