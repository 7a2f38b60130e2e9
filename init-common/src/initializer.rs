//! First-boot bootstrap of the data directory.
//!
//! The data directory moves from uninitialized to initialized exactly once.
//! The marker file is the only record of that transition: it is checked for
//! existence only, so a truncated or stale marker still counts as
//! initialized, and nothing verifies that the on-disk format matches the
//! server binary being started.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::info;

use crate::error::{InitError, InitResult};
use crate::host::{Host, format_command};
use crate::policy::{must_succeed, try_best_effort};
use crate::profile::{BootstrapPlan, ServiceProfile};
use crate::settings::TemplatePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initialized,
}

pub fn detect(marker: &Path) -> InitState {
    if marker.exists() {
        InitState::Initialized
    } else {
        InitState::Uninitialized
    }
}

/// Bootstrap the data directory unless its marker already exists.
///
/// Profiles without a bootstrap plan have nothing to initialize.
pub fn ensure_initialized(host: &dyn Host, profile: &ServiceProfile) -> InitResult<()> {
    let (Some(plan), Some(marker)) = (&profile.bootstrap, profile.marker_path()) else {
        return Ok(());
    };

    if detect(&marker) == InitState::Initialized {
        info!(
            data_dir = %profile.data_dir.display(),
            marker = %marker.display(),
            "data directory already initialized, skipping bootstrap"
        );
        return Ok(());
    }

    bootstrap(host, profile, plan)?;
    materialize_templates(host, profile, plan)
}

/// Run the bootstrap tool as the service identity and wait for it.
///
/// As root the child switches identity before exec; otherwise it inherits
/// ours. Any outcome other than exit status 0 is fatal.
fn bootstrap(host: &dyn Host, profile: &ServiceProfile, plan: &BootstrapPlan) -> InitResult<()> {
    let identity = host.is_privileged().then_some(profile.identity);
    let command = format_command(&plan.tool, &plan.args);
    info!(%command, "initializing data directory");

    let exit = host
        .run(&plan.tool, &plan.args, identity)
        .map_err(|source| InitError::Spawn {
            command: command.clone(),
            source,
        })?;
    if !exit.success() {
        return Err(InitError::Command { command, exit });
    }

    info!(data_dir = %profile.data_dir.display(), "data directory initialized");
    Ok(())
}

fn materialize_templates(
    host: &dyn Host,
    profile: &ServiceProfile,
    plan: &BootstrapPlan,
) -> InitResult<()> {
    let privileged = host.is_privileged();

    for template in &plan.templates {
        let destination = profile.template_destination(template);
        let operation = format!(
            "copy {} to {}",
            template.source.display(),
            destination.display()
        );
        let copied = copy_file(&template.source, &destination);
        let copied = match profile.template_policy {
            TemplatePolicy::Required => Some(must_succeed(&operation, copied)?),
            TemplatePolicy::BestEffort => try_best_effort(&operation, copied),
        };
        let Some(bytes) = copied else {
            continue;
        };
        info!(destination = %destination.display(), bytes, "config template installed");

        if privileged {
            try_best_effort(
                &format!("chown {}", destination.display()),
                host.chown(&destination, profile.identity),
            );
        }
    }
    Ok(())
}

fn copy_file(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let mut writer = File::create(destination)?;
    io::copy(&mut reader, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_missing_marker_is_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            detect(&dir.path().join("PG_VERSION")),
            InitState::Uninitialized
        );
    }

    #[test]
    fn detect_marker_present() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("PG_VERSION");
        std::fs::write(&marker, "16\n").unwrap();
        assert_eq!(detect(&marker), InitState::Initialized);
    }

    #[test]
    fn detect_ignores_marker_contents() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("PG_VERSION");
        std::fs::write(&marker, b"\0garbage").unwrap();
        assert_eq!(detect(&marker), InitState::Initialized);
    }

    #[test]
    fn copy_file_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("postgresql.conf");
        let destination = dir.path().join("copy.conf");
        std::fs::write(&source, "listen_addresses = '*'\n").unwrap();

        let bytes = copy_file(&source, &destination).unwrap();
        assert_eq!(bytes, 23);
        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "listen_addresses = '*'\n"
        );
    }

    #[test]
    fn copy_file_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("pg_hba.conf");
        let destination = dir.path().join("dest.conf");
        std::fs::write(&source, "host all all all md5\n").unwrap();
        std::fs::write(&destination, "stale contents that are longer\n").unwrap();

        copy_file(&source, &destination).unwrap();
        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "host all all all md5\n"
        );
    }

    #[test]
    fn copy_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("missing"), &dir.path().join("dest")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dir.path().join("dest").exists());
    }
}
