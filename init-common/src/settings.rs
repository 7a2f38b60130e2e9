//! Environment accessors read once at startup.

use std::ffi::OsString;
use std::str::FromStr;

use crate::error::{InitError, InitResult};

/// Tracing filter directive for the entrypoint's own log lines.
pub const LOG_ENV: &str = "DB_INIT_LOG";
pub const TEMPLATE_POLICY_ENV: &str = "DB_INIT_TEMPLATE_POLICY";
pub const AUTH_TRUST_ENV: &str = "DB_INIT_AUTH_TRUST";

/// What happens when a config template cannot be copied into the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplatePolicy {
    /// Warn and keep going; a config file left over in the data directory may suffice.
    #[default]
    BestEffort,
    /// Abort startup.
    Required,
}

impl FromStr for TemplatePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best-effort" => Ok(TemplatePolicy::BestEffort),
            "required" => Ok(TemplatePolicy::Required),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub template_policy: TemplatePolicy,
    /// Pass `-A trust` to the bootstrap tool.
    pub auth_trust: bool,
}

impl Settings {
    pub fn from_env() -> InitResult<Self> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Build settings from an arbitrary variable lookup. Unset or empty means default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> InitResult<Self> {
        let mut settings = Settings::default();

        if let Some(value) = read(&lookup, TEMPLATE_POLICY_ENV, "best-effort or required")? {
            settings.template_policy = value.parse().map_err(|()| InitError::Setting {
                name: TEMPLATE_POLICY_ENV,
                value: value.clone(),
                expected: "best-effort or required",
            })?;
        }

        if let Some(value) = read(&lookup, AUTH_TRUST_ENV, "a boolean")? {
            settings.auth_trust = parse_bool(AUTH_TRUST_ENV, &value)?;
        }

        Ok(settings)
    }
}

fn read(
    lookup: &impl Fn(&str) -> Option<OsString>,
    name: &'static str,
    expected: &'static str,
) -> InitResult<Option<String>> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw.into_string().map(Some).map_err(|raw| InitError::Setting {
            name,
            value: raw.to_string_lossy().into_owned(),
            expected,
        }),
    }
}

fn parse_bool(name: &'static str, value: &str) -> InitResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(InitError::Setting {
            name,
            value: value.to_string(),
            expected: "a boolean",
        }),
    }
}
