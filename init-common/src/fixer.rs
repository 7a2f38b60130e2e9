use tracing::{debug, info};

use crate::host::Host;
use crate::policy::try_best_effort;
use crate::profile::ServiceProfile;

/// Hand the profile's owned paths to the service identity.
///
/// Only root can chown, so unprivileged starts skip this entirely. Failures
/// are warnings: the directories may already be correct from a previous run.
pub fn fix_ownership(host: &dyn Host, profile: &ServiceProfile) {
    if !host.is_privileged() {
        debug!("not running as root, leaving ownership unchanged");
        return;
    }

    for owned in &profile.owned_paths {
        let path = owned.path.display();
        if try_best_effort(
            &format!("chown {path}"),
            host.chown(&owned.path, profile.identity),
        )
        .is_some()
        {
            info!(%path, owner = %profile.identity, "ownership fixed");
        }

        if let Some(mode) = owned.mode {
            try_best_effort(
                &format!("chmod {mode:o} {path}"),
                host.chmod(&owned.path, mode),
            );
        }
    }
}
