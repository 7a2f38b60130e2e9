use tracing::info;

use crate::host::Host;
use crate::policy::try_best_effort;
use crate::profile::KernelTunable;

/// Write kernel tunables when running as root.
///
/// A read-only `/proc` or a missing capability only costs the tuning; the
/// server still runs with kernel defaults.
pub fn apply_tunables(host: &dyn Host, tunables: &[KernelTunable]) {
    if tunables.is_empty() {
        return;
    }
    if !host.is_privileged() {
        info!("not running as root, skipping kernel tuning");
        return;
    }

    for tunable in tunables {
        let path = tunable.path.display();
        if try_best_effort(
            &format!("write {path}"),
            host.write_tunable(&tunable.path, &tunable.value),
        )
        .is_some()
        {
            info!(%path, value = %tunable.value, "kernel parameter set");
        }
    }
}
