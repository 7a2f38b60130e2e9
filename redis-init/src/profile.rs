use init_common::{Identity, KernelTunable, OwnedPath, ServerArgs, ServiceProfile, Settings};

const REDIS_UID: u32 = 999;
const REDIS_GID: u32 = 999;
const REDIS_BIN: &str = "/usr/bin/redis-server";
const REDIS_DATA: &str = "/data";
const REDIS_CONFIG: &str = "/usr/local/etc/redis/redis.conf";
const OVERCOMMIT_MEMORY: &str = "/proc/sys/vm/overcommit_memory";

pub fn redis(settings: &Settings) -> ServiceProfile {
    ServiceProfile {
        identity: Identity::from_raw(REDIS_UID, REDIS_GID),
        server_name: "redis-server".into(),
        server_bin: REDIS_BIN.into(),
        data_dir: REDIS_DATA.into(),
        owned_paths: vec![OwnedPath {
            path: REDIS_DATA.into(),
            mode: None,
        }],
        // Background saves fork; without overcommit they can fail under memory pressure.
        tunables: vec![KernelTunable {
            path: OVERCOMMIT_MEMORY.into(),
            value: "1".into(),
        }],
        bootstrap: None,
        server_args: ServerArgs::ConfigPositional {
            default_config: REDIS_CONFIG.into(),
        },
        template_policy: settings.template_policy,
    }
}
