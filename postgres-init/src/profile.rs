use std::ffi::OsString;

use init_common::{
    BootstrapPlan, Identity, OwnedPath, ServerArgs, ServiceProfile, Settings, Template,
};

const PG_UID: u32 = 999;
const PG_GID: u32 = 999;
const PG_DATA: &str = "/var/lib/postgresql/data";
const PG_BIN: &str = "/usr/bin/postgres";
const INITDB_BIN: &str = "/usr/bin/initdb";
const SOCKET_DIR: &str = "/var/run/postgresql";
const SOCKET_DIR_MODE: u32 = 0o775;
const TEMPLATE_DIR: &str = "/usr/local/etc/postgres";
const MARKER: &str = "PG_VERSION";
const CONFIG_NAME: &str = "postgresql.conf";
const HBA_NAME: &str = "pg_hba.conf";

pub fn postgres(settings: &Settings) -> ServiceProfile {
    ServiceProfile {
        identity: Identity::from_raw(PG_UID, PG_GID),
        server_name: "postgres".into(),
        server_bin: PG_BIN.into(),
        data_dir: PG_DATA.into(),
        owned_paths: vec![
            OwnedPath {
                path: PG_DATA.into(),
                mode: None,
            },
            OwnedPath {
                path: SOCKET_DIR.into(),
                mode: Some(SOCKET_DIR_MODE),
            },
        ],
        tunables: Vec::new(),
        bootstrap: Some(BootstrapPlan {
            marker: MARKER.into(),
            tool: INITDB_BIN.into(),
            args: initdb_args(settings.auth_trust),
            templates: [CONFIG_NAME, HBA_NAME]
                .into_iter()
                .map(|name| Template {
                    source: format!("{TEMPLATE_DIR}/{name}").into(),
                    file_name: name.into(),
                })
                .collect(),
        }),
        server_args: ServerArgs::DataDirAndConfig {
            config_name: CONFIG_NAME.into(),
        },
        template_policy: settings.template_policy,
    }
}

fn initdb_args(auth_trust: bool) -> Vec<OsString> {
    let mut args = vec!["-D", PG_DATA, "-E", "UTF8", "--no-locale"];
    if auth_trust {
        args.extend(["-A", "trust"]);
    }
    args.into_iter().map(OsString::from).collect()
}
