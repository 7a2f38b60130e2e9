use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

/// What the entrypoint was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Arbitrary command: drop privileges and exec it, nothing else touched.
    Command { program: OsString, args: Vec<OsString> },
    /// The managed server, with the caller's arguments as passthrough flags.
    Server { args: Vec<OsString> },
}

/// Classify the invocation arguments (argv without argv[0]).
///
/// The first argument names an arbitrary command when it is not a flag and
/// is not the server's own name.
pub fn route(args: &[OsString], server_name: &str) -> Route {
    match args.split_first() {
        Some((first, rest)) if is_command(first, server_name) => Route::Command {
            program: first.clone(),
            args: rest.to_vec(),
        },
        _ => Route::Server {
            args: args.to_vec(),
        },
    }
}

fn is_command(arg: &OsStr, server_name: &str) -> bool {
    !arg.as_bytes().starts_with(b"-") && arg != OsStr::new(server_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn no_args_runs_server() {
        assert_eq!(route(&[], "postgres"), Route::Server { args: vec![] });
    }

    #[test]
    fn flag_first_runs_server_with_all_args() {
        assert_eq!(
            route(&args(&["-c", "max_connections=50"]), "postgres"),
            Route::Server {
                args: args(&["-c", "max_connections=50"])
            }
        );
    }

    #[test]
    fn server_name_first_runs_server() {
        assert_eq!(
            route(&args(&["postgres", "-p", "5433"]), "postgres"),
            Route::Server {
                args: args(&["postgres", "-p", "5433"])
            }
        );
    }

    #[test]
    fn other_name_first_is_command() {
        assert_eq!(
            route(&args(&["psql", "-U", "admin"]), "postgres"),
            Route::Command {
                program: "psql".into(),
                args: args(&["-U", "admin"]),
            }
        );
    }

    #[test]
    fn server_path_is_not_the_server_name() {
        let route = route(&args(&["/usr/bin/postgres"]), "postgres");
        assert!(matches!(route, Route::Command { .. }), "route was: {route:?}");
    }

    #[test]
    fn empty_first_argument_is_command() {
        assert_eq!(
            route(&args(&[""]), "postgres"),
            Route::Command {
                program: "".into(),
                args: vec![],
            }
        );
    }
}
