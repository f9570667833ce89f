//! Project-wide constants.

use std::path::PathBuf;

/// Name the compute engine registers itself under, in either transport path.
pub const ENGINE_MODULE: &str = "ConduitEngine";

/// Flag passed to an out-of-process engine to ask for its home directory.
pub const HOME_DIR_FLAG: &str = "--home-dir";

/// Diagnostic carried by every `LinkingError`.
pub const LINKING_ERROR: &str = "The compute engine doesn't seem to be linked. Make sure:\n\n\
    - The engine binding is installed\n\
    - You rebuilt the app after installing the binding\n\
    - You are running in a supported execution environment\n";

/// Default database path: `~/.conduit/conduit.db`. Holds the legacy module table.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".conduit").join("conduit.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!ENGINE_MODULE.is_empty());
    }

    #[test]
    fn linking_error_lists_every_cause() {
        assert!(LINKING_ERROR.contains("installed"));
        assert!(LINKING_ERROR.contains("rebuilt"));
        assert!(LINKING_ERROR.contains("supported execution environment"));
    }

    #[test]
    fn default_db_lives_under_dot_conduit() {
        if let Some(path) = default_db_path() {
            assert!(path.ends_with(".conduit/conduit.db"));
        }
    }
}
