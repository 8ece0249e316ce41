// chatveil/src/utils/paths.rs
//! Default locations of the user's chatveil files.

use std::path::PathBuf;

const APP_DIR: &str = "chatveil";

/// `<config dir>/chatveil`, e.g. `~/.config/chatveil` on Linux.
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// An existing file named `name` in the app config directory.
pub fn default_file(name: &str) -> Option<PathBuf> {
    app_config_dir().map(|d| d.join(name)).filter(|p| p.is_file())
}

/// Explicit path if given, otherwise the default file if it exists.
pub fn resolve(explicit: Option<&PathBuf>, default_name: &str) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.clone()),
        None => default_file(default_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/list.txt");
        assert_eq!(resolve(Some(&explicit), "filter.txt"), Some(explicit));
    }

    #[test]
    fn test_missing_default_is_none() {
        assert_eq!(resolve(None, "no-such-file-for-chatveil.txt"), None);
    }
}
