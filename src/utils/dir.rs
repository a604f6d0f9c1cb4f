use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const APP_DIR: &str = "timebox";

/// Per-user state directory: `XDG_STATE_HOME`, then `$HOME/.local/state`,
/// then `APPDATA`. `None` when none of them is set.
pub fn state_dir_from<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let mut path = non_empty("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".local/state")))
        .or_else(|| non_empty("APPDATA").map(PathBuf::from))?;
    path.push(APP_DIR);
    Some(path)
}

/// State directory for the current user, falling back to `./timebox`.
pub fn default_state_dir() -> PathBuf {
    state_dir_from(|key| std::env::var(key).ok()).unwrap_or_else(|| PathBuf::from(APP_DIR))
}

pub fn create_state_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create state directory {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn xdg_state_wins_over_home() {
        let dir = state_dir_from(lookup(&[
            ("XDG_STATE_HOME", "/home/a/.state"),
            ("HOME", "/home/a"),
        ]));
        assert_eq!(dir, Some(PathBuf::from("/home/a/.state/timebox")));
    }

    #[test]
    fn home_then_appdata() {
        let dir = state_dir_from(lookup(&[("XDG_STATE_HOME", ""), ("HOME", "/home/a")]));
        assert_eq!(dir, Some(PathBuf::from("/home/a/.local/state/timebox")));

        let dir = state_dir_from(lookup(&[("APPDATA", "C:/Users/a/AppData/Roaming")]));
        assert_eq!(dir, Some(PathBuf::from("C:/Users/a/AppData/Roaming/timebox")));

        assert_eq!(state_dir_from(|_| None), None);
    }

    #[test]
    fn create_is_idempotent() {
        let root = tempdir().unwrap();
        let path = root.path().join("nested/timebox");
        create_state_dir(&path).unwrap();
        create_state_dir(&path).unwrap();
        assert!(path.is_dir());
    }
}
