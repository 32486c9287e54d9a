//! Path helpers for config and dataset files

use std::path::{Path, PathBuf};

use crate::core::constants::SQLITE_FILE_EXTENSION;

/// Expand a path string to an absolute path.
///
/// Handles `~` and `~/path` via the home directory, and resolves relative
/// paths against the current working directory. Absolute paths pass through.
///
/// ```text
/// expand_path("~/.wells")  // -> /home/user/.wells
/// expand_path("./data")    // -> /current/dir/./data
/// expand_path("/srv/data") // -> /srv/data
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// `sqlite://{dir}/{slug}.db`
pub fn sqlite_url(dir: &Path, slug: &str) -> String {
    let file = dir.join(format!("{}.{}", slug, SQLITE_FILE_EXTENSION));
    format!("sqlite://{}", file.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute_unix() {
        let result = expand_path("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_path_relative() {
        let result = expand_path("./data");
        assert!(result.is_absolute());
        assert!(result.ends_with("data"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/.wells");
        assert!(result.is_absolute());
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".wells"));
    }

    #[test]
    fn test_expand_path_trims_whitespace() {
        let result = expand_path("  /path/to/dir  ");
        assert_eq!(result, PathBuf::from("/path/to/dir"));
    }

    #[test]
    fn test_sqlite_url() {
        assert_eq!(
            sqlite_url(Path::new("/srv/wells"), "nova-scotia"),
            "sqlite:///srv/wells/nova-scotia.db"
        );
    }
}
