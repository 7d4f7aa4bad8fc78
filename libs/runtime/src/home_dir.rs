use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Turn a configured home directory into an absolute path.
///
/// - `None` (or blank) → `<user home>/<default_subdir>`
/// - `~` / `~/x` → expanded against the user home
/// - relative paths → joined onto the current directory
///
/// With `create`, the directory is created if it does not exist yet.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().context("cannot determine the user home directory");

    let path = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some("~") => user_home()?,
        Some(p) if p.starts_with("~/") || p.starts_with("~\\") => user_home()?.join(&p[2..]),
        Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
        Some(p) => std::env::current_dir()
            .context("cannot read the current directory")?
            .join(p),
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    } else if path.exists() && !path.is_dir() {
        bail!("home dir {} exists and is not a directory", path.display());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a/b");
        let out = resolve_home_dir(Some(target.to_string_lossy().into()), ".x", true).unwrap();
        assert_eq!(out, target);
        assert!(target.is_dir());
    }

    #[test]
    fn tilde_expands_against_user_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let out = resolve_home_dir(Some("~/.md_test_tilde".into()), ".x", false).unwrap();
        assert_eq!(out, home.join(".md_test_tilde"));
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        assert!(resolve_home_dir(Some(file.to_string_lossy().into()), ".x", false).is_err());
    }
}
