use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub no_autosave: bool,
    pub save_url: Option<String>,
    pub title: Option<String>,
    pub quiet_ms: Option<u64>,
    pub out: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            no_autosave: self.no_autosave || other.no_autosave,
            save_url: other.save_url.clone().or_else(|| self.save_url.clone()),
            title: other.title.clone().or_else(|| self.title.clone()),
            quiet_ms: other.quiet_ms.or(self.quiet_ms),
            out: other.out.clone().or_else(|| self.out.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("notedown").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("notedown")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("notedown").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("notedown").join("config");
        }
    }

    PathBuf::from(".notedownrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".notedownrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# notedown defaults (saved with --save)".to_string());
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if flags.no_autosave {
        lines.push("--no-autosave".to_string());
    }
    if let Some(url) = &flags.save_url {
        lines.push(format!("--save-url {url}"));
    }
    if let Some(title) = &flags.title {
        lines.push(format!("--title {title}"));
    }
    if let Some(quiet_ms) = flags.quiet_ms {
        lines.push(format!("--quiet-ms {quiet_ms}"));
    }
    if let Some(out) = &flags.out {
        lines.push(format!("--out {}", out.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--watch" {
            flags.watch = true;
        } else if token == "--no-autosave" {
            flags.no_autosave = true;
        } else if token == "--save-url" {
            if let Some(next) = tokens.get(i + 1) {
                flags.save_url = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--save-url=") {
            flags.save_url = Some(value.to_string());
        } else if token == "--title" {
            if let Some(next) = tokens.get(i + 1) {
                flags.title = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--title=") {
            flags.title = Some(value.to_string());
        } else if token == "--quiet-ms" {
            if let Some(next) = tokens.get(i + 1) {
                flags.quiet_ms = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--quiet-ms=") {
            flags.quiet_ms = value.parse().ok();
        } else if token == "--out" {
            if let Some(next) = tokens.get(i + 1) {
                flags.out = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--out=") {
            flags.out = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "notedown".to_string(),
            "--watch".to_string(),
            "--save-url".to_string(),
            "http://localhost:5000/notes/3/edit".to_string(),
            "--quiet-ms=2000".to_string(),
            "--out=preview.html".to_string(),
            "note.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.watch);
        assert_eq!(
            flags.save_url,
            Some("http://localhost:5000/notes/3/edit".to_string())
        );
        assert_eq!(flags.quiet_ms, Some(2000));
        assert_eq!(flags.out, Some(PathBuf::from("preview.html")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_interval() {
        let args = vec!["--quiet-ms".to_string(), "soon".to_string()];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.quiet_ms, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            watch: true,
            save_url: Some("http://example.com/a".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_autosave: true,
            save_url: Some("http://example.com/b".to_string()),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.watch);
        assert!(merged.no_autosave);
        assert_eq!(merged.save_url, Some("http://example.com/b".to_string()));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".notedownrc");
        let flags = ConfigFlags {
            watch: true,
            no_autosave: true,
            save_url: Some("http://localhost:5000/notes/new".to_string()),
            title: Some("journal".to_string()),
            quiet_ms: Some(1500),
            out: Some(PathBuf::from("preview.html")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}
