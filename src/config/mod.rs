#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::task::list::Variant;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub variant: Variant,
    pub glyphs: GlyphStyle,
    pub tint_rows: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Tinted,
            glyphs: GlyphStyle::Unicode,
            tint_rows: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    #[default]
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Empty disables logging.
    pub file: String,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: String::new(),
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
}

pub fn default_paths() -> anyhow::Result<ConfigPaths> {
    let unix = home_config_path_unix();
    if !cfg!(windows) {
        return Ok(ConfigPaths { config_file: unix });
    }

    // Windows: prefer the Unix-style path if present for portability.
    if unix.exists() {
        return Ok(ConfigPaths { config_file: unix });
    }

    let proj = ProjectDirs::from("com", "tinttodo", "tinttodo")
        .context("failed to determine platform config directory")?;
    Ok(ConfigPaths {
        config_file: proj.config_dir().join("config.toml"),
    })
}

fn home_config_path_unix() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("tinttodo").join("config.toml")
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expands a leading `~` or `~/`. Other forms (`~user`) are left alone.
#[must_use]
pub fn expand_tilde(input: &str) -> String {
    let Some(rest) = input.strip_prefix('~') else {
        return input.to_owned();
    };
    match (rest.strip_prefix('/'), home_dir()) {
        (Some(tail), Some(home)) => home.join(tail).to_string_lossy().into_owned(),
        (None, Some(home)) if rest.is_empty() => home.to_string_lossy().into_owned(),
        _ => input.to_owned(),
    }
}

pub fn expand_path(input: &str) -> anyhow::Result<PathBuf> {
    let expanded = expand_env_vars(&expand_tilde(input));
    let p = PathBuf::from(expanded);
    if p.is_absolute() {
        return Ok(p);
    }
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join(p))
}

fn expand_env_vars(input: &str) -> String {
    // Expand $VAR and ${VAR}. Leave unknown vars untouched.
    let Ok(re) = regex::Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?") else {
        return input.to_owned();
    };
    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        std::env::var(key).unwrap_or_else(|_| caps[0].to_owned())
    })
    .to_string()
}

pub fn load() -> anyhow::Result<(Config, ConfigPaths)> {
    let paths = default_paths()?;
    let (_doc, cfg) = load_from_file(&paths.config_file)?;
    cfg.validate()?;
    Ok((cfg, paths))
}

pub fn list_resolved_toml() -> anyhow::Result<String> {
    let (cfg, _paths) = load()?;
    Ok(toml::to_string_pretty(&cfg)?)
}

pub fn get_value_string(key: &str) -> anyhow::Result<Option<String>> {
    let paths = default_paths()?;
    get_value_string_at_path(&paths.config_file, key)
}

pub fn set_value_string(key: &str, value: &str) -> anyhow::Result<()> {
    let paths = default_paths()?;
    set_value_string_at_path(&paths.config_file, key, value)
}

fn load_from_file(path: &Path) -> anyhow::Result<(toml_edit::DocumentMut, Config)> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok((toml_edit::DocumentMut::new(), Config::default()));
        }
        Err(source) => {
            return Err(TodoError::IoPath {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };

    let doc: toml_edit::DocumentMut = raw
        .parse()
        .map_err(|e| TodoError::Config(format!("{}: {e}", path.display())))?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| TodoError::Config(format!("{}: {e}", path.display())))?;
    Ok((doc, cfg))
}

pub fn get_value_string_at_path(path: &Path, key: &str) -> anyhow::Result<Option<String>> {
    let (_doc, cfg) = load_from_file(path)?;
    cfg.validate()?;
    lookup_value(&cfg, key.trim())
}

pub fn set_value_string_at_path(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let (mut doc, cfg) = load_from_file(path)?;
    cfg.validate()?;

    let key = key.trim();
    let item = parse_value_for_key(key, value)?;
    apply_set(&mut doc, key, item)?;

    // Validate by re-parsing the updated doc into a Config.
    let new_raw = doc.to_string();
    let new_cfg: Config = toml::from_str(&new_raw)
        .with_context(|| format!("config update produced invalid TOML for {}", path.display()))?;
    new_cfg.validate()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| TodoError::IoPath {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, new_raw.as_bytes()).map_err(|source| TodoError::IoPath {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

impl Config {
    pub fn validate(&self) -> Result<(), TodoError> {
        if self.log.level.trim().is_empty() {
            return Err(TodoError::Config("log.level must not be empty".to_owned()));
        }
        if !self.log.file.trim().is_empty()
            && tracing_subscriber::EnvFilter::try_new(self.log.level.trim()).is_err()
        {
            return Err(TodoError::Config(format!(
                "log.level '{}' is not a valid filter directive",
                self.log.level
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyType {
    Bool,
    String,
    Enum(&'static [&'static str]),
}

fn key_type(key: &str) -> Option<KeyType> {
    Some(match key {
        "log.file" | "log.level" => KeyType::String,
        "ui.tint_rows" => KeyType::Bool,
        "ui.variant" => KeyType::Enum(&["tinted", "plain"]),
        "ui.glyphs" => KeyType::Enum(&["unicode", "ascii"]),
        _ => return None,
    })
}

fn parse_value_for_key(key: &str, value: &str) -> anyhow::Result<toml_edit::Item> {
    let kt = key_type(key).ok_or_else(|| TodoError::InvalidConfigKey(key.to_owned()))?;
    let item = match kt {
        KeyType::Bool => toml_edit::value(parse_bool(value).map_err(|msg| {
            TodoError::InvalidConfigValue {
                key: key.to_owned(),
                msg,
            }
        })?),
        KeyType::String => toml_edit::value(value),
        KeyType::Enum(allowed) => {
            let v = value.trim();
            if !allowed.contains(&v) {
                return Err(TodoError::InvalidConfigValue {
                    key: key.to_owned(),
                    msg: format!("must be one of: {}", allowed.join(", ")),
                }
                .into());
            }
            toml_edit::value(v)
        }
    };
    Ok(item)
}

fn parse_bool(s: &str) -> Result<bool, String> {
    let s = s.trim();
    s.parse::<bool>()
        .map_err(|_| format!("expected true|false, got '{s}'"))
}

fn apply_set(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: toml_edit::Item,
) -> anyhow::Result<()> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((leaf, tables)) = parts.split_last() else {
        return Err(TodoError::InvalidConfigKey(key.to_owned()).into());
    };

    let mut cur = doc.as_table_mut();
    for &seg in tables {
        if !cur.contains_key(seg) {
            let mut t = toml_edit::Table::new();
            t.set_implicit(true);
            cur.insert(seg, toml_edit::Item::Table(t));
        }
        cur = cur[seg].as_table_mut().ok_or_else(|| {
            TodoError::Config(format!("cannot set {key}: '{seg}' is not a table"))
        })?;
    }

    cur.insert(leaf, value);
    Ok(())
}

/// Prints a single key as a bare value, or a whole table as TOML.
fn lookup_value(cfg: &Config, key: &str) -> anyhow::Result<Option<String>> {
    let value = match key {
        "ui" => toml::to_string_pretty(&cfg.ui)?.trim_end().to_owned(),
        "log" => toml::to_string_pretty(&cfg.log)?.trim_end().to_owned(),
        "ui.variant" => match cfg.ui.variant {
            Variant::Plain => "plain",
            Variant::Tinted => "tinted",
        }
        .to_owned(),
        "ui.glyphs" => match cfg.ui.glyphs {
            GlyphStyle::Unicode => "unicode",
            GlyphStyle::Ascii => "ascii",
        }
        .to_owned(),
        "ui.tint_rows" => cfg.ui.tint_rows.to_string(),
        "log.file" => cfg.log.file.clone(),
        "log.level" => cfg.log.level.clone(),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
        assert_eq!(Config::default().ui.variant, Variant::Tinted);
    }

    #[test]
    fn config_validation_catches_invalid_values() {
        let mut cfg = Config::default();
        cfg.log.level = "  ".to_owned();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.log.file = "/tmp/tinttodo.log".to_owned();
        cfg.log.level = "tinttodo=loud".to_owned();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_set_and_get_dot_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(
            get_value_string_at_path(&path, "ui.variant")
                .unwrap()
                .as_deref(),
            Some("tinted")
        );

        set_value_string_at_path(&path, "ui.variant", "plain").unwrap();
        set_value_string_at_path(&path, "ui.tint_rows", "false").unwrap();
        set_value_string_at_path(&path, "log.file", "~/tinttodo.log").unwrap();

        assert_eq!(
            get_value_string_at_path(&path, "ui.tint_rows")
                .unwrap()
                .as_deref(),
            Some("false")
        );
        assert_eq!(
            get_value_string_at_path(&path, "log.file")
                .unwrap()
                .as_deref(),
            Some("~/tinttodo.log")
        );
        assert_eq!(get_value_string_at_path(&path, "ui.nope").unwrap(), None);

        let table = get_value_string_at_path(&path, "ui").unwrap().unwrap();
        assert!(table.contains("variant = \"plain\""));
        assert!(table.contains("tint_rows = false"));

        let (_doc, cfg) = load_from_file(&path).unwrap();
        assert_eq!(cfg.ui.variant, Variant::Plain);
        assert!(!cfg.ui.tint_rows);
        assert_eq!(cfg.ui.glyphs, GlyphStyle::Unicode);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let err = set_value_string_at_path(&path, "ui.theme", "dark").unwrap_err();
        assert!(err.to_string().contains("invalid config key"));

        let err = set_value_string_at_path(&path, "ui.variant", "neon").unwrap_err();
        assert!(err.to_string().contains("must be one of"));

        let err = set_value_string_at_path(&path, "ui.tint_rows", "yes").unwrap_err();
        assert!(err.to_string().contains("expected true|false"));

        assert!(!path.exists());
    }

    #[test]
    fn set_preserves_comments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# my settings\n[ui]\nglyphs = \"ascii\" # terminals\n").unwrap();

        set_value_string_at_path(&path, "ui.variant", "plain").unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("# my settings"));
        assert!(raw.contains("# terminals"));

        let (_doc, cfg) = load_from_file(&path).unwrap();
        assert_eq!(cfg.ui.glyphs, GlyphStyle::Ascii);
        assert_eq!(cfg.ui.variant, Variant::Plain);
    }

    #[test]
    fn expands_only_leading_tilde() {
        assert_eq!(expand_tilde("/var/log/x.log"), "/var/log/x.log");
        assert_eq!(expand_tilde("~alice/x.log"), "~alice/x.log");
        if let Some(home) = home_dir() {
            assert_eq!(
                expand_tilde("~/logs/x.log"),
                home.join("logs/x.log").to_string_lossy()
            );
            assert_eq!(expand_tilde("~"), home.to_string_lossy());
        }
    }

    #[test]
    fn expands_env_vars_in_paths() {
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(expand_env_vars("$PATH"), path);
        }
        assert_eq!(
            expand_env_vars("${TINTTODO_SURELY_UNSET_VAR}/x"),
            "${TINTTODO_SURELY_UNSET_VAR}/x"
        );
    }
}
