//! User defaults for the `inimap` binary.
//!
//! Read from `$XDG_CONFIG_HOME/inimap/inimap.ini` (or
//! `~/.config/inimap/inimap.ini`) through the crate's own mapper:
//!
//! ```ini
//! [defaults]
//! encoding=latin1
//! line_ending=crlf
//! quote_policy=strip
//! ```
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::document::{LineEnding, QuotePolicy};
use crate::encoding::TextEncoding;
use crate::mapper::{Field, IniSchema, MapperOptions, Schema, Serializer, TracingSink};

/// Name of the defaults file inside the config directory.
pub const FILE_NAME: &str = "inimap.ini";

/// The `[defaults]` section. Empty values mean "built-in default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Encoding label, e.g. `utf8` or `latin1`.
    pub encoding: String,
    /// `lf` or `crlf`.
    pub line_ending: String,
    /// `preserve`, `strip` or `force`.
    pub quote_policy: String,
}

impl IniSchema for Defaults {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field(Field::scalar(
                "encoding",
                "encoding",
                |d: &Self| d.encoding.clone(),
                |d, v| d.encoding = v,
            ))
            .field(Field::scalar(
                "line_ending",
                "line_ending",
                |d: &Self| d.line_ending.clone(),
                |d, v| d.line_ending = v,
            ))
            .field(Field::scalar(
                "quote_policy",
                "quote_policy",
                |d: &Self| d.quote_policy.clone(),
                |d, v| d.quote_policy = v,
            ))
    }
}

/// Contents of the defaults file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Values from the `[defaults]` section.
    pub defaults: Defaults,
}

impl IniSchema for Settings {
    fn schema() -> Schema<Self> {
        Schema::new()
            .handle_quoted_values(true)
            .field(Field::section(
                "defaults",
                "defaults",
                |s: &Self| &s.defaults,
                |s| &mut s.defaults,
            ))
    }
}

impl Settings {
    /// Default location of the settings file, if a home directory is known.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path(
            std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
            std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()
                .as_deref(),
        )
    }

    /// Load from [`Settings::path`]. A missing file yields the defaults.
    #[must_use]
    pub fn load() -> Self {
        Self::path().map_or_else(Self::default, |path| Self::load_from(&path))
    }

    /// Load from `path`. A missing or unreadable file yields the defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        if !path.is_file() {
            tracing::debug!("no settings file at {}", path.display());
            return Self::default();
        }
        match Serializer::<Self>::new() {
            Ok(serializer) => {
                tracing::debug!("reading settings from {}", path.display());
                serializer
                    .with_options(MapperOptions::default().with_encoding(TextEncoding::Utf8))
                    .with_sink(TracingSink)
                    .from_ini_file(path)
            }
            Err(e) => {
                tracing::warn!("{e}");
                Self::default()
            }
        }
    }

    /// Configured default encoding.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        resolve(&self.defaults.encoding, "encoding", |s| s.parse().ok())
    }

    /// Configured default line ending.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        resolve(&self.defaults.line_ending, "line_ending", |s| {
            LineEnding::from_str(s, true).ok()
        })
    }

    /// Configured default quote policy.
    #[must_use]
    pub fn quote_policy(&self) -> QuotePolicy {
        resolve(&self.defaults.quote_policy, "quote_policy", |s| {
            QuotePolicy::from_str(s, true).ok()
        })
    }
}

fn config_path(xdg_config_home: Option<&str>, home: Option<&str>) -> Option<PathBuf> {
    let base = match (xdg_config_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".config"),
        _ => return None,
    };
    Some(base.join("inimap").join(FILE_NAME))
}

fn resolve<V: Default>(raw: &str, key: &str, parse: impl FnOnce(&str) -> Option<V>) -> V {
    let raw = raw.trim();
    if raw.is_empty() {
        return V::default();
    }
    parse(raw).unwrap_or_else(|| {
        tracing::warn!("settings: unrecognised {key} '{raw}', using the built-in default");
        V::default()
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn xdg_config_home_wins() {
        let path = config_path(Some("/xdg"), Some("/home/me")).unwrap();
        assert_eq!(path, Path::new("/xdg/inimap/inimap.ini"));
    }

    #[test]
    fn falls_back_to_home_dot_config() {
        let path = config_path(Some(""), Some("/home/me")).unwrap();
        assert_eq!(path, Path::new("/home/me/.config/inimap/inimap.ini"));
        assert!(config_path(None, None).is_none());
    }

    #[test]
    fn missing_file_gives_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.ini"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.encoding(), TextEncoding::Utf8);
        assert_eq!(settings.line_ending(), LineEnding::Lf);
        assert_eq!(settings.quote_policy(), QuotePolicy::Preserve);
    }

    #[test]
    fn reads_defaults_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(
            &path,
            "[Defaults]\nEncoding=ISO-8859-1\nline_ending=\"CRLF\"\nquote_policy=force\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.encoding(), TextEncoding::Latin1);
        assert_eq!(settings.line_ending(), LineEnding::CrLf);
        assert_eq!(settings.quote_policy(), QuotePolicy::Force);
    }

    #[test]
    fn unknown_values_fall_back() {
        let settings = Settings {
            defaults: Defaults {
                encoding: "ebcdic".to_string(),
                line_ending: "cr".to_string(),
                quote_policy: String::new(),
            },
        };
        assert_eq!(settings.encoding(), TextEncoding::Utf8);
        assert_eq!(settings.line_ending(), LineEnding::Lf);
        assert_eq!(settings.quote_policy(), QuotePolicy::Preserve);
    }
}
