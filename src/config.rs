//! Application configuration management.
//!
//! Configuration is layered with figment:
//!
//! 1. Built-in defaults
//! 2. The JSON config file (`~/.clean_files` unless `--config-file` is given)
//! 3. Environment variables prefixed `CLEAN_FILES_`
//!
//! Missing fields fall back to the lower layers and unknown fields are
//! ignored. The raw [`Config`] is then validated into immutable
//! [`Settings`] that the rules consume.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the per-user config file in the home directory.
pub const CONFIG_FILE_NAME: &str = ".clean_files";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CLEAN_FILES_";

/// Errors while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// The config could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// `permissions` is not an octal mode.
    #[error("invalid permissions '{0}': expected an octal mode such as \"644\"")]
    InvalidPermissions(String),

    /// An entry of `forbidden_characters` is not exactly one character.
    #[error("invalid forbidden character '{0}': expected exactly one character")]
    InvalidForbiddenCharacter(String),

    /// The replacement string contains a forbidden character.
    #[error("default character '{0}' contains a forbidden character")]
    ForbiddenReplacement(String),
}

/// Raw configuration record, as stored in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target permission bits as an octal string
    #[serde(deserialize_with = "deserialize_octal")]
    pub permissions: String,
    /// Name suffixes that mark a file as temporary
    pub temporary_suffixes: Vec<String>,
    /// Characters not allowed in file names
    pub forbidden_characters: Vec<String>,
    /// Replacement for each forbidden character
    pub default_character: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            permissions: "644".to_string(),
            temporary_suffixes: vec!["~".to_string(), ".tmp".to_string()],
            forbidden_characters: [":", "\"", "*", "?", "$", "#", "'", "|", "\\"]
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            default_character: "_".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With `path = None` the default per-user file is used if it exists.
    /// An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing or any layer
    /// fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                Some(p.to_path_buf())
            }
            None => Self::default_path().filter(|p| p.exists()),
        };

        match &file {
            Some(p) => log::debug!("Loading config from {}", p.display()),
            None => log::debug!("No config file, using defaults"),
        }

        let config = Self::figment(file.as_deref())
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    /// Build the layered figment: defaults < file < environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Json::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Default per-user config path (`~/.clean_files`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    /// Validate and convert into [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-octal mode, a multi-character
    /// forbidden entry, or a replacement containing a forbidden character.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let permissions = parse_octal(&self.permissions)?;

        let mut forbidden_characters: Vec<char> = Vec::new();
        for entry in &self.forbidden_characters {
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    if !forbidden_characters.contains(&c) {
                        forbidden_characters.push(c);
                    }
                }
                _ => return Err(ConfigError::InvalidForbiddenCharacter(entry.clone())),
            }
        }

        if self
            .default_character
            .chars()
            .any(|c| forbidden_characters.contains(&c))
        {
            return Err(ConfigError::ForbiddenReplacement(self.default_character));
        }

        Ok(Settings {
            permissions,
            temporary_suffixes: self.temporary_suffixes,
            forbidden_characters,
            default_character: self.default_character,
        })
    }
}

/// Validated settings shared by every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target permission bits
    pub permissions: u32,
    /// Name suffixes that mark a file as temporary
    pub temporary_suffixes: Vec<String>,
    /// Characters not allowed in file names (deduplicated)
    pub forbidden_characters: Vec<char>,
    /// Replacement for each forbidden character
    pub default_character: String,
}

impl Default for Settings {
    fn default() -> Self {
        // The built-in defaults always validate
        match Config::default().into_settings() {
            Ok(settings) => settings,
            Err(_) => unreachable!("default configuration is valid"),
        }
    }
}

impl Settings {
    /// Whether a file name ends with a temporary suffix.
    ///
    /// The suffix is matched against the raw name bytes, so names that are
    /// not valid UTF-8 still match.
    #[must_use]
    pub fn is_temporary(&self, name: impl AsRef<OsStr>) -> bool {
        let name = name.as_ref().as_encoded_bytes();
        self.temporary_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_bytes()))
    }

    /// Whether a file name contains a forbidden character.
    #[must_use]
    pub fn has_forbidden(&self, name: impl AsRef<OsStr>) -> bool {
        name.as_ref()
            .as_encoded_bytes()
            .utf8_chunks()
            .any(|chunk| chunk.valid().chars().any(|c| self.forbidden_characters.contains(&c)))
    }

    /// Replace every forbidden character with the default string.
    #[must_use]
    pub fn sanitize(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for c in name.chars() {
            if self.forbidden_characters.contains(&c) {
                out.push_str(&self.default_character);
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Sanitize a file name as found on disk.
    ///
    /// Only forbidden characters change; bytes that are not valid UTF-8 are
    /// carried over unchanged. Returns `None` if such a name cannot be
    /// rebuilt on this platform.
    #[must_use]
    pub fn sanitize_file_name(&self, name: &OsStr) -> Option<OsString> {
        match name.to_str() {
            Some(name) => Some(OsString::from(self.sanitize(name))),
            None => self.sanitize_raw(name),
        }
    }

    #[cfg(unix)]
    fn sanitize_raw(&self, name: &OsStr) -> Option<OsString> {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let mut out = Vec::with_capacity(name.len());
        for chunk in name.as_bytes().utf8_chunks() {
            out.extend_from_slice(self.sanitize(chunk.valid()).as_bytes());
            out.extend_from_slice(chunk.invalid());
        }
        Some(OsString::from_vec(out))
    }

    #[cfg(not(unix))]
    fn sanitize_raw(&self, _name: &OsStr) -> Option<OsString> {
        None
    }
}

/// Parse an octal permission string such as `"644"` or `"0o755"`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPermissions`] if the value is not octal or
/// exceeds `0o7777`.
pub fn parse_octal(value: &str) -> Result<u32, ConfigError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0o")
        .or_else(|| trimmed.strip_prefix("0O"))
        .unwrap_or(trimmed);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if !digits.is_empty() && mode <= 0o7777 => Ok(mode),
        _ => Err(ConfigError::InvalidPermissions(value.to_string())),
    }
}

/// Accept `"644"` as well as a bare number `644` (read as the same digits).
fn deserialize_octal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct OctalVisitor;

    impl<'de> Visitor<'de> for OctalVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an octal permission string such as \"644\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(OctalVisitor)
}
