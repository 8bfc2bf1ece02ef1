// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings and configuration.
//!
//! Settings live next to the dialogue assets in `dialogue_editor.ron`.
//! Relative directories are resolved against the project root.

use dialogue_editor_graph::LanguageTag;
use dialogue_editor_runtime::{LanguageContext, LanguageFont};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "dialogue_editor.ron";

/// Errors reading or writing settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file could not be read or written
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// Settings file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid settings RON
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Settings file
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// The settings could not be encoded
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
    /// The file was written by a newer build
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// CSV import/export locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Directory holding the CSV files
    pub directory: PathBuf,
    /// File written by export
    pub save_file_name: String,
    /// File read by import
    pub load_file_name: String,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("csv"),
            save_file_name: "DialogueCSV_Save.csv".to_string(),
            load_file_name: "DialogueCSV_Load.csv".to_string(),
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Format version
    pub version: u32,
    /// Language used for playback and editing
    pub language: LanguageTag,
    /// Languages every table is completed against
    pub languages: Vec<LanguageTag>,
    /// Directory searched for dialogue assets
    pub dialogue_dir: PathBuf,
    /// CSV locations
    pub csv: CsvSettings,
    /// Font for each language
    pub fonts: Vec<LanguageFont>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            language: LanguageTag::English,
            languages: LanguageTag::ALL.to_vec(),
            dialogue_dir: PathBuf::from("dialogues"),
            csv: CsvSettings::default(),
            fonts: Vec::new(),
        }
    }
}

impl EditorSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: EditorSettings = ron::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings.normalized())
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("No settings at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default().enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings file path for a project root
    pub fn settings_file_path(root: &Path) -> PathBuf {
        root.join(SETTINGS_FILE_NAME)
    }

    /// Dialogue directory resolved against the project root
    pub fn dialogue_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dialogue_dir)
    }

    /// Path export writes to
    pub fn csv_save_path(&self, root: &Path) -> PathBuf {
        root.join(&self.csv.directory).join(&self.csv.save_file_name)
    }

    /// Path import reads from
    pub fn csv_load_path(&self, root: &Path) -> PathBuf {
        root.join(&self.csv.directory).join(&self.csv.load_file_name)
    }

    /// Language context for playback
    pub fn language_context(&self) -> LanguageContext {
        LanguageContext::new(self.language).with_fonts(self.fonts.iter().cloned())
    }

    /// Drop duplicate languages and make sure the active one is listed
    fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.languages.len());
        self.languages.retain(|tag| {
            if seen.contains(tag) {
                false
            } else {
                seen.push(*tag);
                true
            }
        });
        if self.languages.is_empty() {
            tracing::warn!("Settings list no languages; using all of them");
            self.languages = LanguageTag::ALL.to_vec();
        }
        if !self.languages.contains(&self.language) {
            tracing::warn!(
                "Active language {} is not enabled; switching to {}",
                self.language,
                self.languages[0]
            );
            self.language = self.languages[0];
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_editor_runtime::FontRef;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = EditorSettings::settings_file_path(dir.path());

        let mut settings = EditorSettings::default();
        settings.language = LanguageTag::Japanese;
        settings.fonts.push(LanguageFont {
            language: LanguageTag::Japanese,
            font: FontRef("fonts/NotoSansJP.ttf".to_string()),
        });
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.language_context().active_font(),
            Some(&FontRef("fonts/NotoSansJP.ttf".to_string()))
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EditorSettings::load_or_default(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(
            settings.csv_save_path(Path::new("proj")),
            Path::new("proj").join("csv").join("DialogueCSV_Save.csv")
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(language: \"German\", languages: [\"German\", \"German\", \"English\"])").unwrap();

        let settings = EditorSettings::load(&path).unwrap();
        assert_eq!(settings.language, LanguageTag::German);
        assert_eq!(settings.languages, vec![LanguageTag::German, LanguageTag::English]);
        assert_eq!(settings.csv, CsvSettings::default());
    }

    #[test]
    fn test_active_language_must_be_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(language: \"Danish\", languages: [\"English\"])").unwrap();

        let settings = EditorSettings::load(&path).unwrap();
        assert_eq!(settings.language, LanguageTag::English);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(version: 7)").unwrap();

        let err = EditorSettings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedVersion { found: 7, .. }));
    }
}
