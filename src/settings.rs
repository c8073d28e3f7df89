use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The five values an export run needs, decoded and ready to use.
///
/// Persistence is a pure load/save pair over this value; nothing holds the
/// file open or resynchronizes behind the caller's back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub email: String,
    pub password: String,
    pub projects: Vec<String>,
    pub save_path: PathBuf,
    pub url: String,
}

/// One of the five required settings fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    Projects,
    SavePath,
    Url,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::Projects => "projects",
            Field::SavePath => "save_path",
            Field::Url => "url",
        };
        f.write_str(name)
    }
}

/// Exactly which required fields are empty, so callers can report precisely
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingFields(pub Vec<Field>);

impl MissingFields {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|field| field.to_string()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Per-field overrides merged over the stored values by [`Settings::save`]
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub projects: Option<Vec<String>>,
    pub save_path: Option<PathBuf>,
    pub url: Option<String>,
}

/// On-disk form: a single `[settings]` table of plain strings.
/// The password is base64-obfuscated, which deters shoulder-surfing and
/// nothing else; anyone with file access can decode it.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: StoredSettings,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    projects: String,
    #[serde(default)]
    save_path: String,
    #[serde(default)]
    url: String,
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing file, an unparseable file, or missing individual keys leave
    /// the affected fields empty rather than failing; completeness is checked
    /// separately via [`Settings::missing_fields`].
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        let file: SettingsFile = match toml::from_str(&raw) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "settings file is unparseable, treating all fields as unset"
                );
                return Self::default();
            }
        };

        Self::from_stored(file.settings)
    }

    /// Merge `patch` over the values currently stored at `path`, rewrite the
    /// whole file, and return the merged settings.
    pub fn save(path: &Path, patch: SettingsPatch) -> Result<Settings> {
        let merged = Self::load(path).merged(patch);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = SettingsFile {
            settings: merged.to_stored(),
        };
        std::fs::write(path, toml::to_string_pretty(&file)?)?;

        Ok(merged)
    }

    /// Enumerate which required fields are empty
    pub fn missing_fields(&self) -> MissingFields {
        let mut missing = Vec::new();
        if self.email.is_empty() {
            missing.push(Field::Email);
        }
        if self.password.is_empty() {
            missing.push(Field::Password);
        }
        if self.projects.is_empty() {
            missing.push(Field::Projects);
        }
        if self.save_path.as_os_str().is_empty() {
            missing.push(Field::SavePath);
        }
        if self.url.is_empty() {
            missing.push(Field::Url);
        }
        MissingFields(missing)
    }

    /// Fail with [`Error::SettingsIncomplete`] unless all five fields are set
    pub fn require_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::SettingsIncomplete(missing))
        }
    }

    fn merged(self, patch: SettingsPatch) -> Settings {
        Settings {
            email: patch.email.unwrap_or(self.email),
            password: patch.password.unwrap_or(self.password),
            projects: patch.projects.unwrap_or(self.projects),
            save_path: patch.save_path.unwrap_or(self.save_path),
            url: patch.url.unwrap_or(self.url),
        }
    }

    fn from_stored(stored: StoredSettings) -> Self {
        let password = match BASE64.decode(stored.password.as_bytes()) {
            Ok(bytes) => String::from_utf8(bytes).unwrap_or_default(),
            Err(_) => {
                if !stored.password.is_empty() {
                    tracing::warn!("stored password is not valid base64, treating as unset");
                }
                String::new()
            }
        };

        let projects = stored
            .projects
            .split(',')
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            email: stored.email,
            password,
            projects,
            save_path: PathBuf::from(stored.save_path),
            url: stored.url,
        }
    }

    fn to_stored(&self) -> StoredSettings {
        StoredSettings {
            email: self.email.clone(),
            password: BASE64.encode(self.password.as_bytes()),
            projects: self.projects.join(","),
            save_path: self.save_path.display().to_string(),
            url: self.url.clone(),
        }
    }
}

/// Parse a comma-separated project identifier list as typed on the CLI
pub fn parse_project_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_settings() -> Settings {
        Settings {
            email: "si@example.com".to_string(),
            password: "hunter2".to_string(),
            projects: vec![
                "project-57067c807eae7bc01a000013".to_string(),
                "project-00000000000000000000aaaa".to_string(),
            ],
            save_path: PathBuf::from("/home/si/Downloads"),
            url: "https://instagantt.com/asana/connect".to_string(),
        }
    }

    fn full_patch(settings: &Settings) -> SettingsPatch {
        SettingsPatch {
            email: Some(settings.email.clone()),
            password: Some(settings.password.clone()),
            projects: Some(settings.projects.clone()),
            save_path: Some(settings.save_path.clone()),
            url: Some(settings.url.clone()),
        }
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let expected = full_settings();
        Settings::save(&path, full_patch(&expected)).unwrap();
        let loaded = Settings::load(&path);

        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        Settings::save(&path, full_patch(&full_settings())).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        assert!(!raw.contains("hunter2"));
        assert!(raw.contains(&BASE64.encode("hunter2")));
    }

    #[test]
    fn test_partial_patch_preserves_stored_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let original = full_settings();
        Settings::save(&path, full_patch(&original)).unwrap();

        let patch = SettingsPatch {
            save_path: Some(PathBuf::from("/mnt/exports")),
            ..Default::default()
        };
        let merged = Settings::save(&path, patch).unwrap();

        assert_eq!(merged.save_path, PathBuf::from("/mnt/exports"));
        assert_eq!(merged.email, original.email);
        assert_eq!(merged.password, original.password);
        assert_eq!(merged.projects, original.projects);
        assert_eq!(merged.url, original.url);

        // The merge is also what lands on disk
        assert_eq!(Settings::load(&path), merged);
    }

    #[test]
    fn test_load_missing_file_reports_all_fields_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");

        let loaded = Settings::load(&path);

        assert_eq!(loaded, Settings::default());
        assert_eq!(
            loaded.missing_fields().0,
            vec![
                Field::Email,
                Field::Password,
                Field::Projects,
                Field::SavePath,
                Field::Url
            ]
        );
    }

    #[test]
    fn test_load_unparseable_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not toml at all {{{").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_load_undecodable_password_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[settings]\nemail = \"si@example.com\"\npassword = \"%%% not base64 %%%\"\n",
        )
        .unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.email, "si@example.com");
        assert_eq!(loaded.password, "");
    }

    #[test]
    fn test_missing_fields_display_names_each_field() {
        let settings = Settings {
            email: "si@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.missing_fields().to_string(),
            "password, projects, save_path, url"
        );
    }

    #[test]
    fn test_require_complete_on_full_settings() {
        assert!(full_settings().require_complete().is_ok());
    }

    #[test]
    fn test_parse_project_list_drops_empty_entries() {
        assert_eq!(
            parse_project_list("project-a,,project-b"),
            vec!["project-a".to_string(), "project-b".to_string()]
        );
        assert!(parse_project_list("").is_empty());
    }
}
