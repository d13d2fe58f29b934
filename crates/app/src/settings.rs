//! Persisted settings (settings.toml)

use overlay::{PersistedConfig, ScreenPosition, ThumbnailRegion};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "TopLens";
const FILE_NAME: &str = "settings.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Click forwarding has never been confirmed
    pub first_time_click_forwarding: bool,
    /// Anchor restored at start-up
    pub position_lock: Option<ScreenPosition>,
    pub constrain_to_region: bool,
    /// Overlay size [width, height]
    pub window_size: [u32; 2],
    pub region: Option<ThumbnailRegion>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_time_click_forwarding: true,
            position_lock: None,
            constrain_to_region: false,
            window_size: [400, 300],
            region: None,
            path: None,
        }
    }
}

impl Settings {
    /// `%APPDATA%\TopLens\settings.toml`, or the working directory
    pub fn default_path() -> PathBuf {
        match std::env::var_os("APPDATA") {
            Some(appdata) => PathBuf::from(appdata).join(APP_DIR).join(FILE_NAME),
            None => PathBuf::from(FILE_NAME),
        }
    }

    /// Load from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let mut settings = match Self::read(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        };

        settings.path = Some(path.to_path_buf());
        settings
    }

    fn read(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write back to the file the settings were loaded from
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;

        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Save, logging instead of failing
    pub fn save_or_log(&self) {
        if let Err(e) = self.save() {
            log::error!("Failed to save settings: {}", e);
        }
    }
}

impl PersistedConfig for Settings {
    fn first_time_click_forwarding(&self) -> bool {
        self.first_time_click_forwarding
    }

    fn clear_first_time_click_forwarding(&mut self) {
        self.first_time_click_forwarding = false;
        self.save_or_log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture::Rect;
    use overlay::Padding;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("toplens-test-{}-{}", name, std::process::id()))
            .join(FILE_NAME)
    }

    #[test]
    fn test_parse_full_file() {
        let settings: Settings = toml::from_str(
            r#"
            first_time_click_forwarding = false
            position_lock = "bottom_right"
            constrain_to_region = true
            window_size = [640, 360]

            [region]
            kind = "absolute"
            x = 10
            y = 20
            width = 300
            height = 200
            "#,
        )
        .unwrap();

        assert!(!settings.first_time_click_forwarding);
        assert_eq!(settings.position_lock, Some(ScreenPosition::BottomRight));
        assert!(settings.constrain_to_region);
        assert_eq!(settings.window_size, [640, 360]);
        assert_eq!(settings.region, Some(ThumbnailRegion::Absolute(Rect::new(10, 20, 300, 200))));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [region]
            kind = "relative"
            left = 5
            top = 6
            right = 7
            bottom = 8
            "#,
        )
        .unwrap();

        assert!(settings.first_time_click_forwarding);
        assert_eq!(settings.position_lock, None);
        assert_eq!(settings.window_size, [400, 300]);
        assert_eq!(
            settings.region,
            Some(ThumbnailRegion::Relative(Padding { left: 5, top: 6, right: 7, bottom: 8 }))
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(temp_path("missing"));
        assert_eq!(settings, Settings { path: settings.path.clone(), ..Settings::default() });
    }

    #[test]
    fn test_consent_is_persisted() {
        let path = temp_path("consent");
        let _ = std::fs::remove_file(&path);

        let mut settings = Settings::load(&path);
        settings.position_lock = Some(ScreenPosition::Center);
        settings.clear_first_time_click_forwarding();

        let reloaded = Settings::load(&path);
        assert!(!reloaded.first_time_click_forwarding);
        assert_eq!(reloaded.position_lock, Some(ScreenPosition::Center));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "window_size = \"huge\"").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.window_size, [400, 300]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
