//! Configuration loading and management.

use std::ops::Range;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use punch_core::NightShiftClassifier;
use serde::{Deserialize, Serialize};

/// Hours in each night-shift window, counted from its first hour.
const NIGHT_WINDOW_HOURS: u32 = 2;

const HOURS_PER_DAY: u32 = 24;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// First hour a night shift may start in.
    pub night_start_hour: u32,
    /// First hour a night shift may end in.
    pub night_end_hour: u32,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("punch.db"),
            night_start_hour: 21,
            night_end_hour: 5,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // PUNCH_DATABASE_PATH, PUNCH_NIGHT_START_HOUR, ...
        figment = figment.merge(Env::prefixed("PUNCH_"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects night-window hours outside a day.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    fn validate(&self) -> Result<(), figment::Error> {
        for (key, hour) in [
            ("night_start_hour", self.night_start_hour),
            ("night_end_hour", self.night_end_hour),
        ] {
            if hour >= HOURS_PER_DAY {
                return Err(format!("{key} must be between 0 and 23, got {hour}").into());
            }
        }
        Ok(())
    }

    /// The night-shift classifier for the configured windows.
    pub const fn night_classifier(&self) -> NightShiftClassifier {
        NightShiftClassifier::new(
            window(self.night_start_hour),
            window(self.night_end_hour),
        )
    }
}

const fn window(first_hour: u32) -> Range<u32> {
    first_hour..first_hour.saturating_add(NIGHT_WINDOW_HOURS)
}

/// Returns the platform-specific config directory for punch.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("punch"))
}

/// Returns the platform-specific data directory for punch.
///
/// On Linux: `~/.local/share/punch`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("punch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_punch() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "punch");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("punch.db"));
    }

    #[test]
    fn test_default_night_windows() {
        let classifier = Config::default().night_classifier();
        assert_eq!(classifier, NightShiftClassifier::default());
    }

    #[test]
    fn test_explicit_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "database_path = \"/tmp/punch-test.db\"\nnight_start_hour = 20\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/punch-test.db"));
        assert_eq!(config.night_start_hour, 20);
        assert_eq!(config.night_end_hour, 5);
        assert_eq!(config.night_classifier().start_hours, 20..22);
    }

    #[test]
    fn test_out_of_range_night_hour_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "night_start_hour = 4294967295\n").unwrap();

        let err = Config::load_from(Some(&path)).unwrap_err();
        assert!(
            err.to_string()
                .contains("night_start_hour must be between 0 and 23, got 4294967295")
        );

        std::fs::write(&path, "night_end_hour = 24\n").unwrap();
        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_night_classifier_never_overflows() {
        let config = Config {
            night_start_hour: u32::MAX,
            ..Config::default()
        };
        assert_eq!(
            config.night_classifier().start_hours,
            u32::MAX..u32::MAX
        );
    }
}
