//! Addressable configuration keys.
//!
//! Every setting in [`ConfigFile`] has a [`ConfigKey`] named
//! `section.key`, which the file loader and the CLI `config` commands both
//! use to read and write it.

use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConfigError;
use super::file::ConfigFile;

/// Accepted `logging.level` values.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    // [measurement]
    FixedDistanceCm,
    UseFixedDistance,
    DefaultIrisCm,
    GateRatio,
    IpdOffsetCm,
    FitTolerancePx,

    // [stream]
    StreamWindow,
    StreamK,

    // [calibration]
    FocalBudgetMs,
    FocalMaxSamples,
    IrisBudgetMs,
    IrisMaxSamples,
    MinSamples,
    PollIntervalMs,

    // [storage]
    StateFile,

    // [logging]
    LogLevel,
    LogFile,
}

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        use ConfigKey::*;
        &[
            FixedDistanceCm,
            UseFixedDistance,
            DefaultIrisCm,
            GateRatio,
            IpdOffsetCm,
            FitTolerancePx,
            StreamWindow,
            StreamK,
            FocalBudgetMs,
            FocalMaxSamples,
            IrisBudgetMs,
            IrisMaxSamples,
            MinSamples,
            PollIntervalMs,
            StateFile,
            LogLevel,
            LogFile,
        ]
    }

    /// INI section.
    pub fn section(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            FixedDistanceCm | UseFixedDistance | DefaultIrisCm | GateRatio | IpdOffsetCm
            | FitTolerancePx => "measurement",
            StreamWindow | StreamK => "stream",
            FocalBudgetMs | FocalMaxSamples | IrisBudgetMs | IrisMaxSamples | MinSamples
            | PollIntervalMs => "calibration",
            StateFile => "storage",
            LogLevel | LogFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            FixedDistanceCm => "fixed_distance_cm",
            UseFixedDistance => "use_fixed_distance",
            DefaultIrisCm => "default_iris_cm",
            GateRatio => "gate_ratio",
            IpdOffsetCm => "ipd_offset_cm",
            FitTolerancePx => "fit_tolerance_px",
            StreamWindow => "window",
            StreamK => "k",
            FocalBudgetMs => "focal_budget_ms",
            FocalMaxSamples => "focal_max_samples",
            IrisBudgetMs => "iris_budget_ms",
            IrisMaxSamples => "iris_max_samples",
            MinSamples => "min_samples",
            PollIntervalMs => "poll_interval_ms",
            StateFile => "state_file",
            LogLevel => "level",
            LogFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        use ConfigKey::*;
        let m = &config.measurement;
        let c = &config.calibration;
        match self {
            FixedDistanceCm => m.fixed_distance_cm.to_string(),
            UseFixedDistance => m.use_fixed_distance.to_string(),
            DefaultIrisCm => m.default_iris_cm.to_string(),
            GateRatio => m.gate_ratio.to_string(),
            IpdOffsetCm => m.ipd_offset_cm.to_string(),
            FitTolerancePx => m.fit_tolerance_px.to_string(),
            StreamWindow => config.stream.window.to_string(),
            StreamK => config.stream.k.to_string(),
            FocalBudgetMs => c.focal_budget_ms.to_string(),
            FocalMaxSamples => c.focal_max_samples.to_string(),
            IrisBudgetMs => c.iris_budget_ms.to_string(),
            IrisMaxSamples => c.iris_max_samples.to_string(),
            MinSamples => c.min_samples.to_string(),
            PollIntervalMs => c.poll_interval_ms.to_string(),
            StateFile => path_string(&config.storage.state_file),
            LogLevel => config.logging.level.clone(),
            LogFile => path_string(&config.logging.file),
        }
    }

    /// Parse, validate and store `value`.
    ///
    /// The config is unchanged if validation fails.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        use ConfigKey::*;
        let value = value.trim();
        match self {
            FixedDistanceCm => config.measurement.fixed_distance_cm = self.positive(value)?,
            UseFixedDistance => config.measurement.use_fixed_distance = self.boolean(value)?,
            DefaultIrisCm => config.measurement.default_iris_cm = self.positive(value)?,
            GateRatio => {
                let ratio = self.positive(value)?;
                if ratio < 1.0 {
                    return Err(self.invalid(value, "must be at least 1.0"));
                }
                config.measurement.gate_ratio = ratio;
            }
            IpdOffsetCm => {
                let offset: f64 = self.parse(value)?;
                if !offset.is_finite() {
                    return Err(self.invalid(value, "must be a finite number"));
                }
                config.measurement.ipd_offset_cm = offset;
            }
            FitTolerancePx => config.measurement.fit_tolerance_px = self.positive(value)?,
            StreamWindow => config.stream.window = self.count(value)?,
            StreamK => config.stream.k = self.positive(value)?,
            FocalBudgetMs => config.calibration.focal_budget_ms = self.count(value)?,
            FocalMaxSamples => config.calibration.focal_max_samples = self.count(value)?,
            IrisBudgetMs => config.calibration.iris_budget_ms = self.count(value)?,
            IrisMaxSamples => config.calibration.iris_max_samples = self.count(value)?,
            MinSamples => config.calibration.min_samples = self.count(value)?,
            PollIntervalMs => config.calibration.poll_interval_ms = self.count(value)?,
            StateFile => config.storage.state_file = optional_path(value),
            LogLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, "expected trace, debug, info, warn or error"));
                }
                config.logging.level = level;
            }
            LogFile => config.logging.file = optional_path(value),
        }
        Ok(())
    }

    fn parse<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        value
            .parse()
            .map_err(|e: T::Err| self.invalid(value, &e.to_string()))
    }

    fn positive(&self, value: &str) -> Result<f64, ConfigError> {
        let parsed: f64 = self.parse(value)?;
        if !(parsed.is_finite() && parsed > 0.0) {
            return Err(self.invalid(value, "must be a positive number"));
        }
        Ok(parsed)
    }

    fn count<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        let parsed: T = self.parse(value)?;
        if parsed == T::default() {
            return Err(self.invalid(value, "must be greater than zero"));
        }
        Ok(parsed)
    }

    fn boolean(&self, value: &str) -> Result<bool, ConfigError> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn path_string(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_roundtrips_its_default() {
        let defaults = ConfigFile::default();
        for key in ConfigKey::all() {
            let mut config = ConfigFile::default();
            let value = key.get(&defaults);
            key.set(&mut config, &value).unwrap();
            assert_eq!(key.get(&config), value, "{}", key);
        }
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "measurement.gate_ratio".parse::<ConfigKey>().unwrap(),
            ConfigKey::GateRatio
        );
        assert_eq!("stream.k".parse::<ConfigKey>().unwrap(), ConfigKey::StreamK);
        assert!(matches!(
            "stream.depth".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_set_validates() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::GateRatio.set(&mut config, "0.9").is_err());
        assert!(ConfigKey::StreamWindow.set(&mut config, "0").is_err());
        assert!(ConfigKey::FixedDistanceCm.set(&mut config, "-30").is_err());
        assert!(ConfigKey::LogLevel.set(&mut config, "loud").is_err());
        assert!(ConfigKey::UseFixedDistance.set(&mut config, "maybe").is_err());
        assert_eq!(config, ConfigFile::default());

        ConfigKey::IpdOffsetCm.set(&mut config, "0").unwrap();
        ConfigKey::UseFixedDistance.set(&mut config, "yes").unwrap();
        ConfigKey::LogLevel.set(&mut config, "DEBUG").unwrap();
        assert_eq!(config.measurement.ipd_offset_cm, 0.0);
        assert!(config.measurement.use_fixed_distance);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_optional_paths() {
        let mut config = ConfigFile::default();
        ConfigKey::LogFile.set(&mut config, "/tmp/ipd.log").unwrap();
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/ipd.log")));

        ConfigKey::LogFile.set(&mut config, "").unwrap();
        assert!(config.logging.file.is_none());
        assert_eq!(ConfigKey::LogFile.get(&config), "");
    }
}
