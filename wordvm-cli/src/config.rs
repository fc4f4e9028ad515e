//! Run settings, overridable from the command line with `--set name=value`.

use std::time::Duration;

use thiserror::Error;

/// One documented setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSpec {
    pub name: &'static str,
    pub default: &'static str,
    pub effect: &'static str,
}

/// Every setting the runner understands.
pub const SETTINGS: &[SettingSpec] = &[
    SettingSpec {
        name: "cpu_speed",
        default: "500",
        effect: "instructions per second during `run` (1..=100000)",
    },
    SettingSpec {
        name: "max_steps",
        default: "0",
        effect: "stop `run` after this many steps; 0 runs until an error",
    },
    SettingSpec {
        name: "trace",
        default: "false",
        effect: "print every executed instruction during `run`",
    },
];

/// Timer frequency; `run` paces itself in frames of this rate.
pub const FRAME_RATE: u32 = 60;

const CPU_SPEED_RANGE: (u32, u32) = (1, 100_000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("expected NAME=VALUE, got '{entry}'")]
    Malformed { entry: String },

    #[error("unknown setting '{name}'")]
    Unknown { name: String },

    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },

    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cpu_speed: u32,
    pub max_steps: u64,
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_speed: 500,
            max_steps: 0,
            trace: false,
        }
    }
}

impl Config {
    /// Defaults with each `NAME=VALUE` override applied in order, validated.
    pub fn from_overrides<S: AsRef<str>>(overrides: &[S]) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for entry in overrides {
            let entry = entry.as_ref();
            let (name, value) = entry.split_once('=').ok_or_else(|| ConfigError::Malformed {
                entry: entry.to_string(),
            })?;
            config.set(name.trim(), value.trim())?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse and store one setting.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
            reason,
        };
        match name {
            "cpu_speed" => self.cpu_speed = value.parse().map_err(|e| invalid(format!("{e}")))?,
            "max_steps" => self.max_steps = value.parse().map_err(|e| invalid(format!("{e}")))?,
            "trace" => self.trace = value.parse().map_err(|e| invalid(format!("{e}")))?,
            _ => {
                return Err(ConfigError::Unknown {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = CPU_SPEED_RANGE;
        if !(min..=max).contains(&self.cpu_speed) {
            return Err(ConfigError::OutOfRange {
                name: "cpu_speed",
                value: u64::from(self.cpu_speed),
                min: u64::from(min),
                max: u64::from(max),
            });
        }
        Ok(())
    }

    /// Instructions executed per timer frame, at least one.
    pub fn steps_per_frame(&self) -> u64 {
        u64::from((self.cpu_speed / FRAME_RATE).max(1))
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / FRAME_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_table() {
        let config = Config::default();
        for spec in SETTINGS {
            let mut parsed = Config::default();
            parsed.set(spec.name, spec.default).unwrap();
            assert_eq!(parsed, config, "{}", spec.name);
        }
    }

    #[test]
    fn overrides_apply_in_order() {
        let config =
            Config::from_overrides(&["cpu_speed=1000", "trace = true", "cpu_speed=60"]).unwrap();
        assert_eq!(config.cpu_speed, 60);
        assert!(config.trace);
        assert_eq!(config.max_steps, 0);
    }

    #[test]
    fn rejects_bad_entries() {
        assert_eq!(
            Config::from_overrides(&["cpu_speed"]),
            Err(ConfigError::Malformed {
                entry: "cpu_speed".into()
            })
        );
        assert_eq!(
            Config::from_overrides(&["warp=9"]),
            Err(ConfigError::Unknown {
                name: "warp".into()
            })
        );
        assert!(matches!(
            Config::from_overrides(&["max_steps=-1"]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Config::from_overrides(&["trace=yes"]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn cpu_speed_range_is_checked() {
        assert!(Config::from_overrides(&["cpu_speed=0"]).is_err());
        assert!(Config::from_overrides(&["cpu_speed=100001"]).is_err());
        assert!(Config::from_overrides(&["cpu_speed=100000"]).is_ok());
        assert_eq!(
            Config::from_overrides(&["cpu_speed=0"])
                .unwrap_err()
                .to_string(),
            "cpu_speed = 0 is outside 1..=100000"
        );
    }

    #[test]
    fn frame_budget() {
        let mut config = Config::default();
        assert_eq!(config.steps_per_frame(), 8);
        config.cpu_speed = 10;
        assert_eq!(config.steps_per_frame(), 1);
    }
}
