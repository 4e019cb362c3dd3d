//! `updateConfig`'s key set and the range validation behind `InvalidConfigValue`.

use agv_core::{AgvError, AgvResult};
use agv_fleet::AgvConfig;

/// The five tunables `Engine::update_config` can target, per `spec.md` §6.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigKey {
    MaxSpeed,
    Acceleration,
    Deceleration,
    SafetyDistance,
    HardBorrowLength,
}

impl ConfigKey {
    fn name(self) -> &'static str {
        match self {
            ConfigKey::MaxSpeed => "maxSpeed",
            ConfigKey::Acceleration => "acceleration",
            ConfigKey::Deceleration => "deceleration",
            ConfigKey::SafetyDistance => "safetyDistance",
            ConfigKey::HardBorrowLength => "hardBorrowLength",
        }
    }
}

/// Validate `value` against `key`'s range and, if valid, write it into
/// `config`. `hard_borrow_length` is passed as the integer part of `value`;
/// the other four keys take it directly as a positive `f64`.
pub fn apply(config: &mut AgvConfig, key: ConfigKey, value: f64) -> AgvResult<()> {
    let reject = |reason: &str| {
        Err(AgvError::InvalidConfigValue {
            key: key.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    match key {
        ConfigKey::MaxSpeed => {
            if value <= 0.0 {
                return reject("must be positive");
            }
            config.max_speed = value;
        }
        ConfigKey::Acceleration => {
            if value <= 0.0 {
                return reject("must be positive");
            }
            config.acceleration = value;
        }
        ConfigKey::Deceleration => {
            if value <= 0.0 {
                return reject("must be positive");
            }
            config.deceleration = value;
        }
        ConfigKey::SafetyDistance => {
            if value < 0.0 {
                return reject("must be non-negative");
            }
            config.safety_distance = value;
        }
        ConfigKey::HardBorrowLength => {
            if value < 0.0 || value > AgvConfig::MAX_HARD_BORROW_LENGTH as f64 {
                return reject("must be in 0..=8");
            }
            config.hard_borrow_length = value as u8;
        }
    }
    Ok(())
}
