use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Vec3;

/// Tunables for one errand scenario. Field defaults mirror the values the
/// original bar scene shipped with, so an empty JSON object is a runnable
/// configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ErrandConfig {
    /// Walk speed in units per second.
    pub move_speed: f32,
    /// Fraction-per-second rate at which the actor turns toward its heading.
    pub rotation_speed: f32,
    /// Radius used by the input layer to scope interaction presses. Carried
    /// here so one config file describes the whole scenario; the scheduler
    /// itself never reads it.
    pub interaction_radius: f32,
    /// Seconds the actor waits at its destination before giving up.
    pub second_interaction_timeout: f32,
    /// Scoring delta applied when the wait times out.
    pub timeout_penalty: i32,
    /// Distance below which a travelling actor counts as arrived.
    pub arrival_epsilon: f32,
    pub spawn_point: Vec3,
    pub waiting_point: Vec3,
    pub destinations: Vec<DestinationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationSpec {
    pub name: String,
    pub position: Vec3,
}

impl Default for ErrandConfig {
    fn default() -> Self {
        ErrandConfig {
            move_speed: 3.0,
            rotation_speed: 5.0,
            interaction_radius: 5.0,
            second_interaction_timeout: 10.0,
            timeout_penalty: 5,
            arrival_epsilon: 0.1,
            spawn_point: Vec3::new(0.0, 0.0, -8.0),
            waiting_point: Vec3::new(0.0, 0.0, 0.0),
            destinations: vec![
                DestinationSpec {
                    name: "table_a".to_string(),
                    position: Vec3::new(3.0, 0.0, 2.0),
                },
                DestinationSpec {
                    name: "table_b".to_string(),
                    position: Vec3::new(-3.0, 0.0, 2.0),
                },
                DestinationSpec {
                    name: "table_c".to_string(),
                    position: Vec3::new(0.0, 0.0, 4.0),
                },
            ],
        }
    }
}

impl ErrandConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destinations.is_empty() {
            return Err(ConfigError::NoDestinations);
        }
        if self.move_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMoveSpeed(self.move_speed));
        }
        if self.second_interaction_timeout <= 0.0 {
            return Err(ConfigError::NonPositiveTimeout(
                self.second_interaction_timeout,
            ));
        }
        if self.arrival_epsilon <= 0.0 {
            return Err(ConfigError::NonPositiveEpsilon(self.arrival_epsilon));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ErrandConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_destinations_rejected() {
        let mut config = ErrandConfig::default();
        config.destinations.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoDestinations));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = ErrandConfig::default();
        config.second_interaction_timeout = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveTimeout(0.0))
        );
    }

    #[test]
    fn empty_json_object_deserializes_to_defaults() {
        let config: ErrandConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.destinations.len(), 3);
        assert!((config.second_interaction_timeout - 10.0).abs() < f32::EPSILON);
    }
}
