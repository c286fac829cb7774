use runner_common::{TemplateId, Transform};
use serde::{Deserialize, Serialize};

use crate::catalog::SegmentCatalog;
use crate::controller::PLAYER_FORWARD_NUDGE;
use crate::error::ConfigError;

/// Streaming parameters: segment size, retention and look-ahead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Length every segment occupies along the travel axis.
    pub segment_length: f32,
    /// Segments kept alive at steady state.
    pub segments_to_keep: usize,
    /// How far ahead of the player the frontier must stay.
    pub pre_generation_distance: f32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            segment_length: 10.0,
            segments_to_keep: 5,
            pre_generation_distance: 40.0,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.segment_length.is_finite() {
            return Err(ConfigError::NonFiniteValue("segment_length"));
        }
        if !self.pre_generation_distance.is_finite() {
            return Err(ConfigError::NonFiniteValue("pre_generation_distance"));
        }
        if self.segment_length <= 0.0 {
            return Err(ConfigError::NonPositiveSegmentLength(self.segment_length));
        }
        // A session's first frontier sits at the forward nudge. Adding one
        // segment there must change it, or every spawn lands in one place.
        if PLAYER_FORWARD_NUDGE + self.segment_length == PLAYER_FORWARD_NUDGE {
            return Err(ConfigError::SegmentLengthTooSmall(self.segment_length));
        }
        if self.segments_to_keep == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        if self.pre_generation_distance < 0.0 {
            return Err(ConfigError::NegativePreGeneration(
                self.pre_generation_distance,
            ));
        }
        Ok(())
    }
}

/// Everything a controller needs for one level session, passed in at
/// construction instead of looked up from the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSetup {
    pub config: StreamConfig,
    pub segment_templates: Vec<TemplateId>,
    pub player_template: Option<TemplateId>,
    pub spawn_anchor: Option<Transform>,
}

impl LevelSetup {
    /// Setup with an anchor at the origin and the given templates.
    pub fn new(
        config: StreamConfig,
        segment_templates: Vec<TemplateId>,
        player_template: TemplateId,
    ) -> Self {
        Self {
            config,
            segment_templates,
            player_template: Some(player_template),
            spawn_anchor: Some(Transform::default()),
        }
    }

    /// Check every reference and parameter without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clone().resolve().map(|_| ())
    }

    /// Order matches the order an author would fix things in: catalog,
    /// anchor, player, then numbers.
    pub(crate) fn resolve(self) -> Result<ResolvedLevel, ConfigError> {
        let catalog = SegmentCatalog::new(self.segment_templates)?;
        let anchor = self.spawn_anchor.ok_or(ConfigError::MissingSpawnAnchor)?;
        let player_template = self
            .player_template
            .ok_or(ConfigError::MissingPlayerTemplate)?;
        self.config.validate()?;
        Ok(ResolvedLevel {
            config: self.config,
            catalog,
            player_template,
            anchor,
        })
    }
}

/// A setup that passed validation.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedLevel {
    pub config: StreamConfig,
    pub catalog: SegmentCatalog,
    pub player_template: TemplateId,
    pub anchor: Transform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_config_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.segment_length, 10.0);
        assert_eq!(config.segments_to_keep, 5);
        assert_eq!(config.pre_generation_distance, 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_numbers() {
        let base = StreamConfig::default();
        let cases = [
            (
                StreamConfig {
                    segment_length: 0.0,
                    ..base
                },
                ConfigError::NonPositiveSegmentLength(0.0),
            ),
            (
                StreamConfig {
                    segments_to_keep: 0,
                    ..base
                },
                ConfigError::ZeroRetention,
            ),
            (
                StreamConfig {
                    pre_generation_distance: -1.0,
                    ..base
                },
                ConfigError::NegativePreGeneration(-1.0),
            ),
            (
                StreamConfig {
                    segment_length: f32::NAN,
                    ..base
                },
                ConfigError::NonFiniteValue("segment_length"),
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn rejects_length_lost_to_rounding() {
        let tiny = StreamConfig {
            segment_length: 1e-9,
            ..StreamConfig::default()
        };
        assert_eq!(tiny.validate(), Err(ConfigError::SegmentLengthTooSmall(1e-9)));

        let short = StreamConfig {
            segment_length: 1e-3,
            ..StreamConfig::default()
        };
        assert!(short.validate().is_ok());
    }

    #[test]
    fn zero_pre_generation_is_allowed() {
        let config = StreamConfig {
            pre_generation_distance: 0.0,
            ..StreamConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn setup_requires_references() {
        let mut setup =
            LevelSetup::new(StreamConfig::default(), vec![TemplateId(0)], TemplateId(9));
        assert!(setup.validate().is_ok());

        setup.spawn_anchor = None;
        assert_eq!(setup.validate(), Err(ConfigError::MissingSpawnAnchor));

        setup.spawn_anchor = Some(Transform::default());
        setup.player_template = None;
        assert_eq!(setup.validate(), Err(ConfigError::MissingPlayerTemplate));

        setup.segment_templates.clear();
        assert_eq!(setup.validate(), Err(ConfigError::EmptyCatalog));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: StreamConfig = serde_yaml::from_str("segments_to_keep: 8\n").unwrap();
        assert_eq!(config.segments_to_keep, 8);
        assert_eq!(config.segment_length, 10.0);
    }
}
