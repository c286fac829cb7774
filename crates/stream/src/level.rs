//! On-disk level description.
//!
//! ```yaml
//! stream:
//!   segment_length: 10.0
//!   segments_to_keep: 5
//!   pre_generation_distance: 40.0
//! templates: [straight, ramp, gap, runner]
//! segments: [straight, ramp, gap]
//! player: runner
//! spawn_anchor:
//!   position: [0.0, 0.0, 0.0]
//! ```
//!
//! Template names are resolved to [`TemplateId`]s here, once, so the
//! streamer itself only ever sees handles.

use glam::{Quat, Vec3};
use runner_common::{TemplateId, Transform};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{LevelSetup, StreamConfig};
use crate::error::LevelFileError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub position: [f32; 3],
    /// Yaw in degrees about the up axis.
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl AnchorSpec {
    pub fn to_transform(&self) -> Transform {
        Transform {
            position: Vec3::from_array(self.position),
            rotation: Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            ..Transform::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    #[serde(default)]
    pub stream: StreamConfig,
    /// Every prefab the level knows about. Index in this list is the
    /// template id handed to the world factory.
    pub templates: Vec<String>,
    /// Names from `templates` used as interchangeable track segments.
    #[serde(default)]
    pub segments: Vec<String>,
    /// Name from `templates` spawned as the player.
    pub player: Option<String>,
    pub spawn_anchor: Option<AnchorSpec>,
}

impl LevelFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelFileError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, LevelFileError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn template_id(&self, name: &str) -> Option<TemplateId> {
        self.templates
            .iter()
            .position(|t| t == name)
            .map(|i| TemplateId(i as u32))
    }

    pub fn template_name(&self, id: TemplateId) -> Option<&str> {
        self.templates.get(id.0 as usize).map(String::as_str)
    }

    fn resolve(&self, name: &str) -> Result<TemplateId, LevelFileError> {
        self.template_id(name)
            .ok_or_else(|| LevelFileError::UnknownTemplate(name.to_string()))
    }

    /// Resolve names into a [`LevelSetup`]. Missing references stay empty
    /// so the controller reports them like any other setup error.
    pub fn to_setup(&self) -> Result<LevelSetup, LevelFileError> {
        let segment_templates = self
            .segments
            .iter()
            .map(|name| self.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        let player_template = self
            .player
            .as_deref()
            .map(|name| self.resolve(name))
            .transpose()?;
        Ok(LevelSetup {
            config: self.stream,
            segment_templates,
            player_template,
            spawn_anchor: self.spawn_anchor.as_ref().map(AnchorSpec::to_transform),
        })
    }
}
