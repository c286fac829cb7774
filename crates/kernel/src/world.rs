use runner_common::{EntityId, TemplateId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An event record produced by every mutation to the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was created from a template at the given transform.
    Spawned {
        id: EntityId,
        template: TemplateId,
        transform: Transform,
    },
    /// Entity was removed. Carries its last transform.
    Despawned { id: EntityId, transform: Transform },
    /// Entity transform was updated.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// One frame elapsed.
    Stepped { frame: u64 },
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub template: TemplateId,
    pub transform: Transform,
}

/// The authoritative world state.
///
/// BTreeMap keeps iteration order stable across platforms. The streamer and
/// the host both mutate it through the methods below; nothing reaches into
/// the entity table directly.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    frame: u64,
    event_log: Vec<WorldEvent>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Instantiate `template` at `transform`. Returns the new entity's id.
    pub fn spawn(&mut self, template: TemplateId, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.entities.insert(
            id,
            EntityData {
                template,
                transform,
            },
        );
        self.event_log.push(WorldEvent::Spawned {
            id,
            template,
            transform,
        });
        id
    }

    /// Remove an entity. Returns its data if it was alive.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        match &data {
            Some(d) => self.event_log.push(WorldEvent::Despawned {
                id,
                transform: d.transform,
            }),
            None => tracing::warn!(id = %id.short(), "despawn of unknown entity"),
        }
        data
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Update an entity's transform and log the change.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> bool {
        let Some(data) = self.entities.get_mut(&id) else {
            return false;
        };
        let old = data.transform;
        data.transform = new;
        self.event_log
            .push(WorldEvent::TransformUpdated { id, old, new });
        true
    }

    /// Advance the frame counter.
    pub fn step(&mut self) {
        self.frame += 1;
        self.event_log.push(WorldEvent::Stepped { frame: self.frame });
    }

    /// Ids in the order they were despawned, read from the event log.
    pub fn despawn_order(&self) -> Vec<EntityId> {
        self.event_log
            .iter()
            .filter_map(|e| match e {
                WorldEvent::Despawned { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}
