//! The world-side collaborator the streamer drives.
//!
//! The streamer never touches rendering or physics; it asks a
//! [`WorldFactory`] to create and destroy objects and keeps only handles.

use glam::{Quat, Vec3};
use runner_common::{EntityId, TemplateId, Transform};
use runner_kernel::World;

/// Handle and placement of the spawned player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAnchor {
    pub id: EntityId,
    pub transform: Transform,
}

/// Creates and destroys world objects on behalf of the streamer.
pub trait WorldFactory {
    /// Spawn the player once per session. `None` aborts the session.
    fn spawn_player_anchor(&mut self, template: TemplateId, at: Transform) -> Option<PlayerAnchor>;

    /// Instantiate a segment. Infallible once the level has validated.
    fn instantiate(&mut self, template: TemplateId, position: Vec3, rotation: Quat) -> EntityId;

    /// Destroy an object. Called at most once per handle.
    fn destroy(&mut self, id: EntityId);
}

impl<F: WorldFactory + ?Sized> WorldFactory for &mut F {
    fn spawn_player_anchor(
        &mut self,
        template: TemplateId,
        at: Transform,
    ) -> Option<PlayerAnchor> {
        (**self).spawn_player_anchor(template, at)
    }

    fn instantiate(&mut self, template: TemplateId, position: Vec3, rotation: Quat) -> EntityId {
        (**self).instantiate(template, position, rotation)
    }

    fn destroy(&mut self, id: EntityId) {
        (**self).destroy(id)
    }
}

impl WorldFactory for World {
    fn spawn_player_anchor(
        &mut self,
        template: TemplateId,
        at: Transform,
    ) -> Option<PlayerAnchor> {
        let id = self.spawn(template, at);
        Some(PlayerAnchor { id, transform: at })
    }

    fn instantiate(&mut self, template: TemplateId, position: Vec3, rotation: Quat) -> EntityId {
        self.spawn(
            template,
            Transform {
                position,
                rotation,
                ..Transform::default()
            },
        )
    }

    fn destroy(&mut self, id: EntityId) {
        self.despawn(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_backs_factory_calls() {
        let mut world = World::new();
        let player = world
            .spawn_player_anchor(TemplateId(9), Transform::default())
            .unwrap();
        let seg = world.instantiate(TemplateId(1), Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY);
        assert!(world.is_alive(player.id));
        assert_eq!(world.get(seg).unwrap().transform.travel(), 5.0);

        world.destroy(seg);
        assert!(!world.is_alive(seg));
        assert_eq!(world.entity_count(), 1);
    }

    fn place<F: WorldFactory>(mut factory: F) -> EntityId {
        factory.instantiate(TemplateId(0), Vec3::ZERO, Quat::IDENTITY)
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut world = World::new();
        let id = place(&mut world);
        assert!(world.is_alive(id));
    }
}
