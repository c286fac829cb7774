use glam::{Quat, Vec3};
use rand::Rng;
use runner_common::{TRAVEL_AXIS, Transform};

use crate::config::{LevelSetup, ResolvedLevel, StreamConfig};
use crate::cursor::Cursor;
use crate::error::StreamError;
use crate::factory::{PlayerAnchor, WorldFactory};
use crate::window::{SegmentInstance, SegmentWindow};

/// Height of the player above the spawn anchor.
pub const PLAYER_LIFT: f32 = 0.5;
/// Forward nudge so the player does not start exactly on a segment seam.
pub const PLAYER_FORWARD_NUDGE: f32 = 0.25;

/// Lifecycle of a [`StreamController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Level validated, waiting for [`StreamController::start`].
    Ready,
    /// Session live; ticks spawn and retire segments.
    Running,
    /// Session torn down. Terminal.
    Stopped,
    /// Validation or the player spawn failed. Terminal, never retried.
    Disabled,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub spawned: Option<SegmentInstance>,
    pub retired: Option<SegmentInstance>,
}

/// Running totals for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamStats {
    pub ticks: u64,
    /// Includes the pre-fill issued by `start`.
    pub segments_spawned: u64,
    pub segments_retired: u64,
    pub last_tick: TickReport,
}

/// The spawn anchor re-centred on the travel origin, keeping its height.
/// Segments are laid along the travel axis from here.
fn lane_origin(anchor: &Transform) -> Vec3 {
    Vec3::new(0.0, anchor.position.y, 0.0)
}

/// Where the player goes relative to the spawn anchor.
pub fn player_spawn_transform(anchor: &Transform, segment_length: f32) -> Transform {
    Transform::from_position(
        lane_origin(anchor)
            + Vec3::Y * PLAYER_LIFT
            + TRAVEL_AXIS * (PLAYER_FORWARD_NUDGE - segment_length / 2.0),
    )
}

/// Window and cursor of a live session.
#[derive(Debug)]
struct Track {
    lane: Vec3,
    rotation: Quat,
    window: SegmentWindow,
    cursor: Cursor,
    stats: StreamStats,
}

impl Track {
    fn spawn_next<F: WorldFactory, R: Rng>(
        &mut self,
        level: &ResolvedLevel,
        factory: &mut F,
        rng: &mut R,
    ) -> SegmentInstance {
        let template = level.catalog.pick(rng);
        let at = self.cursor.frontier();
        let id = factory.instantiate(template, self.lane + TRAVEL_AXIS * at, self.rotation);
        let instance = self.window.push(id, template, at);
        self.cursor.advance();
        self.stats.segments_spawned += 1;

        tracing::debug!(
            id = %id.short(),
            template = template.0,
            at,
            frontier = self.cursor.frontier(),
            active = self.window.len(),
            "spawned segment"
        );
        instance
    }

    fn retire_overflow<F: WorldFactory>(
        &mut self,
        keep: usize,
        factory: &mut F,
    ) -> Option<SegmentInstance> {
        let oldest = self.window.pop_oldest_if_overflow(keep)?;
        factory.destroy(oldest.id);
        self.stats.segments_retired += 1;
        tracing::debug!(
            id = %oldest.id.short(),
            order = oldest.order,
            active = self.window.len(),
            "retired oldest segment"
        );
        Some(oldest)
    }
}

/// Keeps a bounded window of track segments ahead of a forward-moving player.
///
/// Driven by one [`tick`](Self::tick) per frame from the host loop. All
/// world mutation goes through the injected [`WorldFactory`].
pub struct StreamController<F, R> {
    level: Result<ResolvedLevel, StreamError>,
    state: StreamState,
    track: Track,
    player: Option<PlayerAnchor>,
    factory: F,
    rng: R,
}

impl<F: WorldFactory, R: Rng> StreamController<F, R> {
    /// Validate `setup`. On failure the controller is [`StreamState::Disabled`]
    /// and [`start`](Self::start) reports the error.
    pub fn new(setup: LevelSetup, factory: F, rng: R) -> Self {
        let config = setup.config;
        // The anchor is re-centred at start, so the pre-start frontier is
        // the one start() will report for any anchor.
        let player_z =
            player_spawn_transform(&Transform::default(), config.segment_length).travel();
        let (level, state) = match setup.resolve() {
            Ok(level) => (Ok(level), StreamState::Ready),
            Err(e) => {
                tracing::error!(error = %e, "level setup rejected; streaming disabled");
                (Err(StreamError::Configuration(e)), StreamState::Disabled)
            }
        };
        Self {
            level,
            state,
            track: Track {
                lane: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                window: SegmentWindow::new(),
                cursor: Cursor::initialize(player_z, config.segment_length),
                stats: StreamStats::default(),
            },
            player: None,
            factory,
            rng,
        }
    }

    /// Spawn the player, place the cursor and pre-fill `segments_to_keep`
    /// segments so the first frame already has track.
    pub fn start(&mut self) -> Result<(), StreamError> {
        if self.state != StreamState::Ready {
            return Err(self.refusal("start"));
        }
        let level = match &self.level {
            Ok(level) => level,
            Err(e) => return Err(e.clone()),
        };
        let config = level.config;

        let spawn_at = player_spawn_transform(&level.anchor, config.segment_length);
        let Some(player) = self
            .factory
            .spawn_player_anchor(level.player_template, spawn_at)
        else {
            tracing::error!("failed to spawn player; level generation will not proceed");
            self.level = Err(StreamError::PlayerSpawnFailed);
            self.state = StreamState::Disabled;
            return Err(StreamError::PlayerSpawnFailed);
        };
        tracing::info!(
            id = %player.id.short(),
            position = ?player.transform.position,
            "player spawned"
        );

        self.track.lane = lane_origin(&level.anchor);
        self.track.rotation = level.anchor.rotation;
        self.track.cursor = Cursor::initialize(player.transform.travel(), config.segment_length);
        self.player = Some(player);
        for _ in 0..config.segments_to_keep {
            self.track.spawn_next(level, &mut self.factory, &mut self.rng);
        }
        self.state = StreamState::Running;

        tracing::info!(
            segments = self.track.window.len(),
            frontier = self.track.cursor.frontier(),
            "initial segments spawned; streaming"
        );
        Ok(())
    }

    /// Advance one frame. Spawns at most one segment, then retires at most
    /// one. A no-op unless the controller is running.
    pub fn tick(&mut self, player_position: f32) -> TickReport {
        let _span = tracing::info_span!("stream_tick").entered();
        if self.state != StreamState::Running {
            return TickReport::default();
        }
        let Ok(level) = &self.level else {
            return TickReport::default();
        };
        let config = level.config;
        let track = &mut self.track;
        track.cursor.observe(player_position);

        tracing::trace!(
            player = player_position,
            trigger = track.cursor.trigger(config.pre_generation_distance),
            frontier = track.cursor.frontier(),
            active = track.window.len(),
            "frame"
        );

        let mut report = TickReport::default();
        if !track.window.is_empty()
            && track
                .cursor
                .should_spawn(player_position, config.pre_generation_distance)
        {
            report.spawned = Some(track.spawn_next(level, &mut self.factory, &mut self.rng));
        }
        // Retire only after spawning. The window holds keep + 1 until here.
        report.retired = track.retire_overflow(config.segments_to_keep, &mut self.factory);

        track.stats.ticks += 1;
        track.stats.last_tick = report;
        report
    }

    /// Tear the session down: destroy every live segment oldest-first, then
    /// the player. Returns the number of segments destroyed.
    pub fn stop(&mut self) -> usize {
        match self.state {
            StreamState::Running => {}
            StreamState::Ready => {
                self.state = StreamState::Stopped;
                return 0;
            }
            StreamState::Stopped | StreamState::Disabled => return 0,
        }

        let mut drained = 0;
        while let Some(segment) = self.track.window.pop_oldest() {
            self.factory.destroy(segment.id);
            self.track.stats.segments_retired += 1;
            drained += 1;
        }
        if let Some(player) = self.player.take() {
            self.factory.destroy(player.id);
        }
        self.state = StreamState::Stopped;
        tracing::info!(drained, "stream stopped");
        drained
    }

    fn refusal(&self, operation: &'static str) -> StreamError {
        match (&self.level, self.state) {
            (Err(e), StreamState::Disabled) => e.clone(),
            (_, state) => StreamError::InvalidState { operation, state },
        }
    }
}

impl<F, R> StreamController<F, R> {
    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// True between a successful `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.state == StreamState::Running
    }

    /// The error that disabled this controller, if any.
    pub fn fault(&self) -> Option<&StreamError> {
        self.level.as_ref().err()
    }

    /// Validated stream parameters. `None` when disabled.
    pub fn config(&self) -> Option<&StreamConfig> {
        self.level.as_ref().ok().map(|l| &l.config)
    }

    /// Segments currently alive in the world.
    pub fn active_segment_count(&self) -> usize {
        self.track.window.len()
    }

    /// Travel-axis position where the next segment will be placed.
    pub fn frontier_position(&self) -> f32 {
        self.track.cursor.frontier()
    }

    /// Live segments, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &SegmentInstance> {
        self.track.window.iter()
    }

    /// The player spawned by `start`, until `stop` destroys it.
    pub fn player(&self) -> Option<&PlayerAnchor> {
        self.player.as_ref()
    }

    /// Totals since construction.
    pub fn stats(&self) -> &StreamStats {
        &self.track.stats
    }

    /// Read-only access to the world factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Host access to the world, e.g. to move the player between ticks.
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Consume the controller, handing back the factory.
    pub fn into_factory(self) -> F {
        self.factory
    }
}
