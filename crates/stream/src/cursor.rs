/// Frontier and player positions along the travel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    frontier: f32,
    player: f32,
    segment_length: f32,
}

impl Cursor {
    /// Place the frontier half a segment ahead of the player so the first
    /// segment starts in front of the spawn point instead of overlapping it.
    pub fn initialize(player_start: f32, segment_length: f32) -> Self {
        Self {
            frontier: player_start + segment_length / 2.0,
            player: player_start,
            segment_length,
        }
    }

    /// Position where the next segment will be placed.
    pub fn frontier(&self) -> f32 {
        self.frontier
    }

    /// Last player position reported through [`Cursor::observe`].
    pub fn player(&self) -> f32 {
        self.player
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    pub fn observe(&mut self, player_position: f32) {
        self.player = player_position;
    }

    /// Move the frontier forward by exactly one segment.
    pub fn advance(&mut self) {
        self.frontier += self.segment_length;
    }

    /// Travel-axis position the player must reach to trigger the next spawn.
    pub fn trigger(&self, pre_generation_distance: f32) -> f32 {
        self.frontier - pre_generation_distance
    }

    pub fn should_spawn(&self, player_position: f32, pre_generation_distance: f32) -> bool {
        player_position >= self.trigger(pre_generation_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_offsets_by_half_segment() {
        let c = Cursor::initialize(-4.75, 10.0);
        assert_eq!(c.frontier(), 0.25);
        assert_eq!(c.player(), -4.75);
    }

    #[test]
    fn advance_adds_one_segment() {
        let mut c = Cursor::initialize(0.0, 10.0);
        c.advance();
        c.advance();
        assert_eq!(c.frontier(), 25.0);
    }

    #[test]
    fn trigger_is_inclusive() {
        let c = Cursor::initialize(0.0, 10.0);
        // frontier = 5, trigger = -35
        assert!(c.should_spawn(-35.0, 40.0));
        assert!(!c.should_spawn(-35.5, 40.0));
        assert!(c.should_spawn(100.0, 40.0));
    }

    #[test]
    fn zero_look_ahead_triggers_at_frontier() {
        let c = Cursor::initialize(0.0, 4.0);
        assert!(!c.should_spawn(1.9, 0.0));
        assert!(c.should_spawn(2.0, 0.0));
    }
}
