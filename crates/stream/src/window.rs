use std::collections::VecDeque;

use runner_common::{EntityId, TemplateId};

/// A live segment owned by the window until it is retired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInstance {
    pub id: EntityId,
    /// Insertion index, strictly increasing across the session.
    pub order: u64,
    pub template: TemplateId,
    /// Travel-axis position the segment was placed at.
    pub position: f32,
}

/// FIFO of live segments, oldest first.
#[derive(Debug, Default)]
pub struct SegmentWindow {
    segments: VecDeque<SegmentInstance>,
    next_order: u64,
}

impl SegmentWindow {
    /// Empty window; insertion order starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly spawned segment at the tail. Returns the stored instance.
    pub fn push(&mut self, id: EntityId, template: TemplateId, position: f32) -> SegmentInstance {
        debug_assert!(
            self.newest().is_none_or(|s| s.id != id),
            "segment {id:?} pushed twice"
        );
        let instance = SegmentInstance {
            id,
            order: self.next_order,
            template,
            position,
        };
        self.next_order += 1;
        self.segments.push_back(instance);
        instance
    }

    /// Remove the head iff the window holds more than `keep` segments.
    pub fn pop_oldest_if_overflow(&mut self, keep: usize) -> Option<SegmentInstance> {
        if self.segments.len() > keep {
            self.segments.pop_front()
        } else {
            None
        }
    }

    /// Remove the head unconditionally (teardown).
    pub fn pop_oldest(&mut self) -> Option<SegmentInstance> {
        self.segments.pop_front()
    }

    /// Number of live segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment the player passed longest ago; next to be retired.
    pub fn oldest(&self) -> Option<&SegmentInstance> {
        self.segments.front()
    }

    /// Segment sitting just behind the frontier.
    pub fn newest(&self) -> Option<&SegmentInstance> {
        self.segments.back()
    }

    /// Live segments, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentInstance> {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> (SegmentWindow, Vec<EntityId>) {
        let mut w = SegmentWindow::new();
        let ids: Vec<_> = (0..n).map(|_| EntityId::new()).collect();
        for (i, id) in ids.iter().enumerate() {
            w.push(*id, TemplateId(0), i as f32 * 10.0);
        }
        (w, ids)
    }

    #[test]
    fn push_assigns_increasing_order() {
        let (w, _) = filled(3);
        let orders: Vec<u64> = w.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn no_pop_at_or_below_keep() {
        let (mut w, _) = filled(5);
        assert!(w.pop_oldest_if_overflow(5).is_none());
        assert!(w.pop_oldest_if_overflow(6).is_none());
        assert_eq!(w.len(), 5);
    }

    #[test]
    fn overflow_pops_oldest() {
        let (mut w, ids) = filled(6);
        let popped = w.pop_oldest_if_overflow(5).unwrap();
        assert_eq!(popped.id, ids[0]);
        assert_eq!(popped.order, 0);
        assert_eq!(w.len(), 5);
        assert_eq!(w.oldest().unwrap().id, ids[1]);
        assert_eq!(w.newest().unwrap().id, ids[5]);
    }

    #[test]
    fn order_keeps_counting_after_pops() {
        let (mut w, _) = filled(2);
        w.pop_oldest();
        w.pop_oldest();
        assert!(w.is_empty());
        let again = w.push(EntityId::new(), TemplateId(1), 0.0);
        assert_eq!(again.order, 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "pushed twice")]
    fn repeated_push_of_newest_is_caught() {
        let mut w = SegmentWindow::new();
        let id = EntityId::new();
        w.push(id, TemplateId(0), 0.0);
        w.push(id, TemplateId(0), 10.0);
    }

    #[test]
    fn empty_window_pops_nothing() {
        let mut w = SegmentWindow::new();
        assert!(w.pop_oldest_if_overflow(0).is_none());
        assert!(w.pop_oldest().is_none());
    }
}
