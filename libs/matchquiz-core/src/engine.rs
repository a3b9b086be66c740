//! Drag/drop state machine.
//!
//! `Idle → Dragging → Idle`. A drop resolves on the spot; nothing else ever
//! observes an in-between state.

use crate::error_log::WrongLogEntry;
use crate::session::SessionState;
use crate::shuffle::{Board, DragItem, PlacedItem, TopicBox};
use crate::taxonomy::Taxonomy;
use crate::types::{BoxId, DropTarget, IdAllocator, ItemId, Verdict};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "item")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ItemId),
}

/// What a drop did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum DropResolution {
    /// The item left the pool and now sits at `index` inside the box.
    Correct { item: ItemId, box_id: BoxId, index: usize },
    /// The item stays in the pool.
    Incorrect { item: ItemId, box_id: BoxId },
}

impl DropResolution {
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Correct { .. } => Verdict::Correct,
            Self::Incorrect { .. } => Verdict::Incorrect,
        }
    }

    pub fn box_id(&self) -> BoxId {
        match self {
            Self::Correct { box_id, .. } | Self::Incorrect { box_id, .. } => *box_id,
        }
    }
}

/// Decide whether `item` belongs in `topic_box`.
pub fn evaluate_drop(topic_box: &TopicBox, item: &DragItem) -> Verdict {
    if topic_box.topic_name == item.correct_topic_name {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

#[derive(Debug, Default)]
pub struct DragMatchEngine {
    ids: IdAllocator,
    board: Board,
    drag: DragState,
}

impl DragMatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the board with a freshly shuffled one.
    pub fn deal<R: Rng + ?Sized>(&mut self, taxonomy: &Taxonomy, rng: &mut R) -> &Board {
        self.board = Board::build(taxonomy, &mut self.ids, rng);
        self.drag = DragState::Idle;
        &self.board
    }

    /// Drop the board entirely (no taxonomy loaded).
    pub fn clear(&mut self) {
        self.board = Board::default();
        self.drag = DragState::Idle;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Start dragging `item`. Items not in the pool are ignored.
    pub fn begin_drag(&mut self, item: ItemId) -> bool {
        if self.board.item(item).is_none() {
            tracing::debug!(%item, "ignoring drag of unknown item");
            return false;
        }
        self.drag = DragState::Dragging(item);
        true
    }

    /// End of the drag gesture, dropped or not.
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Resolve a pointer release. Returns `None` when nothing happens:
    /// no drag in progress, release outside any box, or a stale id.
    pub fn drop_on(
        &mut self,
        target: DropTarget,
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> Option<DropResolution> {
        let DragState::Dragging(item_id) = std::mem::take(&mut self.drag) else {
            return None;
        };
        let DropTarget::Box(box_id) = target else {
            return None;
        };

        let topic_box = self.board.topic_box(box_id)?;
        let item = self.board.item(item_id)?;
        let verdict = evaluate_drop(topic_box, item);
        state.score.record(verdict);

        match verdict {
            Verdict::Correct => {
                let item = self.board.take_item(item_id)?;
                let index = self
                    .board
                    .topic_box_mut(box_id)?
                    .place(PlacedItem::from(item));
                tracing::debug!(item = %item_id, box_id = %box_id, index, "correct drop");
                Some(DropResolution::Correct {
                    item: item_id,
                    box_id,
                    index,
                })
            }
            Verdict::Incorrect => {
                state.log.record(WrongLogEntry {
                    subtopic_name: item.display_name.clone(),
                    dropped_into: topic_box.topic_name.clone(),
                    correct_topic: item.correct_topic_name.clone(),
                    timestamp: now,
                });
                tracing::debug!(item = %item_id, box_id = %box_id, "incorrect drop");
                Some(DropResolution::Incorrect {
                    item: item_id,
                    box_id,
                })
            }
        }
    }

    /// Title and comment for a placed item, if it has a comment to show.
    pub fn placed_detail(&self, item: ItemId) -> Option<(String, String)> {
        let placed = self.board.placed_item(item)?;
        let comment = placed.comment.as_deref().filter(|c| !c.is_empty())?;
        Some((placed.title(), comment.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoreState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dealt() -> DragMatchEngine {
        let mut engine = DragMatchEngine::new();
        engine.deal(&Taxonomy::sample(), &mut StdRng::seed_from_u64(1));
        engine
    }

    fn item_named(engine: &DragMatchEngine, name: &str) -> ItemId {
        engine
            .board()
            .pool_items()
            .find(|i| i.display_name == name)
            .map(|i| i.id)
            .unwrap()
    }

    fn box_named(engine: &DragMatchEngine, name: &str) -> BoxId {
        engine
            .board()
            .boxes()
            .iter()
            .find(|b| b.topic_name == name)
            .map(|b| b.id)
            .unwrap()
    }

    fn drag_and_drop(
        engine: &mut DragMatchEngine,
        state: &mut SessionState,
        item: &str,
        topic: &str,
    ) -> Option<DropResolution> {
        let item = item_named(engine, item);
        let target = DropTarget::Box(box_named(engine, topic));
        assert!(engine.begin_drag(item));
        let resolution = engine.drop_on(target, state, Utc::now());
        engine.end_drag();
        resolution
    }

    #[test]
    fn correct_drop_consumes_item() {
        let mut engine = dealt();
        let mut state = SessionState::default();
        let loops = item_named(&engine, "Loops");

        let resolution = drag_and_drop(&mut engine, &mut state, "Loops", "Programming").unwrap();
        assert_eq!(resolution.verdict(), Verdict::Correct);
        assert_eq!(state.score.correct, 1);
        assert_eq!(state.score.wrong, 0);
        assert_eq!(engine.board().pool_len(), 4);

        // Consumed items can't be dragged again.
        assert!(!engine.begin_drag(loops));
        assert_eq!(engine.drag_state(), DragState::Idle);
    }

    #[test]
    fn incorrect_drop_logs_and_keeps_item() {
        let mut engine = dealt();
        let mut state = SessionState::default();

        let resolution = drag_and_drop(&mut engine, &mut state, "Algebra", "Programming").unwrap();
        assert_eq!(resolution.verdict(), Verdict::Incorrect);
        assert_eq!(state.score.wrong, 1);
        assert_eq!(engine.board().pool_len(), 5);

        let entry = &state.log.entries()[0];
        assert_eq!(entry.subtopic_name, "Algebra");
        assert_eq!(entry.dropped_into, "Programming");
        assert_eq!(entry.correct_topic, "Mathematics");

        // Retry succeeds.
        let retry = drag_and_drop(&mut engine, &mut state, "Algebra", "Mathematics").unwrap();
        assert_eq!(retry.verdict(), Verdict::Correct);
        assert_eq!(state.score.correct, 1);
    }

    #[test]
    fn placed_items_follow_original_order() {
        let mut engine = dealt();
        let mut state = SessionState::default();

        let first = drag_and_drop(&mut engine, &mut state, "Loops", "Programming").unwrap();
        let second = drag_and_drop(&mut engine, &mut state, "Variables", "Programming").unwrap();
        let third = drag_and_drop(&mut engine, &mut state, "Functions", "Programming").unwrap();

        assert!(matches!(first, DropResolution::Correct { index: 0, .. }));
        assert!(matches!(second, DropResolution::Correct { index: 0, .. }));
        assert!(matches!(third, DropResolution::Correct { index: 1, .. }));

        let programming = box_named(&engine, "Programming");
        let names: Vec<_> = engine
            .board()
            .topic_box(programming)
            .unwrap()
            .placed
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Variables", "Functions", "Loops"]);
    }

    #[test]
    fn drop_outside_is_ignored() {
        let mut engine = dealt();
        let mut state = SessionState::default();
        let item = item_named(&engine, "Loops");

        engine.begin_drag(item);
        assert!(engine.drop_on(DropTarget::Outside, &mut state, Utc::now()).is_none());
        assert_eq!(engine.drag_state(), DragState::Idle);
        assert_eq!(state.score, ScoreState::default());
        assert_eq!(engine.board().pool_len(), 5);
    }

    #[test]
    fn drop_while_idle_is_ignored() {
        let mut engine = dealt();
        let mut state = SessionState::default();
        let target = DropTarget::Box(box_named(&engine, "Programming"));
        assert!(engine.drop_on(target, &mut state, Utc::now()).is_none());
        assert_eq!(state.score, ScoreState::default());
    }

    #[test]
    fn drop_on_unknown_box_is_ignored() {
        let mut engine = dealt();
        let mut state = SessionState::default();
        let item = item_named(&engine, "Loops");
        engine.begin_drag(item);
        assert!(engine
            .drop_on(DropTarget::Box(BoxId(9_999)), &mut state, Utc::now())
            .is_none());
    }

    #[test]
    fn end_drag_cancels() {
        let mut engine = dealt();
        let item = item_named(&engine, "Geometry");
        engine.begin_drag(item);
        assert_eq!(engine.drag_state(), DragState::Dragging(item));
        engine.end_drag();
        assert_eq!(engine.drag_state(), DragState::Idle);
    }

    #[test]
    fn ids_from_previous_deal_are_stale() {
        let mut engine = dealt();
        let old = item_named(&engine, "Loops");
        engine.deal(&Taxonomy::sample(), &mut StdRng::seed_from_u64(2));
        assert!(!engine.begin_drag(old));
        assert_eq!(engine.board().pool_len(), 5);
    }

    #[test]
    fn placed_detail_uses_key_in_title() {
        let mut engine = dealt();
        let mut state = SessionState::default();
        let variables = item_named(&engine, "Variables");
        drag_and_drop(&mut engine, &mut state, "Variables", "Programming");

        let (title, comment) = engine.placed_detail(variables).unwrap();
        assert_eq!(title, "P01 - Variables");
        assert_eq!(comment, "Storage containers for data values in programming.");
    }

    #[test]
    fn evaluate_drop_compares_topic_names() {
        let engine = dealt();
        let item = engine.board().pool_items().next().unwrap();
        let own = engine
            .board()
            .boxes()
            .iter()
            .find(|b| b.topic_name == item.correct_topic_name)
            .unwrap();
        let other = engine
            .board()
            .boxes()
            .iter()
            .find(|b| b.topic_name != item.correct_topic_name)
            .unwrap();
        assert_eq!(evaluate_drop(own, item), Verdict::Correct);
        assert_eq!(evaluate_drop(other, item), Verdict::Incorrect);
    }
}
