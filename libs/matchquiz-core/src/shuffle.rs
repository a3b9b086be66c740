//! Turning a taxonomy into a playable board.

use crate::taxonomy::{display_title, Taxonomy};
use crate::types::{BoxId, IdAllocator, ItemId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// A subtopic waiting in the drag-source pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragItem {
    pub id: ItemId,
    pub display_name: String,
    pub correct_topic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Index within the owning topic's subtopic list.
    pub original_order: usize,
}

/// A subtopic that has been matched to its topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedItem {
    pub id: ItemId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub original_order: usize,
}

impl PlacedItem {
    /// Title for the detail view.
    pub fn title(&self) -> String {
        display_title(self.key.as_deref(), &self.display_name)
    }
}

impl From<DragItem> for PlacedItem {
    fn from(item: DragItem) -> Self {
        Self {
            id: item.id,
            display_name: item.display_name,
            comment: item.comment,
            key: item.key,
            original_order: item.original_order,
        }
    }
}

/// A drop target for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicBox {
    pub id: BoxId,
    pub topic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Sorted by `original_order`.
    pub placed: Vec<PlacedItem>,
}

impl TopicBox {
    /// Insert keeping `placed` ordered by original subtopic order.
    /// Returns the child index the item landed at.
    pub fn place(&mut self, item: PlacedItem) -> usize {
        let index = self
            .placed
            .partition_point(|p| p.original_order < item.original_order);
        self.placed.insert(index, item);
        index
    }

    pub fn title(&self) -> String {
        display_title(self.key.as_deref(), &self.topic_name)
    }
}

/// Flatten every subtopic into a drag item and shuffle the result.
pub fn build_drag_items<R: Rng + ?Sized>(
    taxonomy: &Taxonomy,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Vec<DragItem> {
    let mut items = Vec::with_capacity(taxonomy.subtopic_count());

    for topic in &taxonomy.topics.values {
        for (order, subtopic) in topic.subtopics.iter().enumerate() {
            items.push(DragItem {
                id: ids.next_item(),
                display_name: subtopic.name.clone(),
                correct_topic_name: topic.name.clone(),
                comment: subtopic.comment.clone(),
                key: subtopic.key.clone(),
                original_order: order,
            });
        }
    }

    items.shuffle(rng);
    items
}

/// One empty box per topic, in taxonomy order.
pub fn build_topic_boxes(taxonomy: &Taxonomy, ids: &mut IdAllocator) -> Vec<TopicBox> {
    taxonomy
        .topics
        .values
        .iter()
        .map(|topic| TopicBox {
            id: ids.next_box(),
            topic_name: topic.name.clone(),
            key: topic.key.clone(),
            comment: topic.comment.clone(),
            placed: Vec::new(),
        })
        .collect()
}

/// Drag-source pool plus topic boxes for one round.
#[derive(Debug, Default)]
pub struct Board {
    order: Vec<ItemId>,
    pool: HashMap<ItemId, DragItem>,
    boxes: Vec<TopicBox>,
}

impl Board {
    pub fn build<R: Rng + ?Sized>(taxonomy: &Taxonomy, ids: &mut IdAllocator, rng: &mut R) -> Self {
        let items = build_drag_items(taxonomy, ids, rng);
        let boxes = build_topic_boxes(taxonomy, ids);
        let order = items.iter().map(|item| item.id).collect();
        let pool = items.into_iter().map(|item| (item.id, item)).collect();
        Self { order, pool, boxes }
    }

    /// Items still in the pool, in display order.
    pub fn pool_items(&self) -> impl Iterator<Item = &DragItem> {
        self.order.iter().filter_map(|id| self.pool.get(id))
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn item(&self, id: ItemId) -> Option<&DragItem> {
        self.pool.get(&id)
    }

    /// Remove an item from the pool for good.
    pub fn take_item(&mut self, id: ItemId) -> Option<DragItem> {
        let item = self.pool.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(item)
    }

    pub fn boxes(&self) -> &[TopicBox] {
        &self.boxes
    }

    pub fn topic_box(&self, id: BoxId) -> Option<&TopicBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn topic_box_mut(&mut self, id: BoxId) -> Option<&mut TopicBox> {
        self.boxes.iter_mut().find(|b| b.id == id)
    }

    /// Find a placed item anywhere on the board.
    pub fn placed_item(&self, id: ItemId) -> Option<&PlacedItem> {
        self.boxes
            .iter()
            .flat_map(|b| b.placed.iter())
            .find(|p| p.id == id)
    }

    pub fn is_complete(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn one_item_per_subtopic_with_owning_topic() {
        let taxonomy = Taxonomy::sample();
        let items = build_drag_items(&taxonomy, &mut IdAllocator::new(), &mut rng());
        assert_eq!(items.len(), taxonomy.subtopic_count());

        for item in &items {
            let topic = taxonomy.topic(&item.correct_topic_name).unwrap();
            assert_eq!(topic.subtopics[item.original_order].name, item.display_name);
        }

        let ids: HashSet<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn original_order_is_per_topic() {
        let taxonomy = Taxonomy::sample();
        let items = build_drag_items(&taxonomy, &mut IdAllocator::new(), &mut rng());
        let algebra = items.iter().find(|i| i.display_name == "Algebra").unwrap();
        let loops = items.iter().find(|i| i.display_name == "Loops").unwrap();
        assert_eq!(algebra.original_order, 0);
        assert_eq!(loops.original_order, 2);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let taxonomy = Taxonomy::sample();
        let mut names: Vec<_> = build_drag_items(&taxonomy, &mut IdAllocator::new(), &mut rng())
            .into_iter()
            .map(|i| i.display_name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Algebra", "Functions", "Geometry", "Loops", "Variables"]);
    }

    #[test]
    fn boxes_follow_taxonomy_order() {
        let taxonomy = Taxonomy::sample();
        let boxes = build_topic_boxes(&taxonomy, &mut IdAllocator::new());
        let names: Vec<_> = boxes.iter().map(|b| b.topic_name.as_str()).collect();
        assert_eq!(names, vec!["Programming", "Mathematics"]);
        assert_eq!(boxes[0].title(), "PROG - Programming");
        assert!(boxes.iter().all(|b| b.placed.is_empty()));
    }

    #[test]
    fn place_keeps_original_order() {
        let mut topic_box = TopicBox {
            id: BoxId(0),
            topic_name: "Programming".into(),
            key: None,
            comment: None,
            placed: Vec::new(),
        };
        let placed = |order: usize, name: &str| PlacedItem {
            id: ItemId(order as u32 + 10),
            display_name: name.into(),
            comment: None,
            key: None,
            original_order: order,
        };

        assert_eq!(topic_box.place(placed(2, "Loops")), 0);
        assert_eq!(topic_box.place(placed(0, "Variables")), 0);
        assert_eq!(topic_box.place(placed(1, "Functions")), 1);

        let names: Vec<_> = topic_box.placed.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Variables", "Functions", "Loops"]);
    }

    #[test]
    fn taken_items_leave_the_pool() {
        let mut board = Board::build(&Taxonomy::sample(), &mut IdAllocator::new(), &mut rng());
        let first = board.pool_items().next().unwrap().id;

        assert!(board.take_item(first).is_some());
        assert!(board.item(first).is_none());
        assert!(board.take_item(first).is_none());
        assert_eq!(board.pool_len(), 4);
        assert_eq!(board.pool_items().count(), 4);
    }
}
