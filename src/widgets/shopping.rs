//! Shopping List Widget
//!
//! An ordered list whose display order is its priority. After every change
//! the items are renumbered so priorities are exactly `1..=N`.
//!
//! ```text
//! [A(1), B(2), C(3)]  --move_up(C)-->  [A(1), C(2), B(3)]  --remove(A)-->  [C(1), B(2)]
//! ```

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, required, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ITEMS_KEY: &str = "items";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
    pub priority: u32,
}

impl ShoppingItem {
    pub fn band(&self) -> PriorityBand {
        PriorityBand::for_priority(self.priority)
    }
}

/// Display band derived from a priority, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn for_priority(priority: u32) -> Self {
        match priority {
            0..=3 => PriorityBand::High,
            4..=6 => PriorityBand::Medium,
            _ => PriorityBand::Low,
        }
    }
}

pub struct ShoppingList {
    ns: Namespace,
    items: Vec<ShoppingItem>,
}

impl Widget for ShoppingList {
    const NAMESPACE: &'static str = "shopping";

    fn reset(&mut self) {
        self.items.clear();
    }
}

impl ShoppingList {
    /// Hydrate the list from `store`
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let mut items: Vec<ShoppingItem> = ns.load_or_default(ITEMS_KEY);
        renumber(&mut items);

        tracing::info!(items = items.len(), "Shopping list mounted");
        Self { ns, items }
    }

    /// Items in priority order
    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item at the lowest priority
    pub fn add(&mut self, name: &str) -> WidgetResult<ShoppingItem> {
        let name = required(name, "Item name")?;

        let item = ShoppingItem {
            id: new_id(),
            name,
            added_at: Utc::now(),
            priority: self.items.len() as u32 + 1,
        };

        let mut next = self.items.clone();
        next.push(item.clone());
        self.commit(next)?;

        tracing::info!(id = %item.id, name = %item.name, "Shopping item added");
        Ok(item)
    }

    pub fn remove(&mut self, id: &str) -> WidgetResult<ShoppingItem> {
        let index = self.position(id)?;

        let mut next = self.items.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        tracing::info!(id = %removed.id, "Shopping item removed");
        Ok(removed)
    }

    /// Swap with the previous item; `false` when already first
    pub fn move_up(&mut self, id: &str) -> WidgetResult<bool> {
        let index = self.position(id)?;
        if index == 0 {
            return Ok(false);
        }
        self.swap(index, index - 1)
    }

    /// Swap with the next item; `false` when already last
    pub fn move_down(&mut self, id: &str) -> WidgetResult<bool> {
        let index = self.position(id)?;
        if index + 1 >= self.items.len() {
            return Ok(false);
        }
        self.swap(index, index + 1)
    }

    fn swap(&mut self, a: usize, b: usize) -> WidgetResult<bool> {
        let mut next = self.items.clone();
        next.swap(a, b);
        self.commit(next)?;

        tracing::debug!(from = a + 1, to = b + 1, "Shopping item moved");
        Ok(true)
    }

    fn position(&self, id: &str) -> WidgetResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| WidgetError::NotFound(format!("shopping item {}", id)))
    }

    fn commit(&mut self, mut next: Vec<ShoppingItem>) -> WidgetResult<()> {
        renumber(&mut next);
        self.ns.save(ITEMS_KEY, &next)?;
        self.items = next;
        Ok(())
    }
}

fn renumber(items: &mut [ShoppingItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.priority = index as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn list() -> (ShoppingList, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (ShoppingList::mount(Arc::clone(&store)), store)
    }

    fn names(list: &ShoppingList) -> Vec<&str> {
        list.items().iter().map(|i| i.name.as_str()).collect()
    }

    fn assert_contiguous(list: &ShoppingList) {
        for (index, item) in list.items().iter().enumerate() {
            assert_eq!(item.priority, index as u32 + 1);
        }
    }

    #[test]
    fn test_add_assigns_next_priority() {
        let (mut list, _) = list();
        let a = list.add(" milk ").unwrap();
        let b = list.add("eggs").unwrap();

        assert_eq!(a.name, "milk");
        assert_eq!(a.priority, 1);
        assert_eq!(b.priority, 2);
        assert_contiguous(&list);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let (mut list, _) = list();
        assert!(matches!(list.add("  "), Err(WidgetError::Validation(_))));
        assert!(list.is_empty());
    }

    #[test]
    fn test_move_and_remove() {
        let (mut list, _) = list();
        let a = list.add("A").unwrap();
        list.add("B").unwrap();
        let c = list.add("C").unwrap();

        assert!(list.move_up(&c.id).unwrap());
        assert_eq!(names(&list), vec!["A", "C", "B"]);
        assert_contiguous(&list);

        list.remove(&a.id).unwrap();
        assert_eq!(names(&list), vec!["C", "B"]);
        assert_contiguous(&list);
    }

    #[test]
    fn test_boundary_moves_are_noops() {
        let (mut list, _) = list();
        let a = list.add("A").unwrap();
        let b = list.add("B").unwrap();

        assert!(!list.move_up(&a.id).unwrap());
        assert!(!list.move_down(&b.id).unwrap());
        assert_eq!(names(&list), vec!["A", "B"]);

        assert!(list.move_down(&a.id).unwrap());
        assert_eq!(names(&list), vec!["B", "A"]);
    }

    #[test]
    fn test_unknown_id() {
        let (mut list, _) = list();
        list.add("A").unwrap();

        assert!(matches!(list.remove("nope"), Err(WidgetError::NotFound(_))));
        assert!(matches!(list.move_up("nope"), Err(WidgetError::NotFound(_))));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_state_survives_remount() {
        let (mut list, store) = list();
        list.add("A").unwrap();
        let b = list.add("B").unwrap();
        list.move_up(&b.id).unwrap();

        let remounted = ShoppingList::mount(store);
        assert_eq!(names(&remounted), vec!["B", "A"]);
        assert_contiguous(&remounted);
    }

    #[test]
    fn test_random_sequences_keep_priorities_contiguous() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (mut list, store) = list();
            let mut model: Vec<String> = Vec::new();

            for step in 0..200 {
                let picked = if model.is_empty() {
                    None
                } else {
                    Some(rng.gen_range(0..model.len()))
                };
                let id_at = |list: &ShoppingList, i: usize| list.items()[i].id.clone();

                match (rng.gen_range(0..4), picked) {
                    (0, _) | (_, None) => {
                        let name = format!("item-{}-{}", seed, step);
                        list.add(&name).unwrap();
                        model.push(name);
                    }
                    (1, Some(i)) => {
                        list.remove(&id_at(&list, i)).unwrap();
                        model.remove(i);
                    }
                    (2, Some(i)) => {
                        let moved = list.move_up(&id_at(&list, i)).unwrap();
                        assert_eq!(moved, i > 0);
                        if i > 0 {
                            model.swap(i, i - 1);
                        }
                    }
                    (_, Some(i)) => {
                        let moved = list.move_down(&id_at(&list, i)).unwrap();
                        assert_eq!(moved, i + 1 < model.len());
                        if i + 1 < model.len() {
                            model.swap(i, i + 1);
                        }
                    }
                }

                assert_contiguous(&list);
                assert_eq!(names(&list), model);
            }

            let remounted = ShoppingList::mount(store);
            assert_contiguous(&remounted);
            assert_eq!(names(&remounted), model);
        }
    }

    #[test]
    fn test_priority_bands() {
        assert_eq!(PriorityBand::for_priority(1), PriorityBand::High);
        assert_eq!(PriorityBand::for_priority(3), PriorityBand::High);
        assert_eq!(PriorityBand::for_priority(4), PriorityBand::Medium);
        assert_eq!(PriorityBand::for_priority(6), PriorityBand::Medium);
        assert_eq!(PriorityBand::for_priority(7), PriorityBand::Low);
        assert_eq!(PriorityBand::for_priority(40), PriorityBand::Low);
    }
}
