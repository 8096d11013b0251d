//! Ordered in-memory index of items.
//!
//! Items are kept sorted by their rank relative to a reference day. Urgency
//! values move by different amounts when the day changes (the shift scales
//! with priority weight), so the index re-ranks everything when asked to
//! refresh for a new day.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::domain::Item;

/// Sort key equivalent to `Item::cmp_at` for items with distinct ids
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    done: bool,
    urgency: i64,
    weight: i64,
    id: String,
}

impl RankKey {
    fn of(item: &Item, today: NaiveDate) -> Self {
        Self {
            done: item.is_done(),
            urgency: item.urgency_value_at(today),
            weight: item.priority().weight(),
            id: item.id().to_string(),
        }
    }
}

/// Items sorted by rank, unique by case-insensitive id
#[derive(Debug, Clone)]
pub struct ItemIndex {
    ranked: BTreeMap<RankKey, Item>,
    keys: HashMap<String, RankKey>,
    ranked_on: NaiveDate,
}

impl ItemIndex {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            ranked: BTreeMap::new(),
            keys: HashMap::new(),
            ranked_on: today,
        }
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Day the current ranking was computed for
    pub fn ranked_on(&self) -> NaiveDate {
        self.ranked_on
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Item> {
        self.keys.get(key).and_then(|rank| self.ranked.get(rank))
    }

    /// Insert or replace the item with the same id; returns the replaced one
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        let previous = self.remove(&item.key());
        let rank = RankKey::of(&item, self.ranked_on);
        self.keys.insert(item.key(), rank.clone());
        self.ranked.insert(rank, item);
        previous
    }

    pub fn remove(&mut self, key: &str) -> Option<Item> {
        let rank = self.keys.remove(key)?;
        self.ranked.remove(&rank)
    }

    /// Items in ascending rank order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.ranked.values()
    }

    /// The most important item
    pub fn first(&self) -> Option<&Item> {
        self.ranked.values().next()
    }

    /// Re-rank every item if `today` differs from the ranking day
    pub fn refresh(&mut self, today: NaiveDate) {
        if today == self.ranked_on {
            return;
        }
        let items: Vec<Item> = std::mem::take(&mut self.ranked).into_values().collect();
        self.keys.clear();
        self.ranked_on = today;
        for item in items {
            self.insert(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use chrono::{DateTime, Local, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due_on(date: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    fn item(id: &str, due: NaiveDate, priority: Priority) -> Item {
        Item::new().with_id(id).with_due_date(due_on(due)).with_priority(priority)
    }

    fn ids(index: &ItemIndex) -> Vec<String> {
        index.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn test_iterates_in_rank_order() {
        let today = day(2026, 3, 10);
        let mut index = ItemIndex::new(today);
        index.insert(item("later", day(2026, 4, 1), Priority::Med));
        index.insert(item("soon", day(2026, 3, 11), Priority::Med));
        index.insert(item("finished", day(2026, 3, 1), Priority::VeryHigh).with_done(true));
        index.insert(item("overdue", day(2026, 3, 8), Priority::Low));

        assert_eq!(ids(&index), vec!["overdue", "soon", "later", "finished"]);
        assert_eq!(index.first().unwrap().id(), "overdue");
    }

    #[test]
    fn test_order_matches_item_comparison() {
        let today = day(2026, 3, 10);
        let mut index = ItemIndex::new(today);
        let mut items = vec![
            item("a", day(2026, 3, 14), Priority::VeryHigh),
            item("b", day(2026, 3, 12), Priority::High),
            item("c", day(2026, 3, 12), Priority::High),
            item("d", day(2026, 3, 9), Priority::VeryLow),
            item("e", day(2026, 3, 9), Priority::VeryLow).with_done(true),
        ];
        for i in &items {
            index.insert(i.clone());
        }
        items.sort_by(|a, b| a.cmp_at(b, today));
        let expected: Vec<String> = items.iter().map(|i| i.id().to_string()).collect();
        assert_eq!(ids(&index), expected);
    }

    #[test]
    fn test_insert_replaces_same_id_ignoring_case() {
        let mut index = ItemIndex::new(day(2026, 3, 10));
        index.insert(item("Task", day(2026, 3, 20), Priority::Low).with_title("old"));
        let replaced = index.insert(item("task", day(2026, 3, 11), Priority::High).with_title("new"));

        assert_eq!(replaced.unwrap().title(), "old");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("task").unwrap().title(), "new");
    }

    #[test]
    fn test_remove() {
        let mut index = ItemIndex::new(day(2026, 3, 10));
        index.insert(item("a", day(2026, 3, 20), Priority::Low));
        assert!(index.remove("a").is_some());
        assert!(index.remove("a").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_refresh_reranks_on_new_day() {
        // On day 10: a = 4*1 = 4, b = 1*5 = 5 -> a first
        // On day 11: a = 3*1 = 3, b = 0*5 = 0 -> b first
        let mut index = ItemIndex::new(day(2026, 3, 10));
        index.insert(item("a", day(2026, 3, 14), Priority::VeryHigh));
        index.insert(item("b", day(2026, 3, 11), Priority::VeryLow));
        assert_eq!(ids(&index), vec!["a", "b"]);

        index.refresh(day(2026, 3, 11));
        assert_eq!(index.ranked_on(), day(2026, 3, 11));
        assert_eq!(ids(&index), vec!["b", "a"]);
        assert!(index.get("a").is_some());
    }
}
