//! Item record and its ranking order
//!
//! An Item is one entry on the priority list. Items are identified by a
//! case-insensitive id; two items with the same id are equal no matter what
//! else differs. The total order puts open items before done ones, then ranks
//! by urgency value (`days until due * priority weight`, lower first), then by
//! priority weight, then by id.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::priority::Priority;
use crate::error::PrioritError;
use crate::id::{generate_item_id, id_key, validate_item_id};

/// Days until a new item is due
pub const DEFAULT_DUE_DAYS: i64 = 30;

/// The local calendar date used for ranking
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One entry on the priority list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ItemFields")]
pub struct Item {
    id: String,
    title: String,
    text: String,
    categories: BTreeSet<Category>,
    due_date: DateTime<Utc>,
    priority: Priority,
    done: bool,
}

/// Unchecked field set, validated into an Item on deserialization
#[derive(Deserialize)]
struct ItemFields {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    categories: BTreeSet<Category>,
    due_date: DateTime<Utc>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    done: bool,
}

impl TryFrom<ItemFields> for Item {
    type Error = PrioritError;

    fn try_from(fields: ItemFields) -> Result<Self, Self::Error> {
        validate_item_id(&fields.id)?;
        let mut item = Item {
            id: fields.id,
            title: fields.title,
            text: fields.text,
            categories: BTreeSet::new(),
            due_date: fields.due_date,
            priority: fields.priority,
            done: fields.done,
        };
        item.set_categories(fields.categories);
        Ok(item)
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl Item {
    /// Create an item with a generated id, due in 30 days, in category "none"
    pub fn new() -> Self {
        Self {
            id: generate_item_id(),
            title: String::new(),
            text: String::new(),
            categories: BTreeSet::from([Category::default()]),
            due_date: Utc::now() + Duration::days(DEFAULT_DUE_DAYS),
            priority: Priority::default(),
            done: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.set_categories(categories);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    /// Category names in case-insensitive order
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the category set. An empty set falls back to "none".
    pub fn set_categories<I, C>(&mut self, categories: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        if self.categories.is_empty() {
            self.categories.insert(Category::default());
        }
    }

    pub fn set_due_date(&mut self, due_date: DateTime<Utc>) {
        self.due_date = due_date;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Lowercased id, the key used for lookup and file naming
    pub fn key(&self) -> String {
        id_key(&self.id)
    }

    /// Signed number of calendar days from `today` to the due date
    pub fn days_until_at(&self, today: NaiveDate) -> i64 {
        let due = self.due_date.with_timezone(&Local).date_naive();
        (due - today).num_days()
    }

    /// Urgency value relative to `today`; lower is more important
    pub fn urgency_value_at(&self, today: NaiveDate) -> i64 {
        self.days_until_at(today) * self.priority.weight()
    }

    pub fn urgency_value(&self) -> i64 {
        self.urgency_value_at(today())
    }

    /// Total order relative to `today`.
    ///
    /// Same id (ignoring case) is Equal regardless of content.
    pub fn cmp_at(&self, other: &Item, today: NaiveDate) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        match (self.done, other.done) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => self
                .urgency_value_at(today)
                .cmp(&other.urgency_value_at(today))
                .then_with(|| self.priority.weight().cmp(&other.priority.weight()))
                .then_with(|| self.id.cmp(&other.id)),
        }
    }

    /// Field-for-field comparison, unlike `==` which only looks at the id
    pub fn same_content(&self, other: &Item) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.text == other.text
            && self.category_names() == other.category_names()
            && self.due_date == other.due_date
            && self.priority == other.priority
            && self.done == other.done
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_at(other, today())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Item [id={}, title={}, categories={}, due={}, priority={}, done={}]",
            self.id,
            self.title,
            self.category_names().join(","),
            self.due_date.with_timezone(&Local).format("%Y-%m-%d"),
            self.priority,
            self.done
        )
    }
}
