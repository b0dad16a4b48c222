//! In-memory backing for the stores.
//!
//! A [`Table`] keeps rows in insertion order (the order list views report)
//! next to an id index, so lookups by id do not scan.

use std::collections::HashMap;
use crate::models::{Conversation, Message, Task, User};

/// Something addressable by a stable string id.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Message {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Conversation {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Collection the stores own. Swap the implementation to move a store onto a
/// different backing without touching its operations.
pub trait Repository<T: Record>: Send + Sync {
    fn get(&self, id: &str) -> Option<&T>;

    fn get_mut(&mut self, id: &str) -> Option<&mut T>;

    /// Appends `row`, or replaces the row that already has its id.
    fn insert(&mut self, row: T);

    fn remove(&mut self, id: &str) -> Option<T>;

    /// All rows, in insertion order.
    fn rows(&self) -> &[T];

    fn rows_mut(&mut self) -> &mut [T];
}

#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record + Send + Sync> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(rows: I) -> Self {
        let mut table = Table::default();
        for row in rows {
            table.insert(row);
        }
        table
    }
}

impl<T: Record + Send + Sync> Repository<T> for Table<T> {
    fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.rows[pos])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        match self.index.get(id) {
            Some(&pos) => Some(&mut self.rows[pos]),
            None => None,
        }
    }

    fn insert(&mut self, row: T) {
        match self.index.get(row.id()) {
            Some(&pos) => self.rows[pos] = row,
            None => {
                self.index.insert(row.id().to_string(), self.rows.len());
                self.rows.push(row);
            }
        }
    }

    fn remove(&mut self, id: &str) -> Option<T> {
        let pos = self.index.remove(id)?;
        let row = self.rows.remove(pos);
        // Rows after `pos` shifted down by one.
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(row)
    }

    fn rows(&self) -> &[T] {
        &self.rows
    }

    // Callers must not change ids through this slice.
    fn rows_mut(&mut self) -> &mut [T] {
        &mut self.rows
    }
}
