use crate::error::Result;
use crate::predicate::{Predicate, Record};

/// Anything that can run a composed predicate and hand back the matches.
/// `None` selects every entity.
pub trait QueryableCollection {
    type Entity;
    fn find_matching(&self, predicate: Option<&Predicate>) -> Result<Vec<Self::Entity>>;
}

/// Entities held in memory, returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection<E> {
    entities: Vec<E>,
}

impl<E> MemoryCollection<E> {
    pub fn new(entities: Vec<E>) -> Self {
        Self { entities }
    }
    pub fn push(&mut self, entity: E) {
        self.entities.push(entity);
    }
    pub fn len(&self) -> usize {
        self.entities.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<E: Record + Clone> QueryableCollection for MemoryCollection<E> {
    type Entity = E;
    fn find_matching(&self, predicate: Option<&Predicate>) -> Result<Vec<E>> {
        Ok(self
            .entities
            .iter()
            .filter(|entity| predicate.is_none_or(|p| p.matches(*entity)))
            .cloned()
            .collect())
    }
}

impl<E> FromIterator<E> for MemoryCollection<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self { entities: iter.into_iter().collect() }
    }
}
