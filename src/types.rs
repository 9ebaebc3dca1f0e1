//! Core data model types shared by ingestion, validation and export.
//!
//! Ingestion reshapes a wide source sheet (one row per timestamp, one column per location) into an
//! [`EntityDataset`]: a mapping from entity name to its ordered [`Observation`]s.

use std::collections::HashMap;

/// A single `(timestamp, count)` pair for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Timestamp, canonically `YYYY-MM-DD HH:MM` (24-hour clock).
    ///
    /// Fragments that could not be parsed at ingestion are carried verbatim.
    pub timestamp: String,
    /// Observed count. Never negative once the dataset has been validated.
    pub count: i64,
}

impl Observation {
    /// Create a new observation.
    pub fn new(timestamp: impl Into<String>, count: i64) -> Self {
        Self {
            timestamp: timestamp.into(),
            count,
        }
    }
}

/// Ordered mapping from entity name to its observations.
///
/// Entities keep the order in which they were first inserted; observations keep the order in which
/// they were pushed (source row order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDataset {
    entities: Vec<(String, Vec<Observation>)>,
    index: HashMap<String, usize>,
}

impl EntityDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset with the given entities registered and no observations.
    pub fn with_entities<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ds = Self::new();
        for name in names {
            ds.slot(name.into());
        }
        ds
    }

    /// Append `observation` to `entity`, inserting the entity if it is not present yet.
    pub fn push(&mut self, entity: &str, observation: Observation) {
        let idx = match self.index.get(entity) {
            Some(&idx) => idx,
            None => self.slot(entity.to_owned()),
        };
        self.entities[idx].1.push(observation);
    }

    fn slot(&mut self, name: String) -> usize {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.entities.len();
        self.index.insert(name.clone(), idx);
        self.entities.push((name, Vec::new()));
        idx
    }

    /// Observations for `entity`, if present.
    pub fn get(&self, entity: &str) -> Option<&[Observation]> {
        self.index
            .get(entity)
            .map(|&idx| self.entities[idx].1.as_slice())
    }

    /// Whether `entity` is present.
    pub fn contains(&self, entity: &str) -> bool {
        self.index.contains_key(entity)
    }

    /// Number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Total number of observations across all entities.
    pub fn observation_count(&self) -> usize {
        self.entities.iter().map(|(_, obs)| obs.len()).sum()
    }

    /// Returns `true` if the dataset holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate entity names in insertion order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate `(entity, observations)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Observation])> {
        self.entities
            .iter()
            .map(|(name, obs)| (name.as_str(), obs.as_slice()))
    }

    /// Iterate `(entity, observations)` pairs mutably, in insertion order.
    ///
    /// Entity names are not exposed mutably so the name index stays consistent.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<Observation>)> {
        self.entities
            .iter_mut()
            .map(|(name, obs)| (name.as_str(), obs))
    }

    /// Consume the dataset into its ordered `(entity, observations)` pairs.
    pub fn into_entities(self) -> Vec<(String, Vec<Observation>)> {
        self.entities
    }
}
