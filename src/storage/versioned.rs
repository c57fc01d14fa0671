// VersionedStore - In-memory, append-only-by-height key/value state
use super::state::{StateError, StateReader, StateWriter};
use crate::types::BlockNumber;
use std::collections::BTreeMap;

/// Multi-version key/value store.
///
/// Every key keeps one entry per height at which it was written. A read view
/// at height `h` sees the newest entry at or below `h`, so later writes never
/// change what an earlier height observes.
///
/// INVARIANT: writers can only be opened at or above `latest_height()`.
#[derive(Debug, Clone, Default)]
pub struct VersionedStore {
    entries: BTreeMap<Vec<u8>, BTreeMap<BlockNumber, Vec<u8>>>,
    latest_height: Option<BlockNumber>,
}

impl VersionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest height that has received a write
    pub fn latest_height(&self) -> Option<BlockNumber> {
        self.latest_height
    }

    /// Read-only handle pinned at `height`
    pub fn at(&self, height: BlockNumber) -> StateView<'_> {
        StateView { store: self, height }
    }

    /// Write handle for the in-progress `height`
    pub fn writer(&mut self, height: BlockNumber) -> Result<HeightWriter<'_>, StateError> {
        if let Some(latest) = self.latest_height {
            if height < latest {
                return Err(StateError::HistoryRewrite { height, latest });
            }
        }
        Ok(HeightWriter { store: self, height })
    }

    /// Number of versions recorded for `key`
    pub fn version_count(&self, key: &[u8]) -> usize {
        self.entries.get(key).map_or(0, BTreeMap::len)
    }

    fn read(&self, key: &[u8], height: BlockNumber) -> Option<Vec<u8>> {
        self.entries
            .get(key)?
            .range(..=height)
            .next_back()
            .map(|(_, value)| value.clone())
    }
}

/// Read handle at a fixed height. Cheap to copy; safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    store: &'a VersionedStore,
    height: BlockNumber,
}

impl StateReader for StateView<'_> {
    fn height(&self) -> BlockNumber {
        self.height
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.store.read(key, self.height))
    }
}

/// Exclusive write handle for one height. Reads observe its own writes.
#[derive(Debug)]
pub struct HeightWriter<'a> {
    store: &'a mut VersionedStore,
    height: BlockNumber,
}

impl StateReader for HeightWriter<'_> {
    fn height(&self) -> BlockNumber {
        self.height
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.store.read(key, self.height))
    }
}

impl StateWriter for HeightWriter<'_> {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StateError> {
        self.store
            .entries
            .entry(key.to_vec())
            .or_default()
            .insert(self.height, value);

        let latest = self.store.latest_height.get_or_insert(self.height);
        if *latest < self.height {
            *latest = self.height;
        }
        Ok(())
    }
}
