use crate::schema::graph::SchemaGraph;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// Holds the current schema snapshot.
///
/// Readers take an `Arc` and keep it for the duration of a compilation, so a
/// concurrent [`SchemaStore::replace`] never changes the graph under them.
/// The version and the graph live under one lock and always change together.
#[derive(Debug)]
pub struct SchemaStore {
    current: RwLock<(u64, Arc<SchemaGraph>)>,
}

impl SchemaStore {
    pub fn new(graph: SchemaGraph) -> Self {
        Self {
            current: RwLock::new((1, Arc::new(graph))),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, (u64, Arc<SchemaGraph>)> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, (u64, Arc<SchemaGraph>)> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Arc<SchemaGraph> {
        Arc::clone(&self.read().1)
    }

    /// The current graph together with the version it was published under.
    pub fn versioned_snapshot(&self) -> (u64, Arc<SchemaGraph>) {
        let guard = self.read();
        (guard.0, Arc::clone(&guard.1))
    }

    /// Swaps in a new graph and returns the new version.
    pub fn replace(&self, graph: SchemaGraph) -> u64 {
        let graph = Arc::new(graph);
        let version = {
            let mut guard = self.write();
            let version = guard.0 + 1;
            *guard = (version, graph);
            version
        };
        info!("Schema snapshot replaced (version {version})");
        version
    }

    pub fn version(&self) -> u64 {
        self.read().0
    }
}
