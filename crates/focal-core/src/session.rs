//! A [`Session`] couples the in-memory [`Store`] with a persistence
//! [`Backend`].
//!
//! Writes are optimistic: the in-memory state is updated first and is the
//! source of truth; the durable write follows. A failed save therefore
//! never rolls anything back — it is recorded as a non-fatal flag the
//! consumer surfaces as a warning, and the user can retry explicitly (e.g.
//! by exporting). A crash between the memory update and the durable write
//! loses that one mutation; acceptable for a single-user local-first tool,
//! and the reason `flush` exists for the paths that must be durable.

use tracing::warn;

use crate::config::ProjectConfig;
use crate::persist::{Backend, Collection, PersistError};
use crate::store::Store;
use crate::undo::UndoBuffer;

pub struct Session {
    store: Store,
    backend: Box<dyn Backend>,
    save_error: Option<PersistError>,
}

impl Session {
    /// Load all collections and the persisted undo stack from `backend`.
    ///
    /// # Errors
    ///
    /// Propagates backend read failures: a session never starts from
    /// silently truncated data.
    pub fn open(backend: Box<dyn Backend>, config: &ProjectConfig) -> Result<Self, PersistError> {
        let snapshot = backend.load()?;
        let undo = UndoBuffer::from_entries(backend.load_undo()?, config.undo.window_seconds);
        Ok(Self {
            store: Store::from_snapshot(snapshot, undo),
            backend,
            save_error: None,
        })
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Persist the named collections (plus the undo stack, which task
    /// mutations may have touched). Failures are recorded, not raised: the
    /// in-memory state stays authoritative.
    pub fn commit(&mut self, collections: &[Collection]) {
        for &collection in collections {
            if let Err(error) = self.backend.save(collection, self.store.snapshot()) {
                warn!(?collection, %error, "background save failed");
                self.save_error.get_or_insert(error);
            }
        }
        if let Err(error) = self.backend.save_undo(self.store.undo_buffer().entries()) {
            warn!(%error, "undo stack save failed");
            self.save_error.get_or_insert(error);
        }
    }

    /// Persist everything, propagating the first failure. For paths where
    /// durability is the point (import, explicit flush before exit).
    ///
    /// # Errors
    ///
    /// The first backend write failure.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        for collection in Collection::ALL {
            self.backend.save(collection, self.store.snapshot())?;
        }
        self.backend.save_undo(self.store.undo_buffer().entries())
    }

    /// The first save failure since the last call, if any. Consumers show
    /// it as a dismissible warning; the session keeps working.
    pub fn take_save_error(&mut self) -> Option<PersistError> {
        self.save_error.take()
    }
}
