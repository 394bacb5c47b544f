//! # Player Registry - Identity Tracking and Session Overlay
//!
//! Durable player identity for a game server adapter. Every player the
//! server has ever seen is kept as a small `{id, name}` record, persisted
//! write-through on each join so an unclean shutdown loses nothing already
//! committed. On top of that history sits an in-memory overlay of the
//! players connected right now, each carrying the adapter's live engine
//! session handle.
//!
//! The registry is game-agnostic: the engine handle is an opaque type
//! parameter, and ids are whatever stable string the game provides (a Steam
//! id, a slot index). The hosting adapter translates engine callbacks into
//! [`PlayerRegistry::notify_join`], [`PlayerRegistry::notify_connect`] and
//! [`PlayerRegistry::notify_disconnect`], and uses the finders to resolve
//! admin-command targets.
//!
//! ## Lifecycle
//!
//! 1. **Construction** - records are loaded from the [`RecordStore`];
//!    unreadable or missing data yields an empty registry, never an error.
//! 2. **Join** - the record is inserted or its name refreshed, the in-memory
//!    `Player` is replaced wholesale, and the full record set is written back
//!    to the store.
//! 3. **Connect** - join plus insertion into the connected view with the
//!    engine session handle attached.
//! 4. **Disconnect** - removal from the connected view only; identity
//!    history is append-only for the life of the process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use covalence::players::PlayerRegistry;
//! use covalence::storage::SledRecordStore;
//!
//! struct EngineHandle; // whatever the game engine hands the adapter
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SledRecordStore::open("./data")?;
//!     let mut players: PlayerRegistry<EngineHandle> =
//!         PlayerRegistry::new(Box::new(store), "covalence");
//!
//!     players.notify_connect("76561197960287930", "Steve", EngineHandle);
//!     assert!(players.find_by_id("76561197960287930").is_some());
//!     players.notify_disconnect("76561197960287930");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::storage::{RecordSet, RecordStore};

/// The persisted slice of a player's identity: stable id and last-known
/// display name. Never deleted; the name is refreshed on every join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
}

/// An immutable snapshot of one player: identity record plus, when taken at
/// connect time, the engine session handle.
///
/// Snapshots are handed out as `Arc<Player<S>>` and replaced, not mutated,
/// whenever the backing session changes. A holder of an old `Arc` therefore
/// keeps seeing the session it was resolved against, and can never observe a
/// handle from a later connection.
#[derive(Debug)]
pub struct Player<S> {
    record: PlayerRecord,
    session: Option<S>,
}

impl<S> Player<S> {
    pub(crate) fn new(record: PlayerRecord, session: Option<S>) -> Self {
        Self { record, session }
    }

    /// The game's stable unique identifier, normalized to a string.
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// The display name captured at the most recent join.
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// The engine session handle, present only on snapshots taken at connect
    /// time. A handle may outlive the connection it belongs to; the
    /// registry's connected view is the authority on who is online.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn record(&self) -> &PlayerRecord {
        &self.record
    }
}

/// Durable player identity map with a live-session overlay.
///
/// `S` is the adapter's opaque engine session handle type. All mutating
/// operations take `&mut self`; an adapter feeding events from multiple
/// threads wraps the registry in a lock.
pub struct PlayerRegistry<S> {
    records: RecordSet,
    all: IndexMap<String, Arc<Player<S>>>,
    connected: IndexMap<String, Arc<Player<S>>>,
    store: Box<dyn RecordStore + Send>,
    data_key: String,
}

impl<S> PlayerRegistry<S> {
    /// Build a registry over `store`, loading any record set previously
    /// saved under `data_key`. Missing data starts the registry empty;
    /// unreadable data does too, with a warning, so a corrupt data file can
    /// never keep the server from coming up.
    pub fn new(store: Box<dyn RecordStore + Send>, data_key: impl Into<String>) -> Self {
        let data_key = data_key.into();
        let records = match store.load(&data_key) {
            Ok(Some(records)) => records,
            Ok(None) => RecordSet::new(),
            Err(err) => {
                warn!("discarding unreadable player data under {data_key:?}: {err}");
                RecordSet::new()
            }
        };

        let mut all = IndexMap::with_capacity(records.len());
        for (id, record) in &records {
            all.insert(id.clone(), Arc::new(Player::new(record.clone(), None)));
        }

        Self {
            records,
            all,
            connected: IndexMap::new(),
            store,
            data_key,
        }
    }

    /// Every player ever seen, in first-seen order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<Player<S>>> {
        self.all.values()
    }

    /// Players connected right now, in connect order.
    pub fn connected(&self) -> impl Iterator<Item = &Arc<Player<S>>> {
        self.connected.values()
    }

    /// Exact-id lookup across the full identity history.
    pub fn find_by_id(&self, id: &str) -> Option<&Arc<Player<S>>> {
        self.all.get(id)
    }

    /// Resolve `query` to a single player: `Some` only when exactly one
    /// player matches per [`find_all`](Self::find_all), `None` for zero or
    /// several. Ambiguity is not an error here; callers that want to report
    /// it enumerate `find_all` themselves.
    pub fn find(&self, query: &str) -> Option<&Arc<Player<S>>> {
        let mut matches = self.find_all(query);
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Every player matching `query`: case-insensitive substring of the
    /// display name, or exact match of the id. Lazy and restartable - each
    /// call walks the current identity map afresh.
    pub fn find_all(&self, query: &str) -> impl Iterator<Item = &Arc<Player<S>>> {
        let needle = query.to_lowercase();
        let id = query.to_string();
        self.all
            .values()
            .filter(move |player| player.name().to_lowercase().contains(&needle) || player.id() == id)
    }

    /// Record that `id` joined under `name`. Inserts or refreshes the
    /// persisted record, replaces the in-memory snapshot, and writes the
    /// full record set through to the store.
    pub fn notify_join(&mut self, id: &str, name: &str) {
        self.join(id, name, None);
    }

    /// Record that `id` joined under `name` and is now online with `session`.
    /// The join happens first, so the identity record is guaranteed to exist
    /// before the player shows up in [`connected`](Self::connected).
    pub fn notify_connect(&mut self, id: &str, name: &str, session: S) {
        let player = self.join(id, name, Some(session));
        self.connected.insert(id.to_string(), player);
    }

    /// Mark `id` offline. Removing an id that is not connected is a no-op.
    pub fn notify_disconnect(&mut self, id: &str) {
        self.connected.shift_remove(id);
    }

    fn join(&mut self, id: &str, name: &str, session: Option<S>) -> Arc<Player<S>> {
        let record = PlayerRecord {
            id: id.to_string(),
            name: name.to_string(),
        };
        self.records.insert(id.to_string(), record.clone());

        // Swap out the snapshot so stale session handles cannot leak through
        // references resolved before this join.
        let player = Arc::new(Player::new(record, session));
        self.all.insert(id.to_string(), Arc::clone(&player));

        // Write-through: one save per join keeps committed joins durable
        // across an unclean shutdown. A failed save must not take down the
        // session that triggered it.
        if let Err(err) = self.store.save(&self.data_key, &self.records) {
            warn!("failed to persist player records under {:?}: {err}", self.data_key);
        }

        player
    }
}
