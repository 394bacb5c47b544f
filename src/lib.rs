//! # Covalence - Player Registry and Command Router for Game Adapters
//!
//! Covalence is the game-agnostic core of a server modding adapter: it
//! normalizes player identity tracking and command dispatch so the same
//! plugin-facing surface works across games with wildly different engines.
//! The adapter owns the engine integration (join/leave callbacks, chat
//! packets, native command tables); this crate owns the recurring logic
//! those adapters would otherwise each reimplement.
//!
//! ## Components
//!
//! - [`players::PlayerRegistry`] - durable id → name records with
//!   write-through persistence, plus an in-memory overlay of the currently
//!   connected sessions and name/id finders.
//! - [`commands::CommandRouter`] - lowercase `parent.leaf` command naming,
//!   collision checking against the adapter's native command tables, and
//!   chat/console dispatch with a console sentinel caller.
//!
//! The two never call each other; the adapter composes them, resolving a
//! player in the registry and handing it to the router for dispatch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use covalence::commands::CommandRouter;
//! use covalence::players::PlayerRegistry;
//! use covalence::storage::SledRecordStore;
//!
//! struct EngineHandle; // the game engine's session object
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SledRecordStore::open("./data")?;
//!     let mut players: PlayerRegistry<EngineHandle> =
//!         PlayerRegistry::new(Box::new(store), "covalence");
//!     let mut router: CommandRouter<EngineHandle> = CommandRouter::new();
//!
//!     router.register("kill", "admin-plugin", Box::new(|caller, _cmd, args| {
//!         println!("{} wants to kill {:?}", caller.name(), args);
//!         true
//!     }))?;
//!
//!     // Engine reports a connection:
//!     players.notify_connect("76561197960287930", "Steve", EngineHandle);
//!
//!     // Engine reports a chat message:
//!     let steve = players.find_by_id("76561197960287930").unwrap().clone();
//!     router.dispatch_chat(&steve, "/kill Alex");
//!     Ok(())
//! }
//! ```
//!
//! ## Threading
//!
//! Both components assume the engine's single-threaded event loop: mutations
//! take `&mut self` and persistence is a synchronous write on the calling
//! thread. Adapters with concurrent event sources wrap each component in a
//! lock; nothing in this crate locks internally.

pub mod commands;
pub mod config;
pub mod errors;
pub mod players;
pub mod storage;

pub use commands::{
    CommandCallback, CommandNamespace, CommandRouter, CommandTokenizer, MessageParser,
    RegisteredCommand,
};
pub use config::Config;
pub use errors::{CommandError, StoreError};
pub use players::{Player, PlayerRecord, PlayerRegistry};
pub use storage::{MemoryRecordStore, RecordStore, SledRecordStore};
