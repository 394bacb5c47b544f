//! # Command Router - Name Resolution and Dispatch
//!
//! Chat and console command routing for a game server adapter. Plugins (or
//! the adapter itself) register callbacks under a command name; the adapter
//! feeds incoming chat lines and console input here and the router resolves
//! them to the right callback.
//!
//! ## Naming scheme
//!
//! Command names are lowercased and trimmed on registration. A name may be
//! two-part, `parent.leaf` (for example `zones.tp`); a bare name gets the
//! implicit parent `global`, so `kill` resolves to the full name
//! `global.kill`. The full name exists for collision checking against the
//! adapter's console command namespace, where commands are addressed by
//! their qualified form.
//!
//! ## Collaborators
//!
//! The router does not parse text and does not own the adapter's native
//! command tables. Parsing is behind [`MessageParser`] (with
//! [`CommandTokenizer`] as the bundled implementation), and the native chat
//! and console tables are consulted through [`CommandNamespace`] during
//! registration only.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use covalence::commands::CommandRouter;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut router: CommandRouter<()> = CommandRouter::new();
//!     router.register("zones.tp", "zones-plugin", Box::new(|caller, cmd, args| {
//!         println!("{} ran {} with {} args", caller.name(), cmd, args.len());
//!         true
//!     }))?;
//!
//!     // Console input with no attached player falls back to the console
//!     // sentinel identity.
//!     router.dispatch_console(None, "zones.tp spawn");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::CommandsConfig;
use crate::errors::CommandError;
use crate::players::{Player, PlayerRecord};

/// Callback invoked on dispatch: `(caller, command, args) -> handled`.
///
/// Returning `false` tells the adapter the command declined to handle the
/// input (distinct from "no such command", which the router reports itself).
pub type CommandCallback<S> = Box<dyn FnMut(&Player<S>, &str, &[String]) -> bool + Send>;

/// Extracts a command token and arguments from raw message text.
///
/// Owned by the adapter in spirit: chat packets and console lines differ per
/// game, so the router only ever sees the parsed form. `parse_chat` returns
/// `None` for ordinary chatter that is not a command.
pub trait MessageParser {
    fn parse_chat(&self, message: &str) -> Option<(String, Vec<String>)>;

    /// Console lines are commands by default; games that prefix console
    /// commands differently override this.
    fn parse_console(&self, message: &str) -> Option<(String, Vec<String>)> {
        self.parse_chat(message)
    }
}

/// Membership test against a command table the adapter owns natively
/// (its chat-command and console-command maps). Consulted during
/// registration so covalence commands cannot shadow native ones.
pub trait CommandNamespace {
    fn contains(&self, name: &str) -> bool;
}

impl<F: Fn(&str) -> bool> CommandNamespace for F {
    fn contains(&self, name: &str) -> bool {
        self(name)
    }
}

/// Prefix-based tokenizer: `/kill "Steve the Second" 10` becomes
/// `("kill", ["Steve the Second", "10"])`. Double quotes group a spaced
/// argument; the command token is lowercased.
pub struct CommandTokenizer {
    prefix: char,
}

impl CommandTokenizer {
    pub fn new(prefix: char) -> Self {
        Self { prefix }
    }
}

impl Default for CommandTokenizer {
    fn default() -> Self {
        Self::new('/')
    }
}

impl MessageParser for CommandTokenizer {
    fn parse_chat(&self, message: &str) -> Option<(String, Vec<String>)> {
        let rest = message.trim().strip_prefix(self.prefix)?;
        tokenize(rest)
    }

    fn parse_console(&self, message: &str) -> Option<(String, Vec<String>)> {
        let trimmed = message.trim();
        let rest = trimmed.strip_prefix(self.prefix).unwrap_or(trimmed);
        tokenize(rest)
    }
}

fn tokenize(input: &str) -> Option<(String, Vec<String>)> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in input.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    let mut tokens = tokens.into_iter();
    let command = tokens.next()?.to_lowercase();
    Some((command, tokens.collect()))
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split an already-normalized name into `(parent, leaf)`.
fn split_name(command: &str) -> (String, String) {
    match command.split_once('.') {
        Some((parent, leaf)) => (parent.trim().to_string(), leaf.to_string()),
        None => ("global".to_string(), command.to_string()),
    }
}

/// One registered command: resolved naming plus the owning component's tag
/// and the dispatch callback.
pub struct RegisteredCommand<S> {
    name: String,
    owner: String,
    parent: String,
    leaf: String,
    full_name: String,
    callback: CommandCallback<S>,
}

impl<S> RegisteredCommand<S> {
    /// Normalized registration name (the dispatch key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag of the component that registered the command.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Qualified `parent.leaf` form used against the console namespace.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// Maps command names to callbacks and dispatches parsed chat/console input.
///
/// Mutating operations take `&mut self`; adapters with concurrent event
/// sources serialize access with a lock, as with [`PlayerRegistry`].
///
/// [`PlayerRegistry`]: crate::players::PlayerRegistry
pub struct CommandRouter<S> {
    commands: IndexMap<String, RegisteredCommand<S>>,
    parser: Box<dyn MessageParser + Send>,
    chat_namespace: Option<Box<dyn CommandNamespace + Send>>,
    console_namespace: Option<Box<dyn CommandNamespace + Send>>,
    console: Arc<Player<S>>,
}

impl<S> Default for CommandRouter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandRouter<S> {
    pub fn new() -> Self {
        Self::from_config(&CommandsConfig::default())
    }

    /// Build a router using the prefix and console identity from `config`.
    pub fn from_config(config: &CommandsConfig) -> Self {
        Self {
            commands: IndexMap::new(),
            parser: Box::new(CommandTokenizer::new(config.chat_prefix)),
            chat_namespace: None,
            console_namespace: None,
            console: Arc::new(Player::new(
                PlayerRecord {
                    id: config.console_id.clone(),
                    name: config.console_name.clone(),
                },
                None,
            )),
        }
    }

    /// Replace the bundled tokenizer with the adapter's own parser.
    pub fn with_parser(mut self, parser: Box<dyn MessageParser + Send>) -> Self {
        self.parser = parser;
        self
    }

    /// Native chat-command table, checked by normalized name on register.
    pub fn with_chat_namespace(mut self, namespace: Box<dyn CommandNamespace + Send>) -> Self {
        self.chat_namespace = Some(namespace);
        self
    }

    /// Native console-command table, checked by full name on register.
    pub fn with_console_namespace(mut self, namespace: Box<dyn CommandNamespace + Send>) -> Self {
        self.console_namespace = Some(namespace);
        self
    }

    /// Replace the console sentinel identity.
    pub fn with_console_identity(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.console = Arc::new(Player::new(
            PlayerRecord {
                id: id.into(),
                name: name.into(),
            },
            None,
        ));
        self
    }

    /// The sentinel identity substituted for a missing console caller.
    pub fn console(&self) -> &Arc<Player<S>> {
        &self.console
    }

    /// Register `raw` for `owner`. The name is trimmed and lowercased; both
    /// it and its qualified `parent.leaf` form must be free here and in the
    /// external namespaces.
    pub fn register(
        &mut self,
        raw: &str,
        owner: &str,
        callback: CommandCallback<S>,
    ) -> Result<(), CommandError> {
        let command = normalize(raw);
        if command.is_empty() {
            return Err(CommandError::InvalidName(raw.to_string()));
        }

        let (parent, leaf) = split_name(&command);
        let full_name = format!("{parent}.{leaf}");

        let taken = self.commands.contains_key(&command)
            || self.commands.contains_key(&full_name)
            || self
                .chat_namespace
                .as_ref()
                .is_some_and(|ns| ns.contains(&command))
            || self
                .console_namespace
                .as_ref()
                .is_some_and(|ns| ns.contains(&full_name));
        if taken {
            return Err(CommandError::AlreadyExists(command));
        }

        self.commands.insert(
            command.clone(),
            RegisteredCommand {
                name: command,
                owner: owner.to_string(),
                parent,
                leaf,
                full_name,
                callback,
            },
        );
        Ok(())
    }

    /// Remove `raw` if it is registered to `owner`. Returns whether a
    /// command was removed; an owner mismatch leaves the table untouched.
    pub fn unregister(&mut self, raw: &str, owner: &str) -> bool {
        let command = normalize(raw);
        let Some(registered) = self.commands.get(&command) else {
            return false;
        };
        if registered.owner != owner {
            warn!(
                "{owner} tried to unregister {command:?} registered by {}",
                registered.owner
            );
            return false;
        }
        self.commands.shift_remove(&command).is_some()
    }

    /// Look up a registration by raw name.
    pub fn get(&self, raw: &str) -> Option<&RegisteredCommand<S>> {
        self.commands.get(&normalize(raw))
    }

    /// All registrations, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &RegisteredCommand<S>> {
        self.commands.values()
    }

    /// Route a chat message from `caller`. Returns `false` when the text is
    /// not a command or names no registered command, so the adapter can let
    /// the message through as ordinary chat.
    pub fn dispatch_chat(&mut self, caller: &Player<S>, message: &str) -> bool {
        match self.parser.parse_chat(message) {
            Some((command, args)) => self.invoke(caller, &command, &args),
            None => false,
        }
    }

    /// Route a console line. A `None` caller is replaced by the console
    /// sentinel so callbacks always receive a real identity.
    pub fn dispatch_console(&mut self, caller: Option<&Player<S>>, message: &str) -> bool {
        let Some((command, args)) = self.parser.parse_console(message) else {
            return false;
        };
        let console = Arc::clone(&self.console);
        let caller = caller.unwrap_or_else(|| console.as_ref());
        self.invoke(caller, &command, &args)
    }

    fn invoke(&mut self, caller: &Player<S>, command: &str, args: &[String]) -> bool {
        let command = normalize(command);
        match self.commands.get_mut(&command) {
            Some(registered) => (registered.callback)(caller, &command, args),
            None => {
                debug!("no command registered for {command:?}");
                false
            }
        }
    }
}
