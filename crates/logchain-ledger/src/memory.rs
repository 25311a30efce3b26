use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, info};

use logchain_types::{unix_now, AuthorityId, ServerId, TypeError};

use crate::batch::BatchBuilder;
use crate::config::Limits;
use crate::error::LogchainError;
use crate::events::LogchainEvent;
use crate::records::{AuditTrailRecord, LogEntryRecord, ServerRecord};
use crate::sequencer::AnchorSequencer;
use crate::traits::{LogchainReader, LogchainWriter};

/// In-memory logchain implementation for tests, local demos, and embedding.
///
/// A single `RwLock` over the whole state stands in for the external
/// store's exclusive-write-by-key contract: no two mutations of the same
/// server can interleave, so the sequence tokens (`entry_count`,
/// `last_entry_hash`, `next_batch_id`) behave exactly as they would against
/// a real ledger. The `position` counter plays the role of the external
/// ledger's slot number.
pub struct InMemoryLogchain {
    limits: Limits,
    inner: RwLock<State>,
}

#[derive(Default)]
struct State {
    servers: HashMap<ServerId, ServerRecord>,
    entries: HashMap<ServerId, Vec<LogEntryRecord>>,
    trails: HashMap<ServerId, AuditTrailRecord>,
    events: Vec<LogchainEvent>,
    position: u64,
}

impl InMemoryLogchain {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            inner: RwLock::new(State::default()),
        }
    }

    /// The limits this instance enforces at the boundary.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Snapshot of all events emitted so far.
    pub fn events(&self) -> Result<Vec<LogchainEvent>, LogchainError> {
        Ok(self.read_state()?.events.clone())
    }

    /// Drain and return all events emitted so far.
    pub fn take_events(&self) -> Result<Vec<LogchainEvent>, LogchainError> {
        Ok(std::mem::take(&mut self.write_state()?.events))
    }

    /// Record that an entry passed verification.
    ///
    /// Verification itself is read-only; this is the optional event the
    /// verifying caller may emit afterwards.
    pub fn note_verified(
        &self,
        server_id: &ServerId,
        entry_index: u64,
        entry_hash: logchain_types::Hash32,
    ) -> Result<(), LogchainError> {
        let mut state = self.write_state()?;
        state.events.push(LogchainEvent::EntryVerified {
            server_id: server_id.clone(),
            entry_index,
            entry_hash,
            verified_at: unix_now(),
        });
        Ok(())
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, LogchainError> {
        self.inner.read().map_err(|_| LogchainError::LockPoisoned)
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, LogchainError> {
        self.inner.write().map_err(|_| LogchainError::LockPoisoned)
    }

    fn server_of<'a>(
        state: &'a State,
        server_id: &ServerId,
    ) -> Result<&'a ServerRecord, LogchainError> {
        state
            .servers
            .get(server_id)
            .ok_or_else(|| LogchainError::ServerNotFound {
                id: server_id.to_string(),
            })
    }

    fn authorize(server: &ServerRecord, caller: AuthorityId) -> Result<(), LogchainError> {
        if server.authority != caller {
            return Err(LogchainError::Unauthorized);
        }
        Ok(())
    }
}

impl Default for InMemoryLogchain {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl LogchainWriter for InMemoryLogchain {
    fn register_server(
        &self,
        server_id: &str,
        description: &str,
        authority: AuthorityId,
        stake: u64,
    ) -> Result<ServerRecord, LogchainError> {
        let server_id = ServerId::parse(server_id).map_err(|err| match err {
            TypeError::ServerIdTooLong { max, actual } => {
                LogchainError::ServerIdTooLong { max, actual }
            }
            _ => LogchainError::ServerIdEmpty,
        })?;
        if description.len() > self.limits.max_description_len {
            return Err(LogchainError::DescriptionTooLong {
                max: self.limits.max_description_len,
                actual: description.len(),
            });
        }

        let mut state = self.write_state()?;
        if state.servers.contains_key(&server_id) {
            return Err(LogchainError::ServerExists {
                id: server_id.to_string(),
            });
        }

        state.position += 1;
        let server = ServerRecord::register(
            server_id.clone(),
            authority,
            description.to_string(),
            stake,
            unix_now(),
        );
        state.servers.insert(server_id.clone(), server.clone());
        state.entries.insert(server_id.clone(), Vec::new());

        info!(server = %server_id, "server registered");
        Ok(server)
    }

    fn append_entry(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        payload: &[u8],
    ) -> Result<LogEntryRecord, LogchainError> {
        if payload.len() > self.limits.max_payload_bytes {
            return Err(LogchainError::EntryTooLarge {
                max: self.limits.max_payload_bytes,
                actual: payload.len(),
            });
        }

        let mut state = self.write_state()?;
        let server = Self::server_of(&state, server_id)?;
        Self::authorize(server, caller)?;
        if !server.is_active {
            return Err(LogchainError::ServerInactive);
        }

        // Clamp so timestamps never decrease within a chain.
        let last_timestamp = state
            .entries
            .get(server_id)
            .and_then(|log| log.last())
            .map_or(0, |entry| entry.timestamp);
        let timestamp = unix_now().max(last_timestamp);

        let mut server = server.clone();
        let entry = LogEntryRecord::chained(
            server_id.clone(),
            server.next_entry_index(),
            timestamp,
            server.last_entry_hash,
            payload.to_vec(),
        );

        server.entry_count += 1;
        server.last_entry_hash = entry.entry_hash;

        state.position += 1;
        state.servers.insert(server_id.clone(), server);
        state
            .entries
            .entry(server_id.clone())
            .or_default()
            .push(entry.clone());
        state.events.push(LogchainEvent::EntryAppended {
            server_id: server_id.clone(),
            entry_index: entry.entry_index,
            entry_hash: entry.entry_hash,
            timestamp: entry.timestamp,
        });

        debug!(
            server = %server_id,
            index = entry.entry_index,
            hash = %entry.entry_hash.short_hex(),
            "entry appended"
        );
        Ok(entry)
    }

    fn anchor_batch(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        log_count: u64,
        expected_batch_id: Option<u64>,
    ) -> Result<AuditTrailRecord, LogchainError> {
        let mut state = self.write_state()?;
        let server = Self::server_of(&state, server_id)?.clone();
        Self::authorize(&server, caller)?;

        let trail = state
            .trails
            .get(server_id)
            .cloned()
            .unwrap_or_else(|| AuditTrailRecord::sentinel(server_id.clone(), server.authority));

        AnchorSequencer::validate(&server, &trail, log_count, expected_batch_id, &self.limits)?;

        let window = AnchorSequencer::window(&trail, log_count);
        let log = state.entries.get(server_id).map_or(&[][..], Vec::as_slice);
        // validate() bounded the window by entry_count, which equals the
        // log length in this implementation.
        let batch = BatchBuilder::build(
            &log[window.start as usize..window.end as usize],
            &self.limits,
        )?;

        state.position += 1;
        let position = state.position;
        let outcome = AnchorSequencer::commit(&server, &trail, &batch, unix_now(), position);

        state
            .servers
            .insert(server_id.clone(), outcome.server.clone());
        state
            .trails
            .insert(server_id.clone(), outcome.trail.clone());
        state.events.push(LogchainEvent::RootAnchored {
            server_id: server_id.clone(),
            batch_id: outcome.trail.batch_id,
            root_hash: outcome.trail.root_hash,
            entries_in_batch: outcome.trail.entries_in_last_batch,
            entries_anchored_total: outcome.trail.entries_anchored_total,
            timestamp: outcome.trail.anchored_at,
        });

        info!(
            server = %server_id,
            batch = outcome.trail.batch_id,
            root = %outcome.trail.root_hash.short_hex(),
            entries = outcome.trail.entries_in_last_batch,
            "batch anchored"
        );
        Ok(outcome.trail)
    }

    fn deactivate_server(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
    ) -> Result<ServerRecord, LogchainError> {
        let mut state = self.write_state()?;
        let server = Self::server_of(&state, server_id)?;
        Self::authorize(server, caller)?;

        let mut server = server.clone();
        server.is_active = false;
        state.position += 1;
        state.servers.insert(server_id.clone(), server.clone());

        info!(server = %server_id, "server deactivated");
        Ok(server)
    }

    fn close_trail(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
    ) -> Result<AuditTrailRecord, LogchainError> {
        let mut state = self.write_state()?;
        let server = Self::server_of(&state, server_id)?;
        Self::authorize(server, caller)?;
        if server.is_active {
            return Err(LogchainError::ServerStillActive);
        }

        let trail = state
            .trails
            .remove(server_id)
            .ok_or(LogchainError::TrailNotFound)?;
        state.position += 1;

        info!(server = %server_id, "audit trail closed");
        Ok(trail)
    }
}

impl LogchainReader for InMemoryLogchain {
    fn server(&self, server_id: &ServerId) -> Result<Option<ServerRecord>, LogchainError> {
        Ok(self.read_state()?.servers.get(server_id).cloned())
    }

    fn servers(&self) -> Result<Vec<ServerRecord>, LogchainError> {
        let state = self.read_state()?;
        let mut servers: Vec<_> = state.servers.values().cloned().collect();
        servers.sort_by(|a, b| a.server_id.cmp(&b.server_id));
        Ok(servers)
    }

    fn entry(
        &self,
        server_id: &ServerId,
        entry_index: u64,
    ) -> Result<Option<LogEntryRecord>, LogchainError> {
        let state = self.read_state()?;
        Ok(state
            .entries
            .get(server_id)
            .and_then(|log| log.get(entry_index as usize))
            .cloned())
    }

    fn entries_range(
        &self,
        server_id: &ServerId,
        from_index: u64,
        to_index: u64,
    ) -> Result<Vec<LogEntryRecord>, LogchainError> {
        let state = self.read_state()?;
        let Some(log) = state.entries.get(server_id) else {
            return Ok(vec![]);
        };

        let start = (from_index as usize).min(log.len());
        let end = (to_index as usize).min(log.len());
        if start >= end {
            return Ok(vec![]);
        }
        Ok(log[start..end].to_vec())
    }

    fn trail(&self, server_id: &ServerId) -> Result<AuditTrailRecord, LogchainError> {
        let state = self.read_state()?;
        let server = Self::server_of(&state, server_id)?;
        Ok(state
            .trails
            .get(server_id)
            .cloned()
            .unwrap_or_else(|| AuditTrailRecord::sentinel(server_id.clone(), server.authority)))
    }

    fn entry_count(&self, server_id: &ServerId) -> Result<u64, LogchainError> {
        let state = self.read_state()?;
        Ok(Self::server_of(&state, server_id)?.entry_count)
    }
}
