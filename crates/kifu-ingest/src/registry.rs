//! Entity registry: players, base events and events keyed by exact name.
//!
//! Ids are assigned densely from 1 in first-sighting order. The registry is
//! single-writer and lives for exactly one corpus pass.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::country::Country;

// ============================================================================
// Ids
// ============================================================================

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

surrogate_id!(
    /// Player row id.
    PlayerId
);
surrogate_id!(
    /// Tournament series row id.
    BaseEventId
);
surrogate_id!(
    /// Tournament edition row id.
    EventId
);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} id space exhausted")]
    IdOverflow { kind: &'static str },
}

/// Hands out the next id; the counter holds the last id issued.
fn next_id(counter: &mut u32, kind: &'static str) -> Result<u32, RegistryError> {
    let id = counter
        .checked_add(1)
        .ok_or(RegistryError::IdOverflow { kind })?;
    *counter = id;
    Ok(id)
}

/// Merge rule for a player's country: `None` may be upgraded to a known
/// country, a known country is never changed.
pub fn upgrade_country(old: Country, new: Country) -> Country {
    if old.is_known() {
        old
    } else {
        new
    }
}

// ============================================================================
// Entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub name: String,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEventEntry {
    pub id: BaseEventId,
    pub name: String,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: EventId,
    pub name: String,
    pub base_event: BaseEventId,
    pub number: u32,
}

// ============================================================================
// Registry
// ============================================================================

/// Entries are stored in id order; `id - 1` is the index.
#[derive(Debug, Default)]
pub struct Registry {
    players: Vec<PlayerEntry>,
    player_index: HashMap<String, usize>,
    next_player: u32,

    base_events: Vec<BaseEventEntry>,
    base_event_index: HashMap<String, usize>,
    next_base_event: u32,

    events: Vec<EventEntry>,
    event_index: HashMap<String, usize>,
    next_event: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_country(abbr: &str) -> Country {
        Country::from_abbr(abbr)
    }

    /// Fails when one more base event, one more event and two more players
    /// might not all get ids. Checked before a record touches the registry
    /// so a failure leaves no partial entries behind.
    pub fn ensure_capacity(&self) -> Result<(), RegistryError> {
        let room = |last: u32, needed: u32, kind: &'static str| {
            if u32::MAX - last < needed {
                Err(RegistryError::IdOverflow { kind })
            } else {
                Ok(())
            }
        };
        room(self.next_base_event, 1, "base event")?;
        room(self.next_event, 1, "event")?;
        room(self.next_player, 2, "player")
    }

    /// Register a player, or upgrade the stored country of a known one.
    pub fn register_player(
        &mut self,
        name: &str,
        raw_country: &str,
    ) -> Result<PlayerId, RegistryError> {
        let country = Country::from_player_code(raw_country);
        if let Some(&index) = self.player_index.get(name) {
            let entry = &mut self.players[index];
            entry.country = upgrade_country(entry.country, country);
            return Ok(entry.id);
        }

        let id = PlayerId(next_id(&mut self.next_player, "player")?);
        self.player_index
            .insert(name.to_string(), self.players.len());
        self.players.push(PlayerEntry {
            id,
            name: name.to_string(),
            country,
        });
        Ok(id)
    }

    /// The country given on first sighting is permanent.
    pub fn register_base_event(
        &mut self,
        name: &str,
        country: Country,
    ) -> Result<BaseEventId, RegistryError> {
        if let Some(&index) = self.base_event_index.get(name) {
            return Ok(self.base_events[index].id);
        }

        let id = BaseEventId(next_id(&mut self.next_base_event, "base event")?);
        self.base_event_index
            .insert(name.to_string(), self.base_events.len());
        self.base_events.push(BaseEventEntry {
            id,
            name: name.to_string(),
            country,
        });
        Ok(id)
    }

    pub fn register_event(
        &mut self,
        name: &str,
        base_event: BaseEventId,
        number: u32,
    ) -> Result<EventId, RegistryError> {
        if let Some(&index) = self.event_index.get(name) {
            return Ok(self.events[index].id);
        }

        let id = EventId(next_id(&mut self.next_event, "event")?);
        self.event_index.insert(name.to_string(), self.events.len());
        self.events.push(EventEntry {
            id,
            name: name.to_string(),
            base_event,
            number,
        });
        Ok(id)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerEntry> {
        self.player_index.get(name).map(|&i| &self.players[i])
    }

    pub fn base_event(&self, name: &str) -> Option<&BaseEventEntry> {
        self.base_event_index
            .get(name)
            .map(|&i| &self.base_events[i])
    }

    pub fn event(&self, name: &str) -> Option<&EventEntry> {
        self.event_index.get(name).map(|&i| &self.events[i])
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn base_events(&self) -> &[BaseEventEntry] {
        &self.base_events
    }

    pub fn events(&self) -> &[EventEntry] {
        &self.events
    }
}

#[cfg(test)]
impl Registry {
    /// Registry whose player ids continue after `last`.
    pub(crate) fn with_last_player_id(last: u32) -> Self {
        Self {
            next_player: last,
            ..Self::default()
        }
    }
}
