use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::PropertyId;

/// all events that can be emitted by the client core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // simulation events
    SimulationComputed {
        principal: Money,
        monthly_payment: Money,
        total_interest: Money,
        annual_rate_percent: Decimal,
        term_months: u32,
    },
    SimulationNotComputable {
        property_price: Money,
        down_payment: Money,
    },

    // favorites events
    FavoriteAdded {
        property_id: PropertyId,
        timestamp: DateTime<Utc>,
    },
    FavoritesRemoved {
        property_ids: Vec<PropertyId>,
        timestamp: DateTime<Utc>,
    },
    FavoritesCleared {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    // session events
    LoggedIn {
        session_id: Uuid,
        user_id: Option<u64>,
        timestamp: DateTime<Utc>,
    },
    UserUpdated {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    LoggedOut {
        session_id: Option<Uuid>,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    LoginFailed {
        attempts: u32,
        timestamp: DateTime<Utc>,
    },
    LoginLockedOut {
        until: DateTime<Utc>,
    },
    QrLoginRequested {
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
