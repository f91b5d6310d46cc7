pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod favorites;
pub mod format;
pub mod input;
pub mod kpr;
pub mod listing;
pub mod session;
pub mod storage;
pub mod types;

// re-export key types
pub use config::{ClientConfig, SessionConfig, SimulatorConfig, StorageKeys};
pub use decimal::{Money, Rate};
pub use errors::{ClientError, Result, ValidationError, ValidationErrors};
pub use events::{Event, EventStore};
pub use favorites::{FavoriteProperty, FavoritesStore};
pub use input::DownPayment;
pub use kpr::{
    annuity_payment, calculate, AmortizationSchedule, KprSimulator, LoanInput, LoanResult,
    ScheduledPayment, SimulationOutcome, SimulationSummary,
};
pub use listing::{Product, ProductQuery, ProductResponse};
pub use session::{
    AuthState, LoginGuard, LoginRequest, LoginResponse, QrLoginRequest, QrScanner, SessionStore,
    User,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{LoanField, PropertyId, PropertySpecs, PropertyType};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
