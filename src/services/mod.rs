pub mod cache_slot;
pub mod cancel_signal;
pub mod config_store;
pub mod contest_service;
pub mod contest_space;
pub mod countdown;
pub mod cph_prob;
pub mod event_bus;
pub mod problem_document;

pub use cache_slot::CacheSlot;
pub use cancel_signal::CancelSignal;
pub use config_store::{ConfigStore, JsonFileStore, MemoryStore};
pub use contest_service::{ContestService, SessionEvents};
pub use contest_space::{ContestSpace, SpaceEvents};
pub use countdown::Countdown;
pub use event_bus::{Subscription, Topic};
