/// Background consumers
pub mod profile_events;

pub use profile_events::ProfileEventsConsumer;
