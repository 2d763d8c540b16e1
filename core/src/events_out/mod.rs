mod event;
mod writer;

pub use crate::config::EventsOutConfig;
pub use event::{write_event, LifecycleEvent};
pub use writer::{start_events_out, EventsOutHandle, EventsOutTx};
