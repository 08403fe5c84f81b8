mod event;
mod event_queue;

pub use event::*;
pub use event_queue::*;
