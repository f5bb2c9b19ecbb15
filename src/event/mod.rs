mod bus;
mod events;

pub use bus::{EventBus, EventHandler, HandlerId};
pub use events::{BoardEvent, EventKind};
