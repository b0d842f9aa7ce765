pub mod assistant;
pub mod event;
pub mod insight;
pub mod interaction;
pub mod message;
pub mod notice;

pub use assistant::*;
pub use event::{ArcEventTx, Event, EventTx};
pub use insight::*;
pub use interaction::Interaction;
pub use message::*;
pub use notice::*;
