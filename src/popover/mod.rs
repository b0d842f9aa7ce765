pub mod controller;
pub mod registry;
pub mod roles;

pub use controller::{PopoverError, Summary, SummaryPopover, SummaryState};
pub use registry::{ArcChatRegistry, ChatRegistry, EventChatRegistry};
pub use roles::AssistantRoles;
