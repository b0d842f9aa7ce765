use std::sync::Arc;

use tokio::sync::mpsc;

use super::{IncontextInsight, NoticeMessage};

#[derive(Debug)]
pub enum Event {
    Notice(NoticeMessage),

    /// Hand the insight over to the full chat surface
    ContinueInChat {
        insight: IncontextInsight,
        conversation_id: String,
    },
    ClosePopover,
}

#[macro_export]
macro_rules! notice_danger {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::danger($msg))
    };
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
