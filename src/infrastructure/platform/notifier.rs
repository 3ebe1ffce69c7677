use crate::domain::events::PipelineEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

pub trait Notifier: Send + Sync {
    fn notify(&self, event: PipelineEvent);
}

/// Fans events out to every subscribed display collaborator.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: Arc<broadcast::Sender<PipelineEvent>>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.sender.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, event: PipelineEvent) {
        // No subscribers is normal while the UI is torn down.
        let _ = self.sender.send(event);
    }
}
