use async_trait::async_trait;

use crate::event::MedicalEvent;
use crate::filter::EventFilter;

#[async_trait]
pub trait EventRepo: Send + Sync {
    /// Store an event. An event with the same subject key and timestamp is replaced.
    async fn put(&self, event: &MedicalEvent) -> anyhow::Result<()>;

    /// All events matching `filter`, in ascending timestamp order.
    async fn query(&self, filter: &EventFilter) -> anyhow::Result<Vec<MedicalEvent>>;
}
