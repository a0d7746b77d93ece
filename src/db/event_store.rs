use crate::error::Result;
use crate::models::{NewSalesEvent, SalesEvent};
use async_trait::async_trait;
use time::PrimitiveDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage for sales events. All range queries return events sorted by start.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: NewSalesEvent) -> Result<SalesEvent>;

    /// Returns `false` when no event had this id.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Events lying entirely inside `[start, end]`.
    async fn find_within(
        &self,
        sales_rep_id: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<SalesEvent>>;

    /// Events touching `[start, end]` at all.
    async fn find_overlapping(
        &self,
        sales_rep_id: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<SalesEvent>>;

    async fn count(&self) -> Result<usize>;
}

/// Process-local store, used by the binary and by tests.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<SalesEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, sales_rep_id: &str, keep: F) -> Vec<SalesEvent>
    where
        F: Fn(&SalesEvent) -> bool,
    {
        let events = self.events.read().await;
        let mut selected: Vec<SalesEvent> = events
            .iter()
            .filter(|e| e.sales_rep_id == sales_rep_id && keep(e))
            .cloned()
            .collect();
        selected.sort_by_key(|e| e.start_at);
        selected
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, event: NewSalesEvent) -> Result<SalesEvent> {
        let stored = SalesEvent {
            id: Uuid::new_v4().to_string(),
            title: event.title,
            address: event.address,
            start_at: event.start_at,
            end_at: event.end_at,
            lat: event.location.lat,
            lng: event.location.lng,
            sales_rep_id: event.sales_rep_id,
            time_zone: event.time_zone,
        };
        self.events.write().await.push(stored.clone());
        tracing::debug!(id = %stored.id, rep = %stored.sales_rep_id, "Stored event");
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() != before)
    }

    async fn find_within(
        &self,
        sales_rep_id: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<SalesEvent>> {
        Ok(self
            .select(sales_rep_id, |e| e.start_at >= start && e.end_at <= end)
            .await)
    }

    async fn find_overlapping(
        &self,
        sales_rep_id: &str,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<SalesEvent>> {
        Ok(self
            .select(sales_rep_id, |e| e.end_at >= start && e.start_at <= end)
            .await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.events.read().await.len())
    }
}
