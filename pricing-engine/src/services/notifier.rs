//! Entity change notifications
//!
//! Fire-and-continue events published after each persistence mutation.
//! Subscribers are optional; publishing with nobody listening is fine.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Discount,
    DiscountCoupon,
    DiscountUsageHistory,
    TaxCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntityEvent {
    Inserted { kind: EntityKind, id: i64 },
    Updated { kind: EntityKind, id: i64 },
    Deleted { kind: EntityKind, id: i64 },
}

impl EntityEvent {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Inserted { kind, .. } | Self::Updated { kind, .. } | Self::Deleted { kind, .. } => {
                *kind
            }
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted { id, .. } | Self::Updated { id, .. } | Self::Deleted { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntityNotifier {
    event_tx: broadcast::Sender<EntityEvent>,
}

impl Default for EntityNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityNotifier {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { event_tx }
    }

    /// Subscribe to entity events
    pub fn subscribe(&self) -> broadcast::Receiver<EntityEvent> {
        self.event_tx.subscribe()
    }

    pub fn inserted(&self, kind: EntityKind, id: i64) {
        self.publish(EntityEvent::Inserted { kind, id });
    }

    pub fn updated(&self, kind: EntityKind, id: i64) {
        self.publish(EntityEvent::Updated { kind, id });
    }

    pub fn deleted(&self, kind: EntityKind, id: i64) {
        self.publish(EntityEvent::Deleted { kind, id });
    }

    fn publish(&self, event: EntityEvent) {
        // No receivers is the normal case outside tests
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Entity event dropped: no active receivers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_broadcast() {
        let notifier = EntityNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.inserted(EntityKind::Discount, 7);
        notifier.deleted(EntityKind::TaxCategory, 3);

        let first = rx.recv().await.unwrap();
        assert_eq!(first, EntityEvent::Inserted { kind: EntityKind::Discount, id: 7 });
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind(), EntityKind::TaxCategory);
        assert_eq!(second.id(), 3);
    }

    #[test]
    fn test_publish_without_receivers() {
        let notifier = EntityNotifier::new();
        notifier.updated(EntityKind::DiscountCoupon, 1);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(EntityEvent::Updated {
            kind: EntityKind::DiscountUsageHistory,
            id: 9,
        })
        .unwrap();
        assert_eq!(json["action"], "updated");
        assert_eq!(json["kind"], "discount_usage_history");
    }
}
