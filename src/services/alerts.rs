use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::alert::Alert;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub kind: String,
    pub alert: Alert,
}

impl AlertEvent {
    pub fn created(alert: Alert) -> Self {
        Self {
            kind: "created".to_string(),
            alert,
        }
    }

    pub fn updated(alert: Alert) -> Self {
        Self {
            kind: "updated".to_string(),
            alert,
        }
    }
}

/// Publish/subscribe hub for live alert streaming, one channel per
/// establishment. Subscribers unsubscribe by dropping their receiver;
/// senders without listeners are pruned on the next publish.
#[derive(Default)]
pub struct AlertBroadcaster {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<AlertEvent>>>,
}

impl AlertBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, establishment_id: Uuid) -> broadcast::Receiver<AlertEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(establishment_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub async fn publish(&self, establishment_id: Uuid, event: AlertEvent) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&establishment_id) {
            if sender.send(event).is_err() {
                // Last receiver is gone.
                channels.remove(&establishment_id);
            }
        }
    }

    #[cfg(test)]
    async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::status;
    use chrono::Utc;

    fn alert(establishment_id: Uuid) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            establishment_id,
            slot_id: Uuid::new_v4(),
            reporter_id: Uuid::new_v4(),
            message: Some("Car blocking the slot".to_string()),
            status: status::PENDING.to_string(),
            created_at: Utc::now(),
            viewed_at: None,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_events_for_its_establishment() {
        let hub = AlertBroadcaster::new();
        let establishment_id = Uuid::new_v4();
        let mut rx = hub.subscribe(establishment_id).await;

        hub.publish(establishment_id, AlertEvent::created(alert(establishment_id)))
            .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, "created");
        assert_eq!(event.alert.establishment_id, establishment_id);
    }

    #[tokio::test]
    async fn events_are_scoped_per_establishment() {
        let hub = AlertBroadcaster::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = hub.subscribe(a).await;
        let _rx_b = hub.subscribe(b).await;

        hub.publish(b, AlertEvent::created(alert(b))).await;
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn channel_is_pruned_after_last_subscriber_drops() {
        let hub = AlertBroadcaster::new();
        let establishment_id = Uuid::new_v4();
        let rx = hub.subscribe(establishment_id).await;
        drop(rx);

        hub.publish(establishment_id, AlertEvent::created(alert(establishment_id)))
            .await;
        assert_eq!(hub.channel_count().await, 0);
    }
}
