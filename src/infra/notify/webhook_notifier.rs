use crate::domain::models::booking::{Booking, LifecycleEvent};
use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

/// Posts lifecycle transitions to the external notification/calendar
/// dispatcher. With no URL configured, events are only logged, which is
/// the local/offline mode.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }
}

#[derive(Serialize)]
struct EventPayload<'a> {
    event: LifecycleEvent,
    booking: &'a Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    ics: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct DispatchReply {
    calendar_event_id: Option<String>,
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        event: LifecycleEvent,
        booking: &Booking,
        ics: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        if self.webhook_url.is_empty() {
            info!("Lifecycle event {:?} for booking {} (no webhook configured)", event, booking.id);
            return Ok(None);
        }

        let payload = EventPayload { event, booking, ics };

        let res = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Notification webhook connection error: {}", e);
                AppError::Internal
            })?;

        if !res.status().is_success() {
            warn!("Notification webhook rejected event {:?}: {}", event, res.status());
            return Err(AppError::Internal);
        }

        // The dispatcher may mirror the booking into a calendar and hand
        // back the resulting event id.
        let reply = res.json::<DispatchReply>().await.unwrap_or(DispatchReply {
            calendar_event_id: None,
        });
        Ok(reply.calendar_event_id)
    }
}
