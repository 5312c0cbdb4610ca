//! Bridge from PostgreSQL `LISTEN/NOTIFY` into the in-process [`ChangeFeed`].
//!
//! The `notify_table_change` trigger publishes a JSON payload such as
//! `{"table":"complaints","op":"UPDATE","id":5}` on [`CHANGE_CHANNEL`] for
//! every committed row mutation. [`ChangeListener`] holds a dedicated
//! connection, decodes those payloads and republishes them on the feed.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgListener, PgNotification};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bus::{ChangeEvent, ChangeFeed};

/// Notification channel used by the `notify_table_change` trigger.
pub const CHANGE_CHANNEL: &str = "table_changes";

/// Pause before polling again after a listener error.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Long-lived `LISTEN` connection feeding a [`ChangeFeed`].
pub struct ChangeListener {
    listener: PgListener,
    feed: Arc<ChangeFeed>,
    tables: Vec<String>,
}

impl ChangeListener {
    /// Open a dedicated connection and start listening on [`CHANGE_CHANNEL`].
    ///
    /// `tables` are the tables for which a resync event is published when
    /// the connection drops and notifications may have been lost.
    pub async fn connect(
        pool: &PgPool,
        feed: Arc<ChangeFeed>,
        tables: &[&str],
    ) -> Result<Self, sqlx::Error> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        tracing::info!(channel = CHANGE_CHANNEL, "Listening for table changes");

        Ok(Self {
            listener,
            feed,
            tables: tables.iter().map(|t| (*t).to_string()).collect(),
        })
    }

    /// Run the forwarding loop on a background task until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!("Change listener stopped");
                    break;
                }
                received = self.listener.try_recv() => match received {
                    Ok(Some(notification)) => self.forward(&notification),
                    Ok(None) => {
                        // The connection was lost; the next call reconnects.
                        tracing::warn!("Change listener connection lost, reconnecting");
                        for table in &self.tables {
                            self.feed.publish(ChangeEvent::resync(table.clone()));
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Change listener failed to receive");
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                },
            }
        }
    }

    fn forward(&self, notification: &PgNotification) {
        match parse_payload(notification.payload()) {
            Ok(event) => {
                tracing::debug!(
                    table = %event.table,
                    op = ?event.kind,
                    id = ?event.id,
                    "Table change received"
                );
                self.feed.publish(event);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    payload = notification.payload(),
                    "Ignoring malformed change notification"
                );
            }
        }
    }
}

/// Decode a trigger payload into a [`ChangeEvent`].
pub fn parse_payload(payload: &str) -> Result<ChangeEvent, serde_json::Error> {
    serde_json::from_str(payload)
}
