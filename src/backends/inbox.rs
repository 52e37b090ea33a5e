// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::graph::{Delivery, DeliveryOutcome, DeliveryTicket, GraphStore};
use crate::observability::messages::connector::{DeliveryDropped, DeliveryWaitTimedOut};
use crate::observability::messages::StructuredLog;
use crate::traits::Connector;

/// Cloneable handle connectors use to hand deliveries back.
#[derive(Debug, Clone)]
pub struct DeliverySender {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl DeliverySender {
    /// Queue a delivery. Returns false once the inbox has been dropped.
    pub fn send(&self, delivery: Delivery) -> bool {
        match self.tx.send(delivery) {
            Ok(()) => true,
            Err(mpsc::error::SendError(delivery)) => {
                DeliveryDropped {
                    node_id: &delivery.node_id,
                }
                .log();
                false
            }
        }
    }
}

/// Queue of deliveries waiting to be applied to a [`GraphStore`].
///
/// The store itself is never shared with connector tasks; whoever owns it
/// drains the inbox, so every mutation stays on one task.
#[derive(Debug)]
pub struct DeliveryInbox {
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl Default for DeliveryInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryInbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> DeliverySender {
        DeliverySender {
            tx: self.tx.clone(),
        }
    }

    /// Apply every delivery already queued without waiting. Returns how many
    /// were taken off the queue.
    pub fn drain_into(&mut self, store: &mut GraphStore) -> usize {
        let mut drained = 0;
        while let Ok(delivery) = self.rx.try_recv() {
            apply(store, delivery);
            drained += 1;
        }
        drained
    }

    /// Wait for the next delivery and apply it.
    pub async fn recv_into(&mut self, store: &mut GraphStore) -> Option<DeliveryOutcome> {
        let delivery = self.rx.recv().await?;
        apply(store, delivery)
    }

    /// Wait for up to `expected` deliveries, giving up after `deadline`, then
    /// apply whatever else is already queued. Returns the total applied,
    /// including those that arrived before a timeout.
    pub async fn recv_within(
        &mut self,
        store: &mut GraphStore,
        expected: usize,
        deadline: Duration,
    ) -> usize {
        let mut received = 0;
        let waited = tokio::time::timeout(deadline, async {
            while received < expected {
                let Some(delivery) = self.rx.recv().await else {
                    break;
                };
                apply(store, delivery);
                received += 1;
            }
        })
        .await;
        if waited.is_err() {
            DeliveryWaitTimedOut {
                received,
                expected,
            }
            .log();
        }
        received + self.drain_into(store)
    }

    /// Apply deliveries as they arrive until `token` is cancelled.
    pub async fn run_until_cancelled(
        &mut self,
        store: &mut GraphStore,
        token: CancellationToken,
    ) -> usize {
        let mut applied = 0;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                delivery = self.rx.recv() => match delivery {
                    Some(delivery) => {
                        apply(store, delivery);
                        applied += 1;
                    }
                    None => break,
                },
            }
        }
        applied
    }
}

/// Unknown nodes are already logged by the store.
fn apply(store: &mut GraphStore, delivery: Delivery) -> Option<DeliveryOutcome> {
    store.deliver_dataset(delivery).ok()
}

/// Run `connector` on its own task and post the result for `ticket`.
pub fn spawn_connection(
    connector: Arc<dyn Connector>,
    ticket: DeliveryTicket,
    sender: DeliverySender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let delivery = match connector.fetch().await {
            Ok(fetched) => {
                let delivery = ticket.deliver(fetched.rows);
                match fetched.schema {
                    Some(schema) => delivery.with_schema(schema),
                    None => delivery,
                }
            }
            Err(err) => ticket.fail(err.to_string()),
        };
        sender.send(delivery);
    })
}
