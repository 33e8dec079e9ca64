//! Pass-through event forwarding
//!
//! Everything received on `source` is re-emitted on `target` in order, with
//! no filtering, transformation, drops, or duplicates. The task ends when the
//! source side closes; a closed target only means nobody is listening any
//! more, which is not the relay's problem.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Forward all events from `source` onto `target`, fire-and-forget
pub fn relay<E: Send + 'static>(
    mut source: UnboundedReceiver<E>,
    target: UnboundedSender<E>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = source.recv().await {
            if target.send(event).is_err() {
                // Receiver dropped; drain silently until the source closes
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{channel, SessionEvent};
    use proptest::prelude::*;

    #[tokio::test]
    async fn relays_in_order() {
        let (source_tx, source_rx) = channel();
        let (target_tx, mut target_rx) = channel();
        let handle = relay(source_rx, target_tx);

        let events = vec![
            SessionEvent::PreviewStarted { port: 8000 },
            SessionEvent::progress("a", serde_json::json!(1)),
            SessionEvent::progress("b", serde_json::json!(2)),
        ];
        for event in &events {
            source_tx.send(event.clone()).unwrap();
        }
        drop(source_tx);
        handle.await.unwrap();

        let mut seen = Vec::new();
        while let Some(event) = target_rx.recv().await {
            seen.push(event);
        }
        assert_eq!(seen, events);
    }

    #[tokio::test]
    async fn stops_when_target_dropped() {
        let (source_tx, source_rx) = channel();
        let (target_tx, target_rx) = channel();
        drop(target_rx);
        let handle = relay(source_rx, target_tx);

        source_tx
            .send(SessionEvent::progress("x", serde_json::Value::Null))
            .unwrap();
        handle.await.unwrap();
    }

    proptest! {
        // Relay fidelity: arbitrary (name, payload) sequences come out
        // identical, in order, with no drops or duplicates.
        #[test]
        fn relay_fidelity(pairs in proptest::collection::vec(("[a-z:]{1,12}", 0i64..1000), 0..64)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async {
                let (source_tx, source_rx) = channel();
                let (target_tx, mut target_rx) = channel();
                let handle = relay(source_rx, target_tx);

                let events: Vec<_> = pairs
                    .iter()
                    .map(|(name, n)| SessionEvent::progress(name.clone(), serde_json::json!(n)))
                    .collect();
                for event in &events {
                    source_tx.send(event.clone()).unwrap();
                }
                drop(source_tx);
                handle.await.unwrap();

                let mut seen = Vec::new();
                while let Some(event) = target_rx.recv().await {
                    seen.push(event);
                }
                assert_eq!(seen, events);
            });
        }
    }
}
