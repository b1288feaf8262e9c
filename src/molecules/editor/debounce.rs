use std::time::Duration;

use tokio::sync::mpsc;

/// Trailing-edge debounce: every `push` restarts the delay and only the
/// last value pushed before a quiet period comes out the other end.
///
/// Must be created inside a tokio runtime. Dropping the handle flushes the
/// pending value, if any, and closes the output channel.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (in_tx, mut in_rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(mut latest) = in_rx.recv().await {
                loop {
                    match tokio::time::timeout(delay, in_rx.recv()).await {
                        Ok(Some(next)) => latest = next,
                        Ok(None) => {
                            let _ = out_tx.send(latest);
                            return;
                        }
                        Err(_) => {
                            if out_tx.send(latest).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (Self { tx: in_tx }, out_rx)
    }

    pub fn push(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(250));
        debouncer.push(1);
        debouncer.push(2);
        debouncer.push(3);

        assert_eq!(rx.recv().await, Some(3));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_push_restarts_the_delay() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(250));
        debouncer.push("a");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ab");
        sleep(Duration::from_millis(200)).await;

        // 300ms after the first edit but only 200ms after the last one
        assert!(rx.try_recv().is_err());

        let settled = timeout(Duration::from_millis(100), rx.recv()).await;
        assert_eq!(settled.unwrap(), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(50));
        debouncer.push(1);
        assert_eq!(rx.recv().await, Some(1));
        debouncer.push(2);
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_flushes_pending_value() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_secs(60));
        debouncer.push("pending");
        drop(debouncer);

        assert_eq!(rx.recv().await, Some("pending"));
        assert_eq!(rx.recv().await, None);
    }
}
