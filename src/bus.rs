use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop between the render loop and the runtime.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes `msg`; returns `false` when nobody is subscribed.
    pub fn publish(&self, msg: T) -> bool {
        self.tx.send(Arc::new(msg)).is_ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_subscribers() {
        let topic: Topic<u32> = Topic::new(4);
        assert!(!topic.publish(1));

        let mut rx = topic.subscribe();
        assert!(topic.publish(2));
        assert_eq!(*rx.try_recv().unwrap(), 2);
    }

    #[test]
    fn test_slow_subscriber_lags() {
        let topic: Topic<u32> = Topic::new(2);
        let mut rx = topic.subscribe();
        for i in 0..5 {
            topic.publish(i);
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(3))
        ));
        assert_eq!(*rx.try_recv().unwrap(), 3);
    }
}
