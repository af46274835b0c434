use async_trait::async_trait;
use blockcore::Element;
use tokio::time::{sleep, Duration};

/// Hook awaited before each element runs, to pace a run for display.
///
/// Pacing never changes results; tests use [`NoPacing`].
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pace(&self, element: &Element);
}

/// Run elements back to back
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pace(&self, _element: &Element) {}
}

/// Wait a fixed duration before every element
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pace(&self, element: &Element) {
        tracing::trace!("Pacing {} for {:?}", element.id(), self.0);
        sleep(self.0).await;
    }
}
