//! One-shot readiness gate for collaborators that come up asynchronously

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Resolved by the collaborator once it is ready
pub struct DependencyProvider<T> {
    name: String,
    tx: oneshot::Sender<T>,
}

/// Awaited once by the consumer
pub struct DependencyGate<T> {
    name: String,
    rx: oneshot::Receiver<T>,
    warn_every: Duration,
}

/// Create a connected provider/gate pair
pub fn dependency<T>(name: impl Into<String>, warn_every: Duration) -> (DependencyProvider<T>, DependencyGate<T>) {
    let name = name.into();
    let (tx, rx) = oneshot::channel();
    (
        DependencyProvider {
            name: name.clone(),
            tx,
        },
        DependencyGate {
            name,
            rx,
            warn_every,
        },
    )
}

impl<T> DependencyProvider<T> {
    pub fn provide(self, value: T) {
        if self.tx.send(value).is_err() {
            debug!(dependency = %self.name, "Dependency provided after its gate was dropped");
        }
    }
}

impl<T> DependencyGate<T> {
    /// Wait for the dependency, logging a warning every `warn_every` while it is missing.
    ///
    /// There is no timeout. Fails only when the provider is dropped unresolved.
    pub async fn wait(mut self) -> Result<T> {
        let mut waited = Duration::ZERO;
        loop {
            tokio::select! {
                result = &mut self.rx => {
                    return result.map_err(|_| Error::Other(format!(
                        "dependency '{}' was dropped before it became ready",
                        self.name
                    )));
                }
                _ = tokio::time::sleep(self.warn_every) => {
                    waited += self.warn_every;
                    warn!(
                        dependency = %self.name,
                        waited_ms = waited.as_millis() as u64,
                        "Dependency not ready yet, still waiting"
                    );
                }
            }
        }
    }
}
