//! Asset slots filled by background loads
//!
//! A slot starts out loading and is drained once per frame by its owner.
//! Failures are logged and leave the slot permanently empty.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// RGBA8 image kept in memory for sampling
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Texture {
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(Error::Asset {
                name: "texture".into(),
                message: format!(
                    "{} pixels do not fit a {}x{} texture",
                    pixels.len(),
                    width,
                    height
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbour sample at UV coordinates in [0, 1]
    pub fn sample(&self, u: f64, v: f64) -> [u8; 4] {
        let x = ((u.clamp(0.0, 1.0) * (self.width - 1) as f64).round() as usize)
            .min(self.width as usize - 1);
        let y = ((v.clamp(0.0, 1.0) * (self.height - 1) as f64).round() as usize)
            .min(self.height as usize - 1);
        self.pixels[y * self.width as usize + x]
    }
}

enum SlotState<T> {
    Loading(oneshot::Receiver<Result<T>>),
    Ready(Arc<T>),
    Failed,
}

/// Receiving end of an asset load
pub struct AssetSlot<T> {
    name: String,
    state: SlotState<T>,
}

/// Sending end of an asset load
pub struct AssetSender<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> AssetSender<T> {
    pub fn send(self, result: Result<T>) {
        // receiver gone means the owner was torn down
        let _ = self.tx.send(result);
    }
}

impl<T: Send + 'static> AssetSlot<T> {
    pub fn channel(name: impl Into<String>) -> (Self, AssetSender<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                name: name.into(),
                state: SlotState::Loading(rx),
            },
            AssetSender { tx },
        )
    }

    /// Run `load` on the blocking pool (inline when no runtime is available)
    pub fn spawn_blocking<F>(name: impl Into<String>, load: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (slot, sender) = Self::channel(name);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || sender.send(load()));
            }
            Err(_) => sender.send(load()),
        }
        slot
    }

    /// Drain the load result if it arrived; returns the asset once ready
    pub fn poll(&mut self) -> Option<Arc<T>> {
        if let SlotState::Loading(rx) = &mut self.state {
            match rx.try_recv() {
                Ok(Ok(value)) => {
                    info!(asset = %self.name, "Asset loaded");
                    self.state = SlotState::Ready(Arc::new(value));
                }
                Ok(Err(e)) => {
                    warn!(asset = %self.name, error = %e, "Asset failed to load");
                    self.state = SlotState::Failed;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    warn!(asset = %self.name, "Asset loader went away without a result");
                    self.state = SlotState::Failed;
                }
            }
        }
        self.get()
    }

    pub fn get(&self) -> Option<Arc<T>> {
        match &self.state {
            SlotState::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }
}

impl<T> std::fmt::Debug for AssetSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            SlotState::Loading(_) => "loading",
            SlotState::Ready(_) => "ready",
            SlotState::Failed => "failed",
        };
        f.debug_struct("AssetSlot")
            .field("name", &self.name)
            .field("state", &state)
            .finish()
    }
}
