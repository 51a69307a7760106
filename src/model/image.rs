//! Asynchronous, replayable mood-image source.
//!
//! An [`ImageSource`] eventually yields exactly one [`DecodedImage`] or never
//! yields at all. The decoding side holds an [`ImageResolver`] and may resolve
//! from any thread; observers are always called on the main context through a
//! [`MainQueue`].

use super::geometry::Size;
use crate::reactive::{MainQueue, MainSender, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::warn;

/// A decoded image. Only its natural pixel size matters to layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Where the image came from (URL, path, asset name).
    pub origin: String,
    /// Natural size in pixels.
    pub size: Size,
}

impl DecodedImage {
    /// Create a decoded image.
    pub fn new(origin: impl Into<String>, size: Size) -> Self {
        Self {
            origin: origin.into(),
            size,
        }
    }
}

#[derive(Debug, Default)]
struct SlotState {
    image: Option<DecodedImage>,
    waiters: Vec<MainSender<DecodedImage>>,
}

#[derive(Debug, Default)]
struct ImageSlot {
    state: Mutex<SlotState>,
}

impl ImageSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared handle to a single-value image source.
#[derive(Debug, Clone, Default)]
pub struct ImageSource {
    slot: Arc<ImageSlot>,
}

/// Decoder-side handle that completes an [`ImageSource`]. `Send`.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    slot: Arc<ImageSlot>,
}

impl ImageSource {
    /// A source that has not resolved yet, with the handle that resolves it.
    pub fn pending() -> (Self, ImageResolver) {
        let slot = Arc::new(ImageSlot::default());
        (
            Self {
                slot: Arc::clone(&slot),
            },
            ImageResolver { slot },
        )
    }

    /// A source that already holds its image.
    pub fn ready(image: DecodedImage) -> Self {
        let (source, resolver) = Self::pending();
        resolver.resolve(image);
        source
    }

    /// A source that never yields.
    pub fn never() -> Self {
        Self::default()
    }

    /// Observe the image on the main context.
    ///
    /// A source that already resolved replays its image; delivery still goes
    /// through `queue` and happens on its next drain. Disposing the returned
    /// subscription also withdraws its waiter from an unresolved source.
    pub fn subscribe(
        &self,
        queue: &MainQueue,
        on_image: impl FnMut(DecodedImage) + 'static,
    ) -> Subscription {
        let (sender, handler) = queue.register(on_image);
        let token = sender.token();
        let mut state = self.slot.lock();
        if let Some(image) = state.image.clone() {
            sender.send(image);
            return handler;
        }
        state.waiters.push(sender);
        drop(state);

        let slot: Weak<ImageSlot> = Arc::downgrade(&self.slot);
        let waiter = Subscription::new(move || {
            if let Some(slot) = slot.upgrade() {
                slot.lock().waiters.retain(|w| w.token() != token);
            }
        });
        Subscription::merge(vec![waiter, handler])
    }

    #[cfg(test)]
    fn waiter_count(&self) -> usize {
        self.slot.lock().waiters.len()
    }

    /// The image, if it has resolved.
    pub fn current(&self) -> Option<DecodedImage> {
        self.slot.lock().image.clone()
    }

    /// True if both handles refer to the same source.
    pub fn same_source(&self, other: &ImageSource) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl ImageResolver {
    /// Complete the source and notify every waiting observer.
    ///
    /// Only the first resolution counts; later calls return `false`.
    pub fn resolve(&self, image: DecodedImage) -> bool {
        let waiters = {
            let mut state = self.slot.lock();
            if state.image.is_some() {
                warn!(origin = %image.origin, "image source resolved twice; ignoring");
                return false;
            }
            state.image = Some(image.clone());
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            waiter.send(image.clone());
        }
        true
    }
}
