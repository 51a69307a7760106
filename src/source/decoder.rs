//! Simulated image decoding.
//!
//! Each feed image gets a pending [`ImageSource`]; a background thread sleeps
//! for the image's decode latency and then resolves it. Images the feed does
//! not describe never resolve.

use super::feed::{FeedEntry, FeedImage};
use crate::model::{CampaignItem, DecodedImage, ImageResolver, ImageSource, Size};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// An image waiting to be decoded.
#[derive(Debug)]
pub struct PendingDecode {
    resolver: ImageResolver,
    image: DecodedImage,
    delay: Duration,
}

impl PendingDecode {
    /// Natural size the decode will report.
    pub fn size(&self) -> Size {
        self.image.size
    }
}

/// Build campaign items from the feed.
///
/// Returns the items together with the decodes that will complete their
/// images, in feed order.
pub fn campaigns_from_feed(entries: &[FeedEntry]) -> (Vec<CampaignItem>, Vec<PendingDecode>) {
    let mut items = Vec::with_capacity(entries.len());
    let mut pending = Vec::new();
    for entry in entries {
        let source = match &entry.image {
            Some(image) => {
                let (source, resolver) = ImageSource::pending();
                pending.push(PendingDecode {
                    resolver,
                    image: decoded(entry, image),
                    delay: Duration::from_millis(image.delay_ms),
                });
                source
            }
            None => ImageSource::never(),
        };
        items.push(CampaignItem::new(&entry.name, &entry.description, source));
    }
    (items, pending)
}

fn decoded(entry: &FeedEntry, image: &FeedImage) -> DecodedImage {
    let origin = image
        .origin
        .clone()
        .unwrap_or_else(|| format!("feed://{}", entry.name));
    DecodedImage::new(origin, Size::new(image.width, image.height))
}

/// Background decode threads.
#[derive(Debug, Default)]
pub struct SimulatedDecoder {
    workers: Vec<JoinHandle<()>>,
}

impl SimulatedDecoder {
    /// Start one decode thread per pending image.
    pub fn start(pending: Vec<PendingDecode>) -> Self {
        let workers = pending
            .into_iter()
            .enumerate()
            .filter_map(|(n, job)| {
                thread::Builder::new()
                    .name(format!("decode-{n}"))
                    .spawn(move || {
                        thread::sleep(job.delay);
                        debug!(origin = %job.image.origin, "image decoded");
                        job.resolver.resolve(job.image);
                    })
                    .map_err(|e| warn!(error = %e, "could not start decode thread; image never loads"))
                    .ok()
            })
            .collect();
        Self { workers }
    }

    /// Number of decode threads started.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// True if no decode was started.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// True once every decode thread has resolved its image.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(JoinHandle::is_finished)
    }

    /// Wait for every decode thread.
    pub fn join(self) {
        for worker in self.workers {
            if worker.join().is_err() {
                warn!("decode thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::MainQueue;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn entry(name: &str, image: Option<(f64, f64)>) -> FeedEntry {
        FeedEntry {
            name: name.to_string(),
            description: format!("{name} description"),
            image: image.map(|(width, height)| FeedImage {
                width,
                height,
                delay_ms: 1,
                origin: None,
            }),
        }
    }

    #[test]
    fn feed_without_image_never_resolves() {
        let (items, pending) = campaigns_from_feed(&[entry("a", None)]);
        assert_eq!(items.len(), 1);
        assert!(pending.is_empty());
        assert!(items[0].mood_image().current().is_none());
    }

    #[test]
    fn decode_threads_resolve_through_main_queue() {
        // GIVEN two campaigns, one with an image
        let (items, pending) = campaigns_from_feed(&[entry("a", Some((400.0, 300.0))), entry("b", None)]);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].size(), Size::new(400.0, 300.0));
        let queue = MainQueue::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = items[0]
            .mood_image()
            .subscribe(&queue, move |image| sink.borrow_mut().push(image.origin));

        // WHEN the decoder finishes and the main queue drains
        let decoder = SimulatedDecoder::start(pending);
        assert_eq!(decoder.len(), 1);
        decoder.join();
        queue.drain();

        // THEN the image arrived exactly once with its default origin
        assert_eq!(*seen.borrow(), vec!["feed://a".to_string()]);
    }

    #[test]
    fn empty_decoder_is_finished() {
        let decoder = SimulatedDecoder::start(Vec::new());
        assert!(decoder.is_empty());
        assert!(decoder.is_finished());
    }
}
