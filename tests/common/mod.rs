//! Shared fixtures for listing integration tests.

#![allow(dead_code)]

use campaign_browser::cell::{Fitting, TextMeasurer};
use campaign_browser::listing::{CampaignListingView, HeadlessHost, ListingSettings};
use campaign_browser::model::{
    CampaignItem, DecodedImage, ImageResolver, ImageSource, ItemIndex, Size,
};
use campaign_browser::reactive::MainQueue;
use std::rc::Rc;

/// Title is always 20.4 tall, description always 40.6.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasurer {
    pub title: f64,
    pub description: f64,
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self {
            title: 20.4,
            description: 40.6,
        }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn fitted_size(&self, _text: &str, max_width: f64, fitting: Fitting) -> Size {
        match fitting {
            Fitting::FillWidth => Size::new(max_width, self.title),
            Fitting::Compressed => Size::new(max_width / 2.0, self.description),
        }
    }
}

/// A listing on a headless host with one pending image per campaign.
pub struct Fixture {
    pub queue: MainQueue,
    pub host: Rc<HeadlessHost>,
    pub view: CampaignListingView,
    pub resolvers: Vec<ImageResolver>,
}

impl Fixture {
    /// Loading listing in a `width` x `height` viewport.
    pub fn new(width: f64, height: f64) -> Self {
        let queue = MainQueue::new();
        let host = Rc::new(HeadlessHost::new(
            Size::new(width, height),
            Rc::new(FixedMeasurer::default()),
        ));
        let view = CampaignListingView::new(host.clone(), queue.clone(), ListingSettings::default());
        Self {
            queue,
            host,
            view,
            resolvers: Vec::new(),
        }
    }

    /// Display `count` campaigns whose images are still pending.
    pub fn display(&mut self, count: usize) {
        let mut campaigns = Vec::with_capacity(count);
        self.resolvers.clear();
        for i in 0..count {
            let (source, resolver) = ImageSource::pending();
            campaigns.push(CampaignItem::new(format!("Campaign {i}"), "Description", source));
            self.resolvers.push(resolver);
        }
        self.view.display(campaigns);
    }

    /// Resolve image `index` with a 400x300 image and drain the main queue.
    pub fn deliver(&self, index: usize) {
        self.resolvers[index].resolve(DecodedImage::new(
            format!("test://{index}"),
            Size::new(400.0, 300.0),
        ));
        self.queue.drain();
    }

    /// Recorded height of row `index`.
    pub fn cached(&self, index: usize) -> Option<f64> {
        self.view.cached_height(ItemIndex::new(index)).map(|h| h.get())
    }

    /// Row heights of the last layout pass.
    pub fn heights(&self) -> Vec<usize> {
        self.host.frames().iter().map(|f| f.height).collect()
    }
}
