//! The cell which displays one campaign.
//!
//! A cell exposes three measurement emitters (image size, title size,
//! description size). Content assignment feeds them: the mood image through
//! the main queue once it decodes, the two labels synchronously through a
//! measurement pass. The listing subscribes a height combinator to the
//! emitters for as long as the cell stays bound to one index.

use super::text_measure::{Fitting, TextMeasurer};
use crate::model::{CombinedHeight, DecodedImage, ImageSource, MeasuredSize};
use crate::reactive::{DisposeBag, MainQueue, Replay, Subscription};
use crate::view_state::{observe_height, HeightFormula, MeasurementSources};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

/// Identity of a cell instance, stable across reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    /// Create a cell id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A text label that measures itself on assignment.
pub struct Label {
    text: RefCell<Option<String>>,
    measurer: Rc<dyn TextMeasurer>,
    fitting: Fitting,
}

impl Label {
    /// Create an empty label.
    pub fn new(measurer: Rc<dyn TextMeasurer>, fitting: Fitting) -> Self {
        Self {
            text: RefCell::new(None),
            measurer,
            fitting,
        }
    }

    /// Current text.
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    fn assign(&self, text: Option<String>) {
        *self.text.borrow_mut() = text;
    }

    fn fitted_size(&self, width: f64) -> Option<MeasuredSize> {
        let text = self.text.borrow();
        let text = text.as_deref()?;
        Some(self.measurer.fitted_size(text, width, self.fitting))
    }
}

/// The image area behind the labels.
#[derive(Default)]
pub struct ImageView {
    image: Rc<RefCell<Option<DecodedImage>>>,
}

impl ImageView {
    /// Create an empty image view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The displayed image.
    pub fn image(&self) -> Option<DecodedImage> {
        self.image.borrow().clone()
    }
}

/// Sub-views a campaign cell is assembled from.
///
/// Every outlet is required. A cell built with a missing outlet fails fast
/// in debug builds; in release builds the corresponding measurement never
/// fires and the row keeps the default height.
#[derive(Default)]
pub struct CellOutlets {
    /// Displays the campaign's title.
    pub name_label: Option<Label>,
    /// Displays the campaign's description.
    pub description_label: Option<Label>,
    /// Displays the mood image.
    pub image_view: Option<ImageView>,
}

impl CellOutlets {
    /// Full set of outlets measuring text with `measurer`.
    pub fn with_measurer(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            name_label: Some(Label::new(Rc::clone(&measurer), Fitting::FillWidth)),
            description_label: Some(Label::new(measurer, Fitting::Compressed)),
            image_view: Some(ImageView::new()),
        }
    }
}

/// A campaign cell and its measurement emitters.
pub struct CampaignCell {
    id: CellId,
    width: Rc<Cell<f64>>,
    name_label: Option<Label>,
    description_label: Option<Label>,
    image_view: Option<ImageView>,
    image_size: Replay<MeasuredSize>,
    title_size: Replay<MeasuredSize>,
    description_size: Replay<MeasuredSize>,
    dispose_bag: RefCell<DisposeBag>,
}

impl CampaignCell {
    /// Assemble a cell from its outlets.
    pub fn new(id: CellId, outlets: CellOutlets) -> Self {
        debug_assert!(outlets.name_label.is_some(), "campaign cell needs a name label");
        debug_assert!(
            outlets.description_label.is_some(),
            "campaign cell needs a description label"
        );
        debug_assert!(outlets.image_view.is_some(), "campaign cell needs an image view");

        Self {
            id,
            width: Rc::new(Cell::new(0.0)),
            name_label: outlets.name_label,
            description_label: outlets.description_label,
            image_view: outlets.image_view,
            image_size: Replay::new(),
            title_size: Replay::new(),
            description_size: Replay::new(),
            dispose_bag: RefCell::new(DisposeBag::new()),
        }
    }

    /// A fully wired cell measuring text with `measurer`.
    pub fn with_measurer(id: CellId, measurer: Rc<dyn TextMeasurer>) -> Self {
        Self::new(id, CellOutlets::with_measurer(measurer))
    }

    /// This instance's identity.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Current width of the cell's bounds.
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    /// Change the cell's width. Assigned texts are measured again at the new
    /// width and re-emitted.
    pub fn resize(&self, width: f64) {
        if self.width.replace(width) == width {
            return;
        }
        trace!(cell = self.id.get(), width, "cell resized");
        self.measure_title();
        self.measure_description();
    }

    /// Start observing `source` and show its image once it arrives.
    ///
    /// Delivery happens on the main context: the image view is updated and
    /// the image-size emitter fires in the same step.
    pub fn set_mood_image(&self, source: &ImageSource, queue: &MainQueue) {
        let Some(image_view) = &self.image_view else {
            return;
        };
        let displayed = Rc::clone(&image_view.image);
        let image_size = self.image_size.clone();
        let id = self.id;
        let subscription = source.subscribe(queue, move |image: DecodedImage| {
            debug!(cell = id.get(), origin = %image.origin, "mood image delivered");
            let size = image.size;
            *displayed.borrow_mut() = Some(image);
            image_size.emit(size);
        });
        self.dispose_bag.borrow_mut().insert(subscription);
    }

    /// Assign the title and emit its fitted size.
    pub fn set_name(&self, name: &str) {
        if let Some(label) = &self.name_label {
            label.assign(Some(name.to_string()));
        }
        self.measure_title();
    }

    /// Assign the description and emit its fitted size.
    pub fn set_description(&self, description: &str) {
        if let Some(label) = &self.description_label {
            label.assign(Some(description.to_string()));
        }
        self.measure_description();
    }

    /// Subscribe a height combinator to this cell's emitters.
    ///
    /// The image area is computed from the cell's width at the moment of each
    /// recomputation.
    pub fn observe_height(
        &self,
        formula: HeightFormula,
        on_height: impl FnMut(CombinedHeight) + 'static,
    ) -> Subscription {
        let width = Rc::clone(&self.width);
        observe_height(
            MeasurementSources {
                image: &self.image_size,
                title: &self.title_size,
                description: &self.description_size,
            },
            formula,
            move || width.get(),
            on_height,
        )
    }

    /// Forget everything tied to the previous binding.
    ///
    /// Image observations are disposed, displayed content is cleared, and the
    /// emitters lose their buffered values so nothing measured for the old
    /// item can replay into the next one.
    pub fn prepare_for_reuse(&self) {
        self.dispose_bag.borrow_mut().dispose();
        if let Some(label) = &self.name_label {
            label.assign(None);
        }
        if let Some(label) = &self.description_label {
            label.assign(None);
        }
        if let Some(image_view) = &self.image_view {
            image_view.image.borrow_mut().take();
        }
        self.image_size.clear();
        self.title_size.clear();
        self.description_size.clear();
    }

    /// Displayed title.
    pub fn name(&self) -> Option<String> {
        self.name_label.as_ref().and_then(Label::text)
    }

    /// Displayed description.
    pub fn description_text(&self) -> Option<String> {
        self.description_label.as_ref().and_then(Label::text)
    }

    /// Displayed mood image.
    pub fn displayed_image(&self) -> Option<DecodedImage> {
        self.image_view.as_ref().and_then(ImageView::image)
    }

    /// Image-size emitter.
    pub fn image_size(&self) -> &Replay<MeasuredSize> {
        &self.image_size
    }

    /// Title-size emitter.
    pub fn title_size(&self) -> &Replay<MeasuredSize> {
        &self.title_size
    }

    /// Description-size emitter.
    pub fn description_size(&self) -> &Replay<MeasuredSize> {
        &self.description_size
    }

    /// Number of live image observations.
    pub fn pending_subscriptions(&self) -> usize {
        self.dispose_bag.borrow().len()
    }

    fn measure_title(&self) {
        let size = self
            .name_label
            .as_ref()
            .and_then(|label| label.fitted_size(self.width.get()));
        if let Some(size) = size {
            self.title_size.emit(size);
        }
    }

    fn measure_description(&self) {
        let size = self
            .description_label
            .as_ref()
            .and_then(|label| label.fitted_size(self.width.get()));
        if let Some(size) = size {
            self.description_size.emit(size);
        }
    }
}

impl std::fmt::Debug for CampaignCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignCell")
            .field("id", &self.id)
            .field("width", &self.width.get())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "campaign_cell_tests.rs"]
mod tests;
