//! Combine-latest over a cell's three measurement emitters.
//!
//! [`HeightCombinator`] is the pure part: three optional slots and the height
//! formula. [`observe_height`] wires it to the emitters and forwards every
//! recomputed height to one observer.
//!
//! # Invariants
//!
//! 1. No height is produced until all three slots have been filled once.
//! 2. After that, every update of any slot produces a height.
//! 3. The result depends only on the latest value of each slot, never on
//!    arrival order or on how many times a value was repeated.

use super::height_formula::HeightFormula;
use crate::model::{CombinedHeight, MeasuredSize};
use crate::reactive::{Replay, Subscription};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{trace, warn};

/// One update from one of the three emitters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Natural size of the decoded mood image.
    Image(MeasuredSize),
    /// Fitted size of the title label.
    Title(MeasuredSize),
    /// Fitted size of the description label.
    Description(MeasuredSize),
}

/// Latest value seen from each emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestMeasurements {
    /// Latest image size.
    pub image: Option<MeasuredSize>,
    /// Latest title size.
    pub title: Option<MeasuredSize>,
    /// Latest description size.
    pub description: Option<MeasuredSize>,
}

impl LatestMeasurements {
    /// Replace the slot the measurement belongs to.
    pub fn record(&mut self, measurement: Measurement) {
        match measurement {
            Measurement::Image(size) => self.image = Some(size),
            Measurement::Title(size) => self.title = Some(size),
            Measurement::Description(size) => self.description = Some(size),
        }
    }

    /// `(image, title, description)` once every slot is filled.
    pub fn complete(&self) -> Option<(MeasuredSize, MeasuredSize, MeasuredSize)> {
        Some((self.image?, self.title?, self.description?))
    }
}

/// Pure combine-latest state for one cell binding.
#[derive(Debug, Clone, Default)]
pub struct HeightCombinator {
    formula: HeightFormula,
    latest: LatestMeasurements,
}

impl HeightCombinator {
    /// Create a combinator with empty slots.
    pub fn new(formula: HeightFormula) -> Self {
        Self {
            formula,
            latest: LatestMeasurements::default(),
        }
    }

    /// Record `measurement` and recompute.
    ///
    /// Returns `None` while any slot is still empty.
    pub fn apply(&mut self, measurement: Measurement, cell_width: f64) -> Option<CombinedHeight> {
        self.latest.record(measurement);
        let (image, title, description) = self.latest.complete()?;
        Some(self.formula.combine(cell_width, image, title, description))
    }

    /// Current slot contents.
    pub fn latest(&self) -> &LatestMeasurements {
        &self.latest
    }
}

/// The three emitters a combinator listens to.
#[derive(Clone, Copy)]
pub struct MeasurementSources<'a> {
    /// Image-size emitter.
    pub image: &'a Replay<MeasuredSize>,
    /// Title-size emitter.
    pub title: &'a Replay<MeasuredSize>,
    /// Description-size emitter.
    pub description: &'a Replay<MeasuredSize>,
}

/// Subscribe a fresh combinator to `sources`.
///
/// `cell_width` is read at every recomputation, so the image area follows
/// the cell's current width. Buffered emitter values are replayed on
/// subscription, which yields at most one height if all three are present.
/// Disposing the returned subscription detaches from all three emitters.
pub fn observe_height(
    sources: MeasurementSources<'_>,
    formula: HeightFormula,
    cell_width: impl Fn() -> f64 + 'static,
    on_height: impl FnMut(CombinedHeight) + 'static,
) -> Subscription {
    let state = Rc::new(RefCell::new(HeightCombinator::new(formula)));
    let sink: Rc<RefCell<dyn FnMut(CombinedHeight)>> = Rc::new(RefCell::new(on_height));
    let cell_width: Rc<dyn Fn() -> f64> = Rc::new(cell_width);

    let link = |wrap: fn(MeasuredSize) -> Measurement, source: &Replay<MeasuredSize>| {
        let state = Rc::clone(&state);
        let sink = Rc::clone(&sink);
        let cell_width = Rc::clone(&cell_width);
        source.subscribe(move |size: &MeasuredSize| {
            let measurement = wrap(*size);
            let height = state.borrow_mut().apply(measurement, cell_width());
            let Some(height) = height else {
                trace!(?measurement, "combinator waiting for remaining measurements");
                return;
            };
            trace!(height = height.get(), "combined height");
            match sink.try_borrow_mut() {
                Ok(mut deliver) => (&mut *deliver)(height),
                Err(_) => warn!("height observer re-entered; dropping nested update"),
            }
        })
    };

    Subscription::merge(vec![
        link(Measurement::Image, sources.image),
        link(Measurement::Title, sources.title),
        link(Measurement::Description, sources.description),
    ])
}
