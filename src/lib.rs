//! Campaign Browser
//!
//! Headless campaign listing: a virtualized list of campaigns whose row
//! heights are computed reactively from three per-cell measurements (mood
//! image size, title size, description size) and fed back into the list's
//! layout cycle.
//!
//! # Module Structure
//!
//! - `reactive`: replaying emitters, subscriptions, the main-context queue
//! - `model`: campaign items, image sources, geometry, errors
//! - `view_state`: height formula, combinator, height cache, row layout
//! - `cell`: the campaign cell and its measurement emitters
//! - `listing`: data sources, host container, the listing screen
//! - `source`: campaign feed and simulated image decoding
//! - `config`, `logging`, `report`: binary support

pub mod cell;
pub mod config;
pub mod listing;
pub mod logging;
pub mod model;
pub mod reactive;
pub mod report;
pub mod source;
pub mod view_state;

