//! Reactive plumbing for the height pipeline.
//!
//! - `replay`: [`Replay`] - latest-value holder with ordered observer fan-out
//! - `subscription`: [`Subscription`] and [`DisposeBag`] - explicit cancellation
//! - `main_queue`: [`MainQueue`] - funnels background results onto the main context
//!
//! Everything except [`MainSender`] is `!Send`: state observed by cells and the
//! height cache can only be touched from the thread that owns the queue.

pub mod main_queue;
pub mod replay;
pub mod subscription;

pub use main_queue::{MainQueue, MainSender};
pub use replay::Replay;
pub use subscription::{DisposeBag, Subscription};
