//! Replaying single-slot value source.
//!
//! A [`Replay`] holds at most one buffered value plus a list of observers.
//!
//! # Invariants
//!
//! 1. Observers are notified in registration order.
//! 2. A new observer immediately receives the buffered value, if any.
//! 3. A disposed observer is never called again, including for the rest of
//!    a notification round that is already running.
//! 4. No internal borrow is held while an observer runs, so observers may
//!    subscribe, dispose or emit on any source.
//! 5. An emit on a source that is already notifying is queued and delivered
//!    after the running round, so every observer's last value is `latest()`.

use super::subscription::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{trace, warn};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Observer<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Callback<T>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: Rc::clone(&self.active),
            callback: Rc::clone(&self.callback),
        }
    }
}

struct ReplayState<T> {
    latest: Option<T>,
    observers: Vec<Observer<T>>,
    next_id: u64,
    emitting: bool,
    pending: Option<T>,
}

/// Latest-value holder with observer fan-out.
///
/// Cloning yields another handle to the same source.
pub struct Replay<T> {
    state: Rc<RefCell<ReplayState<T>>>,
}

impl<T> Clone for Replay<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + 'static> Default for Replay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Replay<T> {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ReplayState {
                latest: None,
                observers: Vec::new(),
                next_id: 0,
                emitting: false,
                pending: None,
            })),
        }
    }

    /// Buffer `value` and notify every active observer.
    ///
    /// Called from inside an observer of this same source, the value is
    /// buffered at once but delivered only after the running round ends.
    /// Several such emits collapse into the newest one.
    pub fn emit(&self, value: T) {
        {
            let mut state = self.state.borrow_mut();
            state.latest = Some(value.clone());
            if state.emitting {
                trace!("replay emit queued behind running round");
                state.pending = Some(value);
                return;
            }
            state.emitting = true;
        }

        let mut value = value;
        loop {
            let observers = self.state.borrow().observers.clone();
            trace!(observers = observers.len(), "replay emit");
            for observer in &observers {
                notify(observer, &value);
            }
            let mut state = self.state.borrow_mut();
            match state.pending.take() {
                Some(next) => value = next,
                None => {
                    state.emitting = false;
                    break;
                }
            }
        }
    }

    /// Register an observer. It runs at once with the buffered value, if any.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        let active = Rc::new(Cell::new(true));
        let (id, replayed) = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.observers.push(Observer {
                id,
                active: Rc::clone(&active),
                callback: Rc::clone(&callback),
            });
            (id, state.latest.clone())
        };

        if let Some(value) = replayed {
            notify(
                &Observer {
                    id,
                    active: Rc::clone(&active),
                    callback,
                },
                &value,
            );
        }

        let state: Weak<RefCell<ReplayState<T>>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            active.set(false);
            if let Some(state) = state.upgrade() {
                state.borrow_mut().observers.retain(|o| o.id != id);
            }
        })
    }

    /// The buffered value.
    pub fn latest(&self) -> Option<T> {
        self.state.borrow().latest.clone()
    }

    /// Drop the buffered value. Observers stay registered.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.latest = None;
        state.pending = None;
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }
}

fn notify<T>(observer: &Observer<T>, value: &T) {
    if !observer.active.get() {
        return;
    }
    match observer.callback.try_borrow_mut() {
        Ok(mut callback) => (&mut *callback)(value),
        Err(_) => warn!(
            observer = observer.id,
            "observer re-entered during its own notification; skipped"
        ),
    }
}
