//! Main-context delivery queue.
//!
//! Background work never touches cells or the height cache. It holds a
//! [`MainSender`] and posts values; the main context runs the matching handler
//! when it drains the queue. Handlers are `!Send` and live only on the main
//! side, so a handler cannot be invoked from any other thread.
//!
//! Disposing the [`Subscription`] returned by [`MainQueue::register`] removes
//! the handler; values posted for it afterwards are dropped on drain.

use super::subscription::Subscription;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;
use tracing::{debug, trace};

type Payload = Box<dyn Any + Send>;
type Handler = Rc<RefCell<dyn FnMut(Payload)>>;

struct Envelope {
    token: u64,
    payload: Payload,
}

#[derive(Default)]
struct Registry {
    next_token: u64,
    handlers: HashMap<u64, Handler>,
}

struct QueueInner {
    registry: RefCell<Registry>,
    sender: Sender<Envelope>,
    receiver: Receiver<Envelope>,
    draining: Cell<bool>,
}

/// Handle to the main context's queue. Cheap to clone; `!Send`.
#[derive(Clone)]
pub struct MainQueue {
    inner: Rc<QueueInner>,
}

/// Thread-safe posting half bound to one registered handler.
pub struct MainSender<T> {
    token: u64,
    sender: Sender<Envelope>,
    _value: PhantomData<fn(T)>,
}

impl<T> Clone for MainSender<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            sender: self.sender.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for MainSender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainSender")
            .field("token", &self.token)
            .finish()
    }
}

impl<T> MainSender<T> {
    /// Identity of the handler this sender posts to.
    pub fn token(&self) -> u64 {
        self.token
    }
}

impl<T: Send + 'static> MainSender<T> {
    /// Post `value` for delivery on the main context.
    ///
    /// Returns `false` if the queue no longer exists.
    pub fn send(&self, value: T) -> bool {
        self.sender
            .send(Envelope {
                token: self.token,
                payload: Box::new(value),
            })
            .is_ok()
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MainQueue {
    /// Create a queue owned by the current (main) thread.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            inner: Rc::new(QueueInner {
                registry: RefCell::new(Registry::default()),
                sender,
                receiver,
                draining: Cell::new(false),
            }),
        }
    }

    /// Register a main-context handler for values of type `T`.
    pub fn register<T: Send + 'static>(
        &self,
        mut handler: impl FnMut(T) + 'static,
    ) -> (MainSender<T>, Subscription) {
        let handler: Handler = Rc::new(RefCell::new(move |payload: Payload| {
            if let Ok(value) = payload.downcast::<T>() {
                handler(*value);
            }
        }));
        let token = {
            let mut registry = self.inner.registry.borrow_mut();
            let token = registry.next_token;
            registry.next_token += 1;
            registry.handlers.insert(token, handler);
            token
        };

        let registry: Weak<QueueInner> = Rc::downgrade(&self.inner);
        let subscription = Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                inner.registry.borrow_mut().handlers.remove(&token);
            }
        });
        let sender = MainSender {
            token,
            sender: self.inner.sender.clone(),
            _value: PhantomData,
        };
        (sender, subscription)
    }

    /// Run every handler whose value is already queued. Never blocks.
    ///
    /// Returns the number of values delivered to a live handler. A drain
    /// started from inside a handler is a no-op; the outer drain picks up
    /// whatever the handler posted.
    pub fn drain(&self) -> usize {
        if self.inner.draining.replace(true) {
            return 0;
        }
        let mut delivered = 0;
        loop {
            match self.inner.receiver.try_recv() {
                Ok(envelope) => {
                    if self.dispatch(envelope) {
                        delivered += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.inner.draining.set(false);
        if delivered > 0 {
            debug!(delivered, "main queue drained");
        }
        delivered
    }

    /// Idle until a value arrives or `timeout` elapses, then drain.
    ///
    /// This is the run loop's wait; handlers must never call it.
    pub fn run_once(&self, timeout: Duration) -> usize {
        if self.inner.draining.get() {
            return 0;
        }
        match self.inner.receiver.recv_timeout(timeout) {
            Ok(envelope) => {
                self.inner.draining.set(true);
                let first = usize::from(self.dispatch(envelope));
                self.inner.draining.set(false);
                first + self.drain()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Number of live handlers.
    pub fn handler_count(&self) -> usize {
        self.inner.registry.borrow().handlers.len()
    }

    fn dispatch(&self, envelope: Envelope) -> bool {
        let handler = self
            .inner
            .registry
            .borrow()
            .handlers
            .get(&envelope.token)
            .cloned();
        let Some(handler) = handler else {
            trace!(token = envelope.token, "dropping value for disposed handler");
            return false;
        };
        let Ok(mut run) = handler.try_borrow_mut() else {
            trace!(token = envelope.token, "handler busy; value dropped");
            return false;
        };
        (&mut *run)(envelope.payload);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn values_posted_from_another_thread_arrive_on_drain() {
        let queue = MainQueue::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let (sender, _subscription) = queue.register(move |v: u32| sink.borrow_mut().push(v));

        thread::spawn(move || {
            sender.send(1);
            sender.send(2);
        })
        .join()
        .expect("sender thread");

        // Nothing runs until the main context drains.
        assert!(received.borrow().is_empty());
        assert_eq!(queue.drain(), 2);
        assert_eq!(*received.borrow(), vec![1, 2]);
    }

    #[test]
    fn disposed_handler_drops_late_values() {
        let queue = MainQueue::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let (sender, subscription) = queue.register(move |v: u32| sink.borrow_mut().push(v));

        sender.send(7);
        subscription.dispose();

        assert_eq!(queue.drain(), 0);
        assert!(received.borrow().is_empty());
        assert_eq!(queue.handler_count(), 0);
    }

    #[test]
    fn drain_on_empty_queue_returns_zero() {
        let queue = MainQueue::new();
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn handler_posting_again_is_picked_up_by_same_drain() {
        let queue = MainQueue::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let slot: Rc<RefCell<Option<MainSender<u32>>>> = Rc::new(RefCell::new(None));
        let again = Rc::clone(&slot);
        let (sender, _subscription) = queue.register(move |v: u32| {
            sink.borrow_mut().push(v);
            if v == 1 {
                if let Some(sender) = again.borrow().as_ref() {
                    sender.send(2);
                }
            }
        });
        *slot.borrow_mut() = Some(sender.clone());

        sender.send(1);

        assert_eq!(queue.drain(), 2);
        assert_eq!(*received.borrow(), vec![1, 2]);
    }

    #[test]
    fn run_once_times_out_without_values() {
        let queue = MainQueue::new();
        assert_eq!(queue.run_once(Duration::from_millis(5)), 0);
    }

    #[test]
    fn run_once_waits_for_background_value() {
        let queue = MainQueue::new();
        let received = Rc::new(Cell::new(0));
        let sink = Rc::clone(&received);
        let (sender, _subscription) = queue.register(move |v: u32| sink.set(v));

        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            sender.send(5);
        });

        assert_eq!(queue.run_once(Duration::from_secs(5)), 1);
        assert_eq!(received.get(), 5);
        worker.join().expect("worker");
    }
}
