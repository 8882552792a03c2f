use std::cell::RefCell;
use std::error::Error;
use std::future::Future;
use std::rc::Rc;

use futures::lock::Mutex;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::MutationFailure;

slotmap::new_key_type! { struct ObserverKey; }

type Observer = Rc<dyn Fn()>;

/// Observable holder of a single state value.
///
/// `Store` is a cloneable handle: clones share the same state and observer
/// set. The state is replaced wholesale by [`mutate`](Store::mutate) /
/// [`set_state`](Store::set_state), never edited in place, so `read` always
/// hands out a coherent snapshot.
pub struct Store<S: 'static>(Rc<Inner<S>>);

struct Inner<S> {
    state: RefCell<S>,
    observers: RefCell<SlotMap<ObserverKey, Observer>>,
    // Acquired before the current state is sampled and held until
    // notification finishes. Waiters queue in lock order, which is what
    // serializes interleaved async mutations.
    write_gate: Mutex<()>,
}

impl<S: Clone + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        Self(Rc::new(Inner {
            state: RefCell::new(initial),
            observers: RefCell::new(SlotMap::with_key()),
            write_gate: Mutex::new(()),
        }))
    }

    /// Clone of the current snapshot.
    pub fn read(&self) -> S {
        self.0.state.borrow().clone()
    }

    /// Borrow-read without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.0.state.borrow())
    }

    /// Computes the next state from the current one and replaces it.
    ///
    /// The updater receives the state as of the moment it actually runs, not
    /// as of the call: concurrent `mutate` calls on one store are serialized
    /// in call order, so a later updater always sees an earlier one's result.
    /// On success every currently-registered observer is invoked (with no
    /// payload; observers re-[`read`](Store::read)) before the returned
    /// future resolves. If the updater fails, the state is untouched and no
    /// observer runs.
    pub async fn mutate<F, Fut, E>(&self, updater: F) -> Result<(), MutationFailure>
    where
        F: FnOnce(S) -> Fut,
        Fut: Future<Output = Result<S, E>>,
        E: Into<Box<dyn Error + 'static>>,
    {
        let _gate = self.0.write_gate.lock().await;
        let current = self.read();
        let next = updater(current)
            .await
            .map_err(|e| MutationFailure::new(e.into()))?;
        *self.0.state.borrow_mut() = next;
        self.notify();
        Ok(())
    }

    /// [`mutate`](Store::mutate) with a synchronous, infallible updater.
    pub async fn set_state(&self, f: impl FnOnce(&S) -> S) -> Result<(), MutationFailure> {
        self.mutate(|s| std::future::ready(Ok::<S, std::convert::Infallible>(f(&s))))
            .await
    }

    /// Registers an observer invoked after every successful mutation.
    ///
    /// An observer registered while a notification pass is in flight is not
    /// invoked for that pass. The returned [`Subscription`] removes exactly
    /// this observer.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let key = self.0.observers.borrow_mut().insert(Rc::new(callback));
        let weak = Rc::downgrade(&self.0);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.observers.borrow_mut().remove(key);
            }
        })
    }

    /// Number of currently-registered observers.
    ///
    /// Equals the number of live mounted bindings: 0 before any mount and
    /// after all unmounts. The observer set itself is never exposed.
    pub fn observer_count(&self) -> usize {
        self.0.observers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot before delivery: cancelling during the pass cannot affect
        // callbacks already scheduled, and subscribing during the pass does
        // not add to it.
        let snapshot: SmallVec<[Observer; 4]> =
            self.0.observers.borrow().values().cloned().collect();
        log::trace!(
            "store<{}>: notifying {} observers",
            std::any::type_name::<S>(),
            snapshot.len()
        );
        for callback in snapshot {
            callback();
        }
    }
}

impl<S: 'static> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// Capability to remove one observer, usable at most once.
///
/// Safe to call repeatedly (later calls are no-ops) and safe to call while a
/// notification pass is delivering: the pass finishes with its snapshot, and
/// future passes skip the removed observer.
#[derive(Clone)]
pub struct Subscription(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Subscription {
    fn new(remove: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(remove)))))
    }

    /// Removes the observer. Runs at most once.
    pub fn cancel(&self) {
        if let Some(remove) = self.0.borrow_mut().take() {
            remove()
        }
    }

    /// Whether [`cancel`](Subscription::cancel) has not run yet.
    pub fn is_active(&self) -> bool {
        self.0.borrow().is_some()
    }
}
