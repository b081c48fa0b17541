//! Observable property cells.
//!
//! A `Property<T>` holds one value and an ordered list of change listeners.
//! Listeners fire synchronously on `set` when the new value differs from the
//! current one under `PartialEq`:
//!
//! - numbers compare exactly, so `-0.0` written over `0.0` does not notify,
//!   and `NaN` always notifies because `NaN != NaN`;
//! - ids, enums and `Option<Id>` compare by value.
//!
//! Listeners only ever see shared references, so they cannot write back into
//! the property while it is notifying.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Handle returned by `link`, used to `unlink` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Callback<T> = Box<dyn FnMut(&T, Option<&T>)>;

struct Listener<T> {
    id: ListenerId,
    callback: Callback<T>,
}

pub struct Property<T> {
    name: &'static str,
    value: T,
    initial: T,
    listeners: Vec<Listener<T>>,
    next_listener: u32,
}

impl<T: Clone + PartialEq> Property<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            initial: value.clone(),
            value,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The value this property was constructed with (what `reset` restores).
    pub fn initial(&self) -> &T {
        &self.initial
    }

    /// Store `value` and notify listeners with `(new, Some(old))` in
    /// registration order. Returns `false` (and notifies nobody) if the value
    /// is unchanged.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        let old = std::mem::replace(&mut self.value, value);
        let name = self.name;
        let current = &self.value;
        for listener in self.listeners.iter_mut() {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| (listener.callback)(current, Some(&old))));
            if outcome.is_err() {
                log::error!("{}: listener {:?} panicked during notification", name, listener.id);
            }
        }
        true
    }

    /// Register `callback` and immediately invoke it with `(current, None)`.
    pub fn link(&mut self, mut callback: impl FnMut(&T, Option<&T>) + 'static) -> ListenerId {
        callback(&self.value, None);
        self.lazy_link(callback)
    }

    /// Register `callback` without the initial invocation.
    pub fn lazy_link(&mut self, callback: impl FnMut(&T, Option<&T>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a listener. Unknown ids are a logged no-op.
    pub fn unlink(&mut self, id: ListenerId) -> bool {
        match self.listeners.iter().position(|l| l.id == id) {
            Some(idx) => {
                // Order of the remaining listeners must be preserved.
                self.listeners.remove(idx);
                true
            }
            None => {
                log::warn!("{}: unlink of unknown listener {:?}", self.name, id);
                false
            }
        }
    }

    pub fn unlink_all(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Restore the initial value, notifying if it differs from the current one.
    pub fn reset(&mut self) -> bool {
        let initial = self.initial.clone();
        self.set(initial)
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<(T, Option<T>)>>>, impl FnMut(&T, Option<&T>)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |new: &T, old: Option<&T>| {
            sink.borrow_mut().push((new.clone(), old.cloned()));
        })
    }

    #[test]
    fn link_fires_immediately_with_no_old_value() {
        let mut p = Property::new("velocity", 3.0_f64);
        let (log, cb) = recorder();
        p.link(cb);
        assert_eq!(*log.borrow(), vec![(3.0, None)]);
    }

    #[test]
    fn set_notifies_new_and_old() {
        let mut p = Property::new("appliedForce", 0.0_f64);
        let (log, cb) = recorder();
        p.lazy_link(cb);
        assert!(p.set(50.0));
        assert_eq!(*log.borrow(), vec![(50.0, Some(0.0))]);
        assert_eq!(p.get(), 50.0);
    }

    #[test]
    fn same_value_twice_does_not_refire() {
        let mut p = Property::new("position", 0.0_f64);
        let (log, cb) = recorder();
        p.lazy_link(cb);
        p.set(1.5);
        assert!(!p.set(1.5));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn negative_zero_is_equal_to_zero() {
        let mut p = Property::new("netForce", 0.0_f64);
        let (log, cb) = recorder();
        p.lazy_link(cb);
        assert!(!p.set(-0.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn nan_always_notifies() {
        let mut p = Property::new("velocity", f64::NAN);
        let (log, cb) = recorder();
        p.lazy_link(cb);
        assert!(p.set(f64::NAN));
        assert!(p.set(f64::NAN));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut p = Property::new("running", false);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let order = order.clone();
            p.lazy_link(move |_, _| order.borrow_mut().push(tag));
        }
        p.set(true);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn unlink_removes_only_that_listener() {
        let mut p = Property::new("knot", None::<u32>);
        let (first, cb1) = recorder();
        let (second, cb2) = recorder();
        let id = p.lazy_link(cb1);
        p.lazy_link(cb2);
        assert!(p.unlink(id));
        p.set(Some(4));
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
        assert_eq!(p.listener_count(), 1);
    }

    #[test]
    fn unlink_unknown_is_noop() {
        let mut p = Property::new("x", 1);
        let id = p.lazy_link(|_, _| {});
        assert!(p.unlink(id));
        assert!(!p.unlink(id));
        assert_eq!(p.listener_count(), 0);
    }

    #[test]
    fn panicking_listener_does_not_stop_the_chain() {
        let mut p = Property::new("cartPosition", 0.0_f64);
        p.lazy_link(|_, _| panic!("view blew up"));
        let (log, cb) = recorder();
        p.lazy_link(cb);
        p.set(2.0);
        assert_eq!(*log.borrow(), vec![(2.0, Some(0.0))]);
        assert_eq!(p.get(), 2.0);
    }

    #[test]
    fn reset_restores_initial_and_notifies() {
        let mut p = Property::new("friction", 0.0_f64);
        p.set(0.4);
        let (log, cb) = recorder();
        p.lazy_link(cb);
        assert!(p.reset());
        assert_eq!(p.get(), 0.0);
        assert_eq!(*log.borrow(), vec![(0.0, Some(0.4))]);
        assert!(!p.reset());
    }
}
