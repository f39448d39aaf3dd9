//! Observer lists for picker notifications.
//!
//! Handlers run synchronously in registration order. Cancelable lists hand
//! every handler the same mutable [`Cancelable`] record; the default action is
//! skipped when any handler cancels it.
use std::{ops::Deref, sync::Arc};

use crate::{calendar::DateValue, picker::SelectionState};

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;
type CancelableHandler<E> = Arc<dyn Fn(&mut Cancelable<E>) + Send + Sync>;

/// Ordered list of non-cancelable observers.
pub struct Hooks<E> {
    handlers: Vec<Handler<E>>,
}

impl<E> Hooks<E> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn register<F>(&mut self, handler: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    /// Invokes every handler with `event`.
    pub fn fire(&self, event: &E) {
        for handler in &self.handlers {
            handler(event);
        }
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Hooks<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A notification whose default action observers may cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancelable<E> {
    event: E,
    canceled: bool,
}

impl<E> Cancelable<E> {
    /// Wraps `event` in a not-yet-canceled record.
    pub fn new(event: E) -> Self {
        Self {
            event,
            canceled: false,
        }
    }

    /// Marks the default action as canceled.
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    /// Sets the canceled flag.
    pub fn set_canceled(&mut self, canceled: bool) {
        self.canceled = canceled;
    }

    /// Returns true when a handler canceled the default action.
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Returns the wrapped notification.
    pub fn into_inner(self) -> E {
        self.event
    }
}

impl<E> Deref for Cancelable<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.event
    }
}

/// Ordered list of observers that may cancel the default action.
pub struct CancelableHooks<E> {
    handlers: Vec<CancelableHandler<E>>,
}

impl<E> CancelableHooks<E> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn register<F>(&mut self, handler: F)
    where
        F: Fn(&mut Cancelable<E>) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    /// Runs every handler on a fresh record and returns it.
    pub fn fire(&self, event: E) -> Cancelable<E> {
        let mut record = Cancelable::new(event);
        for handler in &self.handlers {
            handler(&mut record);
        }
        record
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for CancelableHooks<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fired before a selection is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeforeConfirmed {
    /// The value that will be committed unless canceled.
    pub selection: SelectionState,
}

/// Fired after a selection was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    /// The committed value.
    pub selection: SelectionState,
}

/// Fired before the date stage hands over to the time stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeDateNext {
    /// The date stage's working date.
    pub date: DateValue,
}

/// Fired after the time stage was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNext {
    /// The date stage's working date.
    pub date: DateValue,
}
