//! Values that change on a schedule.

use std::cell::RefCell;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct TimelineState<T> {
    current: T,
    pending: Vec<(Instant, T)>,
}

/// A value plus changes scheduled for later instants
#[derive(Debug)]
pub struct Timeline<T: Clone> {
    state: RefCell<TimelineState<T>>,
}

impl<T: Clone> Timeline<T> {
    /// Timeline starting at `initial` with nothing scheduled
    pub fn new(initial: T) -> Self {
        Self {
            state: RefCell::new(TimelineState {
                current: initial,
                pending: Vec::new(),
            }),
        }
    }

    /// Value right now, applying every change that has come due
    pub fn get(&self) -> T {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let now = Instant::now();
        let due = state.pending.iter().take_while(|(at, _)| *at <= now).count();
        if let Some((_, value)) = state.pending.drain(..due).last() {
            state.current = value;
        }
        state.current.clone()
    }

    /// Replace the value and drop scheduled changes
    pub fn set(&self, value: T) {
        let mut state = self.state.borrow_mut();
        state.current = value;
        state.pending.clear();
    }

    /// Change the value `after` from now
    pub fn schedule(&self, after: Duration, value: T) {
        let at = Instant::now() + after;
        let mut state = self.state.borrow_mut();
        let index = state.pending.partition_point(|(pending_at, _)| *pending_at <= at);
        state.pending.insert(index, (at, value));
    }

    /// Number of changes not yet applied
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

impl<T: Clone + Default> Default for Timeline<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
