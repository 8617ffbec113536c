//! Mock application proxy.

use super::timeline::Timeline;
use crate::host::{Application, ApplicationState};
use crate::poll::Awaitable;
use std::cell::Cell;
use std::fmt;
use std::time::Duration;

const DEFAULT_BACKGROUND_DELAY: Duration = Duration::from_millis(20);

/// An application with a scripted lifecycle
#[derive(Debug)]
pub struct MockApplication {
    description: String,
    state: Timeline<ApplicationState>,
    background_state: Cell<ApplicationState>,
    background_delay: Cell<Duration>,
    honors_background_requests: Cell<bool>,
    background_requests: Cell<usize>,
}

impl MockApplication {
    /// A running foreground application
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            state: Timeline::new(ApplicationState::RunningForeground),
            background_state: Cell::new(ApplicationState::RunningBackground),
            background_delay: Cell::new(DEFAULT_BACKGROUND_DELAY),
            honors_background_requests: Cell::new(true),
            background_requests: Cell::new(0),
        }
    }

    /// Start in `state`
    #[must_use]
    pub fn with_state(self, state: ApplicationState) -> Self {
        self.state.set(state);
        self
    }

    /// State reached after a background request
    #[must_use]
    pub fn with_background_state(self, state: ApplicationState) -> Self {
        self.background_state.set(state);
        self
    }

    /// Delay between a background request and the state change
    #[must_use]
    pub fn with_background_delay(self, delay: Duration) -> Self {
        self.background_delay.set(delay);
        self
    }

    /// Stay in the current state when asked to go to the background
    #[must_use]
    pub fn ignoring_background_requests(self) -> Self {
        self.honors_background_requests.set(false);
        self
    }

    /// Change the state now
    pub fn set_state(&self, state: ApplicationState) {
        self.state.set(state);
    }

    /// Change the state after `after`
    pub fn schedule_state(&self, after: Duration, state: ApplicationState) {
        self.state.schedule(after, state);
    }

    /// How many times `send_to_background` was called
    #[must_use]
    pub fn background_requests(&self) -> usize {
        self.background_requests.get()
    }
}

impl fmt::Display for MockApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl Awaitable for MockApplication {}

impl Application for MockApplication {
    fn state(&self) -> ApplicationState {
        self.state.get()
    }

    fn send_to_background(&self) {
        self.background_requests.set(self.background_requests.get() + 1);
        if self.honors_background_requests.get() {
            self.state
                .schedule(self.background_delay.get(), self.background_state.get());
        }
    }
}
