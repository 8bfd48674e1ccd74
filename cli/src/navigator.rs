//! [`Navigator`] for a terminal: there is no view to switch, so routes the
//! store asks for are only recorded and reported back to the user.

use std::cell::RefCell;

use elixir_control::{Navigator, RouteName};

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pushed: RefCell<Vec<RouteName>>,
}

impl RecordingNavigator {
    /// Most recent route pushed, if any.
    pub fn last(&self) -> Option<RouteName> {
        self.pushed.borrow().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: RouteName) {
        tracing::debug!(route = %route, "navigate");
        self.pushed.borrow_mut().push(route);
    }
}
