//! Notifications delivered to the view-rendering host.

use std::cell::RefCell;
use std::rc::Rc;

use crate::location::Location;
use crate::navigation::{NavigationId, NavigationMode};
use crate::route::{MatchResult, ViewRef};

/// Sent when a navigation matched a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
	/// Identifies the navigation; pass it to `acknowledge` once mounted.
	pub id: NavigationId,
	/// How the navigation was triggered.
	pub mode: NavigationMode,
	/// The matched route and its parameters.
	pub matched: MatchResult,
}

/// Sent when a navigation matched no route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMiss {
	/// Identifies the navigation.
	pub id: NavigationId,
	/// How the navigation was triggered.
	pub mode: NavigationMode,
	/// The location nothing matched.
	pub location: Location,
	/// The configured fallback view, if any.
	pub fallback: Option<ViewRef>,
}

/// Whether the host finished mounting when the notification returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountStatus {
	/// The view is mounted; the resolver returns to idle.
	#[default]
	Mounted,
	/// Mounting continues; the host calls `acknowledge` later.
	Pending,
}

/// The view-rendering side of the router.
pub trait RouteHost {
	/// Mounts the view for a matched route.
	fn route_changed(&mut self, change: &RouteChange) -> MountStatus;

	/// Renders the not-found state.
	fn route_not_found(&mut self, miss: &RouteMiss);
}

/// A notification recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	/// A route-changed notification.
	Changed(RouteChange),
	/// A route-not-found notification.
	NotFound(RouteMiss),
}

/// A host that records every notification it receives.
///
/// Clones share the same log, so a copy kept outside the resolver sees
/// what the resolver delivered. Useful for headless rendering and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
	events: Rc<RefCell<Vec<HostEvent>>>,
	mount: MountStatus,
}

impl RecordingHost {
	/// Creates a host that mounts synchronously.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a host that reports [`MountStatus::Pending`].
	pub fn deferred() -> Self {
		Self {
			events: Rc::default(),
			mount: MountStatus::Pending,
		}
	}

	/// Returns a snapshot of the recorded notifications.
	pub fn events(&self) -> Vec<HostEvent> {
		self.events.borrow().clone()
	}

	/// Returns the most recent notification.
	pub fn last(&self) -> Option<HostEvent> {
		self.events.borrow().last().cloned()
	}

	/// Forgets all recorded notifications.
	pub fn clear(&self) {
		self.events.borrow_mut().clear();
	}
}

impl RouteHost for RecordingHost {
	fn route_changed(&mut self, change: &RouteChange) -> MountStatus {
		self.events
			.borrow_mut()
			.push(HostEvent::Changed(change.clone()));
		self.mount
	}

	fn route_not_found(&mut self, miss: &RouteMiss) {
		self.events
			.borrow_mut()
			.push(HostEvent::NotFound(miss.clone()));
	}
}
