//! Navigation bookkeeping: ids, modes, resolver state and the event queue.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::host::MountStatus;
use crate::location::Location;
use crate::route::MatchResult;

/// Monotonically increasing identifier of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationId(u64);

impl NavigationId {
	pub(crate) fn first() -> Self {
		Self(1)
	}

	pub(crate) fn next(self) -> Self {
		Self(self.0 + 1)
	}

	/// Returns the raw counter value.
	pub fn get(self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for NavigationId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// How a navigation was triggered and what it does to the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationMode {
	/// Initial load; the history is left untouched.
	Initial,
	/// Appends a history entry.
	Push,
	/// Overwrites the current history entry.
	Replace,
	/// The history already moved (back/forward); nothing is written.
	Pop,
}

impl NavigationMode {
	/// Returns whether this mode writes to the history.
	pub fn writes_history(self) -> bool {
		matches!(self, Self::Push | Self::Replace)
	}
}

/// Resolver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverPhase {
	/// No navigation awaits a mount.
	#[default]
	Idle,
	/// The given navigation has been dispatched and awaits its mount.
	Resolving(NavigationId),
}

/// Outcome of the most recent navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationStatus {
	/// No navigation has happened yet.
	#[default]
	Unstarted,
	/// The latest navigation matched a route.
	Matched,
	/// The latest navigation matched nothing.
	NotFound,
}

/// State owned by the resolver.
///
/// Read it through `RouteResolver::state`; only the resolver mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
	location: Option<Location>,
	active: Option<MatchResult>,
	status: NavigationStatus,
	last: Option<NavigationId>,
	phase: ResolverPhase,
}

impl NavigationState {
	/// Returns the location of the latest navigation.
	pub fn location(&self) -> Option<&Location> {
		self.location.as_ref()
	}

	/// Returns the last successful match.
	///
	/// A navigation that matched nothing leaves this unchanged.
	pub fn active(&self) -> Option<&MatchResult> {
		self.active.as_ref()
	}

	/// Returns the name of the last matched route.
	pub fn active_route_name(&self) -> Option<&str> {
		self.active.as_ref().map(MatchResult::name)
	}

	/// Returns the parameters of the last matched route.
	pub fn params(&self) -> Option<&HashMap<String, String>> {
		self.active.as_ref().map(|m| &m.params)
	}

	/// Returns the outcome of the latest navigation.
	pub fn status(&self) -> NavigationStatus {
		self.status
	}

	/// Returns the id of the latest navigation.
	pub fn last_navigation(&self) -> Option<NavigationId> {
		self.last
	}

	/// Returns the resolver phase.
	pub fn phase(&self) -> ResolverPhase {
		self.phase
	}

	/// Returns whether no navigation awaits a mount.
	pub fn is_idle(&self) -> bool {
		self.phase == ResolverPhase::Idle
	}

	pub(crate) fn begin(&mut self, id: NavigationId) -> Option<NavigationId> {
		let superseded = match self.phase {
			ResolverPhase::Resolving(previous) => Some(previous),
			ResolverPhase::Idle => None,
		};
		self.phase = ResolverPhase::Resolving(id);
		self.last = Some(id);
		superseded
	}

	pub(crate) fn record_match(&mut self, matched: MatchResult) {
		self.location = Some(matched.location.clone());
		self.active = Some(matched);
		self.status = NavigationStatus::Matched;
	}

	pub(crate) fn record_miss(&mut self, location: Location) {
		self.location = Some(location);
		self.status = NavigationStatus::NotFound;
	}

	/// Returns to idle if `id` is the navigation being resolved.
	pub(crate) fn finish(&mut self, id: NavigationId) -> bool {
		if self.phase == ResolverPhase::Resolving(id) {
			self.phase = ResolverPhase::Idle;
			true
		} else {
			false
		}
	}
}

/// Result of a navigation that reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// A route matched and the host was told to mount it.
	Matched {
		/// The navigation id.
		id: NavigationId,
		/// What the host reported.
		mount: MountStatus,
	},
	/// Nothing matched and the host was told so.
	NotFound {
		/// The navigation id.
		id: NavigationId,
	},
}

impl NavigationOutcome {
	/// Returns the navigation id.
	pub fn id(&self) -> NavigationId {
		match self {
			Self::Matched { id, .. } | Self::NotFound { id } => *id,
		}
	}

	/// Returns whether a route matched.
	pub fn is_matched(&self) -> bool {
		matches!(self, Self::Matched { .. })
	}
}

/// Result of acknowledging a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
	/// The acknowledged navigation was current; the resolver is idle.
	Mounted,
	/// A later navigation superseded this one; the acknowledgement is discarded.
	Stale,
	/// No such navigation was dispatched, or it was already settled.
	Unknown,
}

/// A navigation waiting to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
	/// Target URL relative to the application base.
	pub target: String,
	/// How to apply it.
	pub mode: NavigationMode,
}

impl NavigationRequest {
	/// Creates a request.
	pub fn new(target: impl Into<String>, mode: NavigationMode) -> Self {
		Self {
			target: target.into(),
			mode,
		}
	}
}

/// FIFO of navigation events.
///
/// Event sources (link clicks, history listeners) hold a clone and push;
/// the resolver drains it one request at a time.
#[derive(Debug, Clone, Default)]
pub struct NavigationQueue(Rc<RefCell<VecDeque<NavigationRequest>>>);

impl NavigationQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enqueues a request.
	pub fn push(&self, request: NavigationRequest) {
		self.0.borrow_mut().push_back(request);
	}

	/// Enqueues a link click (a push navigation).
	pub fn push_link(&self, target: impl Into<String>) {
		self.push(NavigationRequest::new(target, NavigationMode::Push));
	}

	/// Returns a copy of the oldest request without removing it.
	pub fn peek(&self) -> Option<NavigationRequest> {
		self.0.borrow().front().cloned()
	}

	/// Takes the oldest request.
	pub fn pop(&self) -> Option<NavigationRequest> {
		self.0.borrow_mut().pop_front()
	}

	/// Returns the number of queued requests.
	pub fn len(&self) -> usize {
		self.0.borrow().len()
	}

	/// Returns whether nothing is queued.
	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}
}
