//! The route resolver: registry + history + host, driven one navigation
//! at a time.

use crate::error::{NavigationError, RouterError};
use crate::history::{History, HistoryEntry, HistoryError, MemoryHistory};
use crate::host::{MountStatus, RouteChange, RouteHost, RouteMiss};
use crate::location::Location;
use crate::navigation::{
	AckOutcome, NavigationId, NavigationMode, NavigationOutcome, NavigationQueue, NavigationRequest,
	NavigationState,
};
use crate::registry::RouteRegistry;
use crate::route::{Resolution, RouteDefinition, ViewRef};

/// Resolves navigations and keeps the navigation state.
///
/// The resolver owns its [`NavigationState`]; everything else reads it
/// through [`state`](Self::state) or the host notifications. History
/// movement it did not initiate (back, forward, `popstate`) arrives as
/// [`NavigationMode::Pop`] requests on its [`NavigationQueue`] and is
/// processed by [`run_pending`](Self::run_pending).
///
/// # Example
///
/// ```ignore
/// let mut resolver = RouteResolver::register(
///     [
///         RouteDefinition::new("/", "Home", "HomeView"),
///         RouteDefinition::new("/country/:name", "CountryDetail", "CountryDetailView"),
///     ],
///     MemoryHistory::new("/"),
///     RecordingHost::new(),
/// )?;
///
/// resolver.start();
/// resolver.push("/country/Japan")?;
/// assert_eq!(resolver.state().active_route_name(), Some("CountryDetail"));
/// ```
pub struct RouteResolver<H: History = MemoryHistory> {
	registry: RouteRegistry,
	history: H,
	host: Box<dyn RouteHost>,
	state: NavigationState,
	queue: NavigationQueue,
	fallback: Option<ViewRef>,
	next_id: NavigationId,
}

impl<H: History> std::fmt::Debug for RouteResolver<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteResolver")
			.field("routes_count", &self.registry.len())
			.field("state", &self.state)
			.field("pending", &self.queue.len())
			.field("fallback", &self.fallback)
			.finish()
	}
}

impl<H: History> RouteResolver<H> {
	/// Wires a registry to a history backend and a host.
	///
	/// Subscribes to the history so that back/forward movement is queued
	/// as pop navigations.
	///
	/// # Errors
	///
	/// Returns a [`HistoryError`] if the history refuses the subscription.
	pub fn new(
		registry: RouteRegistry,
		mut history: H,
		host: impl RouteHost + 'static,
	) -> Result<Self, HistoryError> {
		let queue = NavigationQueue::new();
		let events = queue.clone();
		history.on_history_change(Box::new(move |entry: &HistoryEntry| {
			events.push(NavigationRequest::new(
				entry.location.to_url(),
				NavigationMode::Pop,
			));
		}))?;

		Ok(Self {
			registry,
			history,
			host: Box::new(host),
			state: NavigationState::default(),
			queue,
			fallback: None,
			next_id: NavigationId::first(),
		})
	}

	/// Builds the registry from `routes` and wires it up.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Configuration`] for an invalid route table
	/// and [`RouterError::History`] if the history cannot be subscribed to.
	pub fn register<I>(
		routes: I,
		history: H,
		host: impl RouteHost + 'static,
	) -> Result<Self, RouterError>
	where
		I: IntoIterator<Item = RouteDefinition>,
	{
		let registry = RouteRegistry::register(routes)?;
		Ok(Self::new(registry, history, host)?)
	}

	/// Sets the view reported with every not-found notification.
	pub fn with_fallback(mut self, view: impl Into<ViewRef>) -> Self {
		self.fallback = Some(view.into());
		self
	}

	/// Returns the route table.
	pub fn registry(&self) -> &RouteRegistry {
		&self.registry
	}

	/// Returns the navigation state.
	pub fn state(&self) -> &NavigationState {
		&self.state
	}

	/// Returns the history backend.
	pub fn history(&self) -> &H {
		&self.history
	}

	/// Returns the history backend mutably.
	///
	/// Movement made through it is queued; call
	/// [`run_pending`](Self::run_pending) to process it.
	pub fn history_mut(&mut self) -> &mut H {
		&mut self.history
	}

	/// Returns a handle to the navigation queue for event sources such as
	/// link click handlers.
	pub fn queue(&self) -> NavigationQueue {
		self.queue.clone()
	}

	/// Returns the fallback view, if any.
	pub fn fallback(&self) -> Option<&ViewRef> {
		self.fallback.as_ref()
	}

	/// Resolves a target without navigating.
	pub fn resolve(&self, target: &str) -> Resolution {
		self.registry.resolve(target)
	}

	/// Performs the initial-load navigation from the history's current
	/// location. Nothing is written to the history.
	pub fn start(&mut self) -> NavigationOutcome {
		let location = self.history.location();
		tracing::debug!(path = %location.path(), "starting at current location");
		let resolution = self.registry.resolve_location(location);
		self.dispatch(resolution, NavigationMode::Initial)
	}

	/// Navigates to `target`.
	///
	/// Resolves the target, writes the history according to `mode`, updates
	/// the state and notifies the host. An unmatched target is not an error:
	/// the history still records it and the host receives a not-found
	/// notification.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::History`] if the history write fails; the
	/// state is left unchanged and the host is not notified.
	pub fn navigate(
		&mut self,
		target: &str,
		mode: NavigationMode,
	) -> Result<NavigationOutcome, NavigationError> {
		let resolution = self.registry.resolve(target);

		if mode.writes_history() {
			let entry = history_entry(&resolution);
			match mode {
				NavigationMode::Push => self.history.push_entry(&entry)?,
				_ => self.history.replace_entry(&entry)?,
			}
		}

		Ok(self.dispatch(resolution, mode))
	}

	/// Navigates to `target`, appending a history entry.
	pub fn push(&mut self, target: &str) -> Result<NavigationOutcome, NavigationError> {
		self.navigate(target, NavigationMode::Push)
	}

	/// Navigates to `target`, replacing the current history entry.
	pub fn replace(&mut self, target: &str) -> Result<NavigationOutcome, NavigationError> {
		self.navigate(target, NavigationMode::Replace)
	}

	/// Navigates to a named route.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::UnknownRoute`] or
	/// [`NavigationError::MissingParameter`] if the path cannot be built,
	/// and history errors as [`navigate`](Self::navigate) does.
	pub fn navigate_named(
		&mut self,
		name: &str,
		params: &[(&str, &str)],
		mode: NavigationMode,
	) -> Result<NavigationOutcome, NavigationError> {
		let path = self.registry.reverse(name, params)?;
		self.navigate(&path, mode)
	}

	/// Moves one history entry back and processes the resulting navigation.
	///
	/// Returns `None` when the backend moves asynchronously (the browser);
	/// the navigation is then queued once `popstate` fires.
	pub fn back(&mut self) -> Result<Option<NavigationOutcome>, NavigationError> {
		self.go(-1)
	}

	/// Moves one history entry forward and processes the resulting
	/// navigation.
	pub fn forward(&mut self) -> Result<Option<NavigationOutcome>, NavigationError> {
		self.go(1)
	}

	/// Moves `delta` history entries and processes the resulting
	/// navigation.
	///
	/// Requests queued before the move are processed first, so the pop is
	/// applied on top of them. Returns the outcome of the pop itself.
	pub fn go(&mut self, delta: isize) -> Result<Option<NavigationOutcome>, NavigationError> {
		self.drain()?;
		self.history.go(delta)?;

		let mut popped = None;
		for (mode, outcome) in self.drain()? {
			if mode == NavigationMode::Pop && popped.is_none() {
				popped = Some(outcome);
			}
		}
		Ok(popped)
	}

	/// Processes queued navigations in arrival order, each to completion.
	///
	/// # Errors
	///
	/// Stops at the first failing request; it and every later request stay
	/// queued.
	pub fn run_pending(&mut self) -> Result<Vec<NavigationOutcome>, NavigationError> {
		Ok(self.drain()?.into_iter().map(|(_, outcome)| outcome).collect())
	}

	fn drain(&mut self) -> Result<Vec<(NavigationMode, NavigationOutcome)>, NavigationError> {
		let mut outcomes = Vec::new();
		while let Some(request) = self.queue.peek() {
			let outcome = self.navigate(&request.target, request.mode)?;
			self.queue.pop();
			outcomes.push((request.mode, outcome));
		}
		Ok(outcomes)
	}

	/// Reports that the host finished mounting the view for `id`.
	///
	/// Acknowledging a navigation that a later one superseded is reported
	/// as [`AckOutcome::Stale`] and has no effect.
	pub fn acknowledge(&mut self, id: NavigationId) -> AckOutcome {
		if self.state.finish(id) {
			tracing::debug!(navigation = %id, "mount acknowledged");
			return AckOutcome::Mounted;
		}

		match self.state.last_navigation() {
			Some(last) if id < last => {
				tracing::warn!(navigation = %id, current = %last, "discarding stale mount acknowledgement");
				AckOutcome::Stale
			}
			_ => {
				tracing::debug!(navigation = %id, "acknowledgement for unknown navigation");
				AckOutcome::Unknown
			}
		}
	}

	fn dispatch(&mut self, resolution: Resolution, mode: NavigationMode) -> NavigationOutcome {
		let id = self.next_id;
		self.next_id = id.next();

		if let Some(superseded) = self.state.begin(id) {
			tracing::debug!(navigation = %id, superseded = %superseded, "navigation superseded a pending mount");
		}

		match resolution {
			Resolution::Matched(matched) => {
				tracing::debug!(
					navigation = %id,
					?mode,
					route = %matched.name(),
					path = %matched.location.path(),
					"route changed"
				);
				self.state.record_match(matched.clone());

				let change = RouteChange { id, mode, matched };
				let mount = self.host.route_changed(&change);
				if mount == MountStatus::Mounted {
					self.state.finish(id);
				}
				NavigationOutcome::Matched { id, mount }
			}
			Resolution::NotFound(location) => {
				tracing::debug!(navigation = %id, ?mode, path = %location.path(), "route not found");
				self.state.record_miss(location.clone());

				let miss = RouteMiss {
					id,
					mode,
					location,
					fallback: self.fallback.clone(),
				};
				self.host.route_not_found(&miss);
				self.state.finish(id);
				NavigationOutcome::NotFound { id }
			}
		}
	}
}

fn history_entry(resolution: &Resolution) -> HistoryEntry {
	let entry = HistoryEntry::new(resolution.location().clone());
	match resolution.matched() {
		Some(matched) => entry
			.with_route_name(matched.name())
			.with_params(matched.params.clone()),
		None => entry,
	}
}

impl RouteResolver<MemoryHistory> {
	/// Creates a resolver on an in-memory history starting at `initial`.
	pub fn in_memory(
		registry: RouteRegistry,
		initial: &str,
		host: impl RouteHost + 'static,
	) -> Result<Self, HistoryError> {
		Self::new(registry, MemoryHistory::new(initial), host)
	}

	/// Returns the location of the current history entry.
	pub fn current_location(&self) -> Location {
		self.history.location()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::{HostEvent, RecordingHost};
	use crate::navigation::{NavigationStatus, ResolverPhase};
	use rstest::{fixture, rstest};
	use std::cell::Cell;
	use std::rc::Rc;

	/// In-memory history whose writes fail while `reject` is set.
	struct FlakyHistory {
		inner: MemoryHistory,
		reject: Rc<Cell<bool>>,
	}

	impl History for FlakyHistory {
		fn location(&self) -> Location {
			self.inner.location()
		}

		fn push_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
			if self.reject.get() {
				return Err(HistoryError::Operation("quota exceeded".to_string()));
			}
			self.inner.push_entry(entry)
		}

		fn replace_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
			self.inner.replace_entry(entry)
		}

		fn on_history_change(
			&mut self,
			listener: crate::history::HistoryListener,
		) -> Result<(), HistoryError> {
			self.inner.on_history_change(listener)
		}

		fn go(&mut self, delta: isize) -> Result<(), HistoryError> {
			self.inner.go(delta)
		}
	}

	fn routes() -> Vec<RouteDefinition> {
		vec![
			RouteDefinition::new("/", "Home", "HomeView"),
			RouteDefinition::new("/country/:name", "CountryDetail", "CountryDetailView"),
		]
	}

	#[fixture]
	fn host() -> RecordingHost {
		RecordingHost::new()
	}

	fn resolver(host: &RecordingHost) -> RouteResolver {
		RouteResolver::register(routes(), MemoryHistory::new("/"), host.clone()).unwrap()
	}

	#[rstest]
	fn test_start_does_not_write_history(host: RecordingHost) {
		let mut resolver = resolver(&host);

		let outcome = resolver.start();

		assert!(outcome.is_matched());
		assert_eq!(resolver.history().len(), 1);
		assert_eq!(resolver.state().active_route_name(), Some("Home"));
		match host.last() {
			Some(HostEvent::Changed(change)) => assert_eq!(change.mode, NavigationMode::Initial),
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[rstest]
	fn test_push_updates_state_and_history(host: RecordingHost) {
		let mut resolver = resolver(&host);

		resolver.push("/country/Japan").unwrap();

		let state = resolver.state();
		assert_eq!(state.status(), NavigationStatus::Matched);
		assert_eq!(state.active_route_name(), Some("CountryDetail"));
		assert_eq!(
			state.params().and_then(|p| p.get("name")).map(String::as_str),
			Some("Japan")
		);
		assert!(state.is_idle());

		let current = resolver.history().current();
		assert_eq!(current.route_name.as_deref(), Some("CountryDetail"));
		assert_eq!(resolver.history().len(), 2);
	}

	#[rstest]
	fn test_replace_keeps_history_length(host: RecordingHost) {
		let mut resolver = resolver(&host);
		resolver.push("/country/Japan").unwrap();

		resolver.replace("/country/Peru").unwrap();

		assert_eq!(resolver.history().len(), 2);
		assert_eq!(resolver.current_location().path(), "/country/Peru");
	}

	#[rstest]
	fn test_not_found_keeps_active_match(host: RecordingHost) {
		let mut resolver = resolver(&host).with_fallback("NotFoundView");
		resolver.push("/country/Japan").unwrap();

		let outcome = resolver.push("/unknown").unwrap();

		assert!(!outcome.is_matched());
		assert_eq!(resolver.state().status(), NavigationStatus::NotFound);
		assert_eq!(resolver.state().active_route_name(), Some("CountryDetail"));
		assert_eq!(
			resolver.state().location().map(Location::path),
			Some("/unknown")
		);
		match host.last() {
			Some(HostEvent::NotFound(miss)) => {
				assert_eq!(miss.location.path(), "/unknown");
				assert_eq!(miss.fallback, Some(ViewRef::new("NotFoundView")));
			}
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[rstest]
	fn test_back_and_forward_resolve_again(host: RecordingHost) {
		let mut resolver = resolver(&host);
		resolver.start();
		resolver.push("/country/Japan").unwrap();

		let back = resolver.back().unwrap();
		assert!(back.is_some_and(|o| o.is_matched()));
		assert_eq!(resolver.state().active_route_name(), Some("Home"));

		resolver.forward().unwrap();
		assert_eq!(resolver.state().active_route_name(), Some("CountryDetail"));
		assert_eq!(resolver.history().len(), 2);

		match host.last() {
			Some(HostEvent::Changed(change)) => assert_eq!(change.mode, NavigationMode::Pop),
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[rstest]
	fn test_back_at_start_is_history_error(host: RecordingHost) {
		let mut resolver = resolver(&host);
		assert!(matches!(
			resolver.back(),
			Err(NavigationError::History(HistoryError::OutOfRange { .. }))
		));
	}

	#[rstest]
	fn test_stale_acknowledgement_is_discarded() {
		let host = RecordingHost::deferred();
		let mut resolver = resolver(&host);

		let first = resolver.push("/country/Japan").unwrap().id();
		assert_eq!(resolver.state().phase(), ResolverPhase::Resolving(first));

		let second = resolver.push("/country/Peru").unwrap().id();
		assert!(second > first);

		assert_eq!(resolver.acknowledge(first), AckOutcome::Stale);
		assert_eq!(resolver.state().phase(), ResolverPhase::Resolving(second));
		assert_eq!(resolver.acknowledge(second), AckOutcome::Mounted);
		assert!(resolver.state().is_idle());
		assert_eq!(resolver.acknowledge(second), AckOutcome::Unknown);
	}

	#[rstest]
	fn test_navigate_named(host: RecordingHost) {
		let mut resolver = resolver(&host);

		resolver
			.navigate_named("CountryDetail", &[("name", "Chile")], NavigationMode::Push)
			.unwrap();
		assert_eq!(resolver.current_location().path(), "/country/Chile");

		assert_eq!(
			resolver
				.navigate_named("About", &[], NavigationMode::Push)
				.unwrap_err(),
			NavigationError::UnknownRoute("About".to_string())
		);
	}

	#[rstest]
	fn test_queued_link_clicks_run_in_order(host: RecordingHost) {
		let mut resolver = resolver(&host);
		let links = resolver.queue();
		links.push_link("/country/Japan");
		links.push_link("/country/Peru");

		let outcomes = resolver.run_pending().unwrap();

		assert_eq!(outcomes.len(), 2);
		assert!(outcomes[0].id() < outcomes[1].id());
		assert_eq!(
			resolver.state().params().and_then(|p| p.get("name")).map(String::as_str),
			Some("Peru")
		);
		assert!(resolver.queue().is_empty());
	}

	#[rstest]
	fn test_invalid_table_fails_registration(host: RecordingHost) {
		let result = RouteResolver::register(
			[RouteDefinition::new("/", "Home", "A"), RouteDefinition::new("/x", "Home", "B")],
			MemoryHistory::new("/"),
			host,
		);
		assert!(matches!(result, Err(RouterError::Configuration(_))));
	}

	#[rstest]
	fn test_failed_request_stays_queued(host: RecordingHost) {
		// Arrange
		let reject = Rc::new(Cell::new(true));
		let history = FlakyHistory {
			inner: MemoryHistory::new("/"),
			reject: Rc::clone(&reject),
		};
		let mut resolver = RouteResolver::register(routes(), history, host.clone()).unwrap();
		let links = resolver.queue();
		links.push_link("/country/Japan");
		links.push_link("/country/Peru");

		// Act
		let failed = resolver.run_pending();

		// Assert
		assert!(matches!(
			failed,
			Err(NavigationError::History(HistoryError::Operation(_)))
		));
		assert_eq!(links.len(), 2);
		assert_eq!(
			links.peek().map(|r| r.target),
			Some("/country/Japan".to_string())
		);
		assert!(host.events().is_empty());

		reject.set(false);
		let outcomes = resolver.run_pending().unwrap();
		assert_eq!(outcomes.len(), 2);
		assert!(links.is_empty());
		assert_eq!(resolver.history().inner.len(), 3);
		assert_eq!(
			resolver.state().params().and_then(|p| p.get("name")).map(String::as_str),
			Some("Peru")
		);
	}
}
