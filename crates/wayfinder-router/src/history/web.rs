//! Browser history backend (`wasm32` only).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use super::{BasePath, History, HistoryEntry, HistoryError, HistoryListener};
use crate::location::Location;

type PopStateClosure = Closure<dyn FnMut(web_sys::PopStateEvent)>;

/// History backed by `window.history` and the `popstate` event.
///
/// Entries are stored as JSON in `history.state` so that back/forward
/// navigation can restore the matched route without re-reading the URL.
/// The `popstate` listener only forwards entries to the registered
/// listeners; the application drains the resolver's queue afterwards.
pub struct WebHistory {
	base: BasePath,
	window: web_sys::Window,
	history: web_sys::History,
	listeners: Rc<RefCell<Vec<HistoryListener>>>,
	popstate: Option<PopStateClosure>,
}

impl WebHistory {
	/// Binds to the global window, serving the application under `base`.
	pub fn new(base: &str) -> Result<Self, HistoryError> {
		let window = web_sys::window()
			.ok_or_else(|| HistoryError::Unavailable("no global window".to_string()))?;
		let history = window.history().map_err(js_error)?;

		Ok(Self {
			base: BasePath::new(base),
			window,
			history,
			listeners: Rc::new(RefCell::new(Vec::new())),
			popstate: None,
		})
	}

	fn install_popstate(&mut self) -> Result<(), HistoryError> {
		let listeners = Rc::clone(&self.listeners);
		let window = self.window.clone();
		let base = self.base.clone();

		let closure = PopStateClosure::new(move |event: web_sys::PopStateEvent| {
			let entry = event
				.state()
				.as_string()
				.and_then(|json| serde_json::from_str::<HistoryEntry>(&json).ok())
				.unwrap_or_else(|| HistoryEntry::new(read_location(&window, &base)));

			for listener in listeners.borrow_mut().iter_mut() {
				listener(&entry);
			}
		});

		self.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.map_err(js_error)?;
		self.popstate = Some(closure);
		Ok(())
	}

	fn state_of(entry: &HistoryEntry) -> Result<JsValue, HistoryError> {
		serde_json::to_string(entry)
			.map(|json| JsValue::from_str(&json))
			.map_err(|e| HistoryError::Operation(e.to_string()))
	}
}

impl History for WebHistory {
	fn location(&self) -> Location {
		read_location(&self.window, &self.base)
	}

	fn push_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
		let state = Self::state_of(entry)?;
		let url = self.base.join(&entry.location.to_url());
		self.history
			.push_state_with_url(&state, "", Some(&url))
			.map_err(js_error)
	}

	fn replace_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError> {
		let state = Self::state_of(entry)?;
		let url = self.base.join(&entry.location.to_url());
		self.history
			.replace_state_with_url(&state, "", Some(&url))
			.map_err(js_error)
	}

	fn on_history_change(&mut self, listener: HistoryListener) -> Result<(), HistoryError> {
		self.listeners.borrow_mut().push(listener);
		if self.popstate.is_none() {
			self.install_popstate()?;
		}
		Ok(())
	}

	fn go(&mut self, delta: isize) -> Result<(), HistoryError> {
		let delta = i32::try_from(delta).map_err(|_| HistoryError::OutOfRange {
			delta,
			index: 0,
			len: 0,
		})?;
		self.history.go_with_delta(delta).map_err(js_error)
	}
}

impl Drop for WebHistory {
	fn drop(&mut self) {
		if let Some(closure) = self.popstate.take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
		}
	}
}

fn read_location(window: &web_sys::Window, base: &BasePath) -> Location {
	let location = window.location();
	let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
	let search = location.search().unwrap_or_default();
	let hash = location.hash().unwrap_or_default();
	let url = format!("{}{}{}", pathname, search, hash);
	Location::parse(base.strip(&url))
}

fn js_error(value: JsValue) -> HistoryError {
	HistoryError::Operation(
		value
			.as_string()
			.unwrap_or_else(|| format!("{:?}", value)),
	)
}
