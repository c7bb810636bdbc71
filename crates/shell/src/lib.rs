//! The editor shell: one session's document, suggestions and sandbox.
//!
//! [`EditorShell`] is the composition root. Edits dispatch synchronously
//! into the owned [`DocumentStore`]; content-changing edits additionally
//! feed the [`SuggestionCoordinator`], whose ghost-text overlay rides on
//! top of the editor without ever touching document history. Accepting a
//! suggestion is the one crossover point: the ghost text is spliced into
//! the document as an ordinary insert.
//!
//! Code execution and HTML preview go through the [`SandboxChannel`] to the
//! isolated peer.

#![warn(missing_docs)]


use quill_config::Settings;
use quill_document::{DocAction, DocumentState, DocumentStore};
use quill_sandbox::{ExecOutcome, SandboxChannel};
use quill_suggest::{SuggestSnapshot, Suggestion, SuggestionContext, SuggestionCoordinator};
use tokio::sync::watch;

/// One editing session, explicitly owned.
///
/// There is no ambient global shell; whoever creates it threads it through
/// the views that need it.
pub struct EditorShell {
	document: DocumentStore,
	suggest: SuggestionCoordinator,
	sandbox: SandboxChannel,
	settings: Settings,
}

impl EditorShell {
	/// Wires a shell from its already-constructed parts.
	pub fn new(
		document: DocumentStore,
		suggest: SuggestionCoordinator,
		sandbox: SandboxChannel,
		settings: Settings,
	) -> Self {
		Self {
			document,
			suggest,
			sandbox,
			settings,
		}
	}

	/// Applies a document action.
	///
	/// Content-changing edits also feed the suggestion pipeline when
	/// autocomplete is enabled; cursor and metadata changes do not.
	pub fn edit(&mut self, action: DocAction) {
		let content_edit = action.is_content_edit();
		self.document.dispatch(action);
		if content_edit {
			if self.settings.autocomplete {
				let context = self.suggestion_context();
				self.suggest.notify_edit(context);
			} else {
				self.suggest.clear();
			}
		}
	}

	/// Requests a completion at the cursor immediately, bypassing debounce.
	pub fn request_suggestion(&mut self) {
		let context = self.suggestion_context();
		self.suggest.trigger_now(context);
	}

	/// Splices the live ghost text into the document and clears the overlay.
	///
	/// Returns the accepted suggestion, or `None` when no suggestion was
	/// live. The insert goes through the document reducers, so it lands in
	/// history like any other edit.
	pub fn accept_suggestion(&mut self) -> Option<Suggestion> {
		let suggestion = self.suggest.accept()?;
		tracing::debug!(position = suggestion.position, "shell.suggestion.accepted");
		self.document.dispatch(DocAction::InsertText {
			at: suggestion.position,
			text: suggestion.text.clone(),
		});
		Some(suggestion)
	}

	/// Clears the overlay without touching the document.
	pub fn reject_suggestion(&mut self) -> Option<Suggestion> {
		self.suggest.reject()
	}

	/// Dismisses the overlay and any pending automatic request.
	pub fn dismiss_overlay(&mut self) {
		self.suggest.clear();
	}

	/// Runs the current document content in the sandbox.
	pub async fn run(&self) -> Option<ExecOutcome> {
		let code = self.document.state().content.clone();
		tracing::debug!(bytes = code.len(), "shell.run");
		self.sandbox.execute(code).await
	}

	/// Renders the current document content as an HTML preview.
	pub async fn render_preview(&self) -> Option<ExecOutcome> {
		let html = self.document.state().content.clone();
		self.sandbox.render_html(html).await
	}

	/// Steps document history back one entry.
	pub fn undo(&mut self) -> bool {
		self.document.undo()
	}

	/// Steps document history forward one entry.
	pub fn redo(&mut self) -> bool {
		self.document.redo()
	}

	/// Returns the current document state.
	pub fn document_state(&self) -> &DocumentState {
		self.document.state()
	}

	/// Returns the live ghost-text suggestion, if any.
	pub fn suggestion(&self) -> Option<Suggestion> {
		self.suggest.suggestion()
	}

	/// Subscribes to overlay snapshots for the UI layer.
	pub fn overlay(&self) -> watch::Receiver<SuggestSnapshot> {
		self.suggest.subscribe()
	}

	/// Borrows the owned document store.
	pub fn document(&mut self) -> &mut DocumentStore {
		&mut self.document
	}

	/// Borrows the owned suggestion coordinator.
	pub fn suggest(&mut self) -> &mut SuggestionCoordinator {
		&mut self.suggest
	}

	/// Borrows the owned sandbox channel.
	pub fn sandbox(&self) -> &SandboxChannel {
		&self.sandbox
	}

	/// Returns the current settings.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Replaces the settings.
	///
	/// Turning autocomplete off also clears the overlay and any pending
	/// automatic request.
	pub fn set_settings(&mut self, settings: Settings) {
		let autocomplete_off = self.settings.autocomplete && !settings.autocomplete;
		self.settings = settings;
		if autocomplete_off {
			self.suggest.clear();
		}
	}

	/// Captures the completion context at the cursor.
	fn suggestion_context(&self) -> SuggestionContext {
		let state = self.document.state();
		let split = state
			.content
			.char_indices()
			.nth(state.cursor)
			.map(|(index, _)| index)
			.unwrap_or(state.content.len());
		SuggestionContext {
			prefix: state.content[..split].to_string(),
			suffix: state.content[split..].to_string(),
			language: state.language.clone(),
			position: state.cursor,
		}
	}
}
