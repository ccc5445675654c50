//! Chat UI state machine.
//!
//! A pure transition function over the browser client's in-memory state:
//! `(state, event) → state`, independent of any rendering mechanism. The
//! transcript lives only in memory and is lost on reload; the one network
//! side effect (the completion POST) happens outside this module, which only
//! sees its outcome as [`UiEvent::CompletionArrived`] or
//! [`UiEvent::CompletionFailed`].

/// Whether a completion request is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Input is locked until the request settles.
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One rendered line of conversation, tagged with the chat title it belongs
/// to. The visible transcript is a filter over these by active title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub title: String,
    pub role: Role,
    pub content: String,
}

/// Everything that happens to the UI.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The user edited the input field.
    DraftChanged(String),
    /// The user submitted the form.
    Submitted,
    /// The completion POST succeeded.
    CompletionArrived { chat_id: i64, content: String },
    /// The completion POST failed; carries the error text to display.
    CompletionFailed(String),
    /// A historical title was clicked in the sidebar.
    ChatSelected(String),
    /// The new-chat button was clicked.
    NewChatRequested,
    SidebarToggled,
}

/// Complete in-memory UI state.
#[derive(Debug, Clone, Default)]
pub struct ChatUi {
    pub phase: Phase,
    /// Current input field contents.
    pub draft: String,
    /// Title of the conversation being viewed; `None` shows the empty-chat
    /// landing view.
    pub active_title: Option<String>,
    /// Server-side chat id of the active conversation, once known.
    pub active_chat_id: Option<i64>,
    /// Every exchange from this session, across all titles.
    pub history: Vec<TranscriptEntry>,
    /// Error text shown under the transcript; empty means no error.
    pub error_text: String,
    pub sidebar_open: bool,
}

impl ChatUi {
    /// Apply one event, consuming the old state.
    pub fn apply(mut self, event: UiEvent) -> Self {
        match event {
            UiEvent::DraftChanged(text) => {
                // Edits are ignored while a request is in flight.
                if self.phase == Phase::Idle {
                    self.draft = text;
                }
            }
            UiEvent::Submitted => {
                if self.phase == Phase::Idle && !self.draft.is_empty() {
                    self.phase = Phase::Submitting;
                    self.error_text.clear();
                }
            }
            UiEvent::CompletionArrived { chat_id, content } => {
                if self.phase == Phase::Submitting {
                    // The first exchange names the conversation after the
                    // submitted text.
                    let title = self
                        .active_title
                        .get_or_insert_with(|| self.draft.clone())
                        .clone();
                    self.history.push(TranscriptEntry {
                        title: title.clone(),
                        role: Role::User,
                        content: std::mem::take(&mut self.draft),
                    });
                    self.history.push(TranscriptEntry {
                        title,
                        role: Role::Assistant,
                        content,
                    });
                    self.active_chat_id = Some(chat_id);
                    self.error_text.clear();
                    self.phase = Phase::Idle;
                }
            }
            UiEvent::CompletionFailed(message) => {
                if self.phase == Phase::Submitting {
                    self.error_text = message;
                    self.phase = Phase::Idle;
                }
            }
            UiEvent::ChatSelected(title) => {
                // Switching the transcript filter is purely local; the server
                // id of a historical conversation is not tracked, so a
                // follow-up submission starts a fresh server-side chat.
                self.active_title = Some(title);
                self.active_chat_id = None;
                self.draft.clear();
            }
            UiEvent::NewChatRequested => {
                self.active_title = None;
                self.active_chat_id = None;
                self.draft.clear();
            }
            UiEvent::SidebarToggled => {
                self.sidebar_open = !self.sidebar_open;
            }
        }
        self
    }

    /// The input field is read-only while a request is in flight.
    pub fn input_locked(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// The entries visible for the active title, in arrival order.
    pub fn transcript(&self) -> Vec<&TranscriptEntry> {
        match &self.active_title {
            Some(title) => self
                .history
                .iter()
                .filter(|entry| entry.title == *title)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn show_error_hint(&self) -> bool {
        !self.error_text.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn exchange(ui: ChatUi, draft: &str, reply: &str, chat_id: i64) -> ChatUi {
        ui.apply(UiEvent::DraftChanged(draft.into()))
            .apply(UiEvent::Submitted)
            .apply(UiEvent::CompletionArrived {
                chat_id,
                content: reply.into(),
            })
    }

    #[test]
    fn empty_draft_does_not_submit() {
        let ui = ChatUi::default().apply(UiEvent::Submitted);
        assert_eq!(ui.phase, Phase::Idle);
        assert!(!ui.input_locked());
    }

    #[test]
    fn submission_locks_input_until_the_reply_lands() {
        let ui = ChatUi::default()
            .apply(UiEvent::DraftChanged("Hello".into()))
            .apply(UiEvent::Submitted);
        assert!(ui.input_locked());

        // Edits and resubmits while in flight change nothing.
        let ui = ui
            .apply(UiEvent::DraftChanged("changed".into()))
            .apply(UiEvent::Submitted);
        assert_eq!(ui.draft, "Hello");

        let ui = ui.apply(UiEvent::CompletionArrived {
            chat_id: 1,
            content: "Hi!".into(),
        });
        assert!(!ui.input_locked());
    }

    #[test]
    fn first_exchange_titles_the_conversation() {
        let ui = exchange(ChatUi::default(), "Hello", "Hi there!", 1);
        assert_eq!(ui.active_title.as_deref(), Some("Hello"));
        assert_eq!(ui.active_chat_id, Some(1));
        assert_eq!(ui.draft, "");

        let transcript = ui.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].content, "Hello");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].content, "Hi there!");
    }

    #[test]
    fn later_exchanges_keep_the_original_title() {
        let ui = exchange(ChatUi::default(), "Hello", "Hi there!", 1);
        let ui = exchange(ui, "Tell me more", "Sure.", 1);
        assert_eq!(ui.active_title.as_deref(), Some("Hello"));
        assert_eq!(ui.transcript().len(), 4);
    }

    #[test]
    fn failure_shows_error_text_and_unlocks() {
        let ui = ChatUi::default()
            .apply(UiEvent::DraftChanged("Hello".into()))
            .apply(UiEvent::Submitted)
            .apply(UiEvent::CompletionFailed(
                "Too many requests, please try again later.".into(),
            ));
        assert_eq!(ui.phase, Phase::Idle);
        assert!(ui.show_error_hint());
        assert!(ui.transcript().is_empty());

        // The next successful submit clears the error.
        let ui = exchange(ui, "Hello again", "Hi!", 2);
        assert!(!ui.show_error_hint());
    }

    #[test]
    fn selecting_history_switches_the_filter_without_network_state() {
        let ui = exchange(ChatUi::default(), "First topic", "reply a", 1);
        let ui = ui.apply(UiEvent::NewChatRequested);
        let ui = exchange(ui, "Second topic", "reply b", 2);

        let ui = ui.apply(UiEvent::ChatSelected("First topic".into()));
        assert_eq!(ui.active_title.as_deref(), Some("First topic"));
        assert_eq!(ui.active_chat_id, None);
        let transcript = ui.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript.iter().all(|e| e.title == "First topic"));
    }

    #[test]
    fn new_chat_resets_to_the_landing_view() {
        let ui = exchange(ChatUi::default(), "Hello", "Hi there!", 1);
        let ui = ui.apply(UiEvent::NewChatRequested);
        assert_eq!(ui.active_title, None);
        assert_eq!(ui.active_chat_id, None);
        assert!(ui.transcript().is_empty());
        // History itself survives for the sidebar.
        assert_eq!(ui.history.len(), 2);
    }

    #[test]
    fn sidebar_toggles() {
        let ui = ChatUi::default().apply(UiEvent::SidebarToggled);
        assert!(ui.sidebar_open);
        assert!(!ui.apply(UiEvent::SidebarToggled).sidebar_open);
    }
}
