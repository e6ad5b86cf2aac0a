//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::core::content::WorkflowId;
use crate::core::training::TrainingRequest;
use crate::ui::layout::AppLayout;

use super::deck::DeckState;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Home,
    Deck,
    SettingsMenu,
    ControlsSubmenu,
}

/// Where keyboard input goes inside the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Deck,
    /// The interactive panel of the active section.
    Panel,
}

/// Top-level application state.
pub struct AppState {
    /// Workflow deck being browsed (`Home` while on the home screen).
    pub deck: DeckState,
    pub focus: Focus,
    /// Highlighted entry on the home screen.
    pub home_selected: usize,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// View to go back to when the settings popup closes.
    pub underlying_view: ActiveView,
    /// User-configurable keybindings and scroll settings.
    pub config: AppConfig,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
    /// Column of the previous drag event while the left button is held.
    pub drag_column: Option<u16>,
    /// Set by the handler; the main loop starts the feed after drawing.
    pub pending_training: Option<(u64, TrainingRequest)>,
    /// Replay task of the running training session.
    feed_task: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            deck: DeckState::new(WorkflowId::Home, config.scroll_config()),
            focus: Focus::default(),
            home_selected: 0,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            underlying_view: ActiveView::default(),
            config,
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            terminal_area: Rect::default(),
            drag_column: None,
            pending_training: None,
            feed_task: None,
        }
    }

    /// Open `workflow` in the deck view.
    pub fn open_workflow(&mut self, workflow: WorkflowId) {
        self.stop_feed();
        self.deck.open(workflow);
        self.focus = Focus::Deck;
        self.drag_column = None;
        self.status_message = None;
        self.pending_training = None;
        self.active_view = ActiveView::Deck;
    }

    /// Back to the home screen.
    pub fn go_home(&mut self) {
        if let Some(i) = WorkflowId::SELECTABLE
            .iter()
            .position(|&w| w == self.deck.workflow)
        {
            self.home_selected = i;
        }
        self.stop_feed();
        self.deck.close();
        self.focus = Focus::Deck;
        self.drag_column = None;
        self.status_message = None;
        self.pending_training = None;
        self.active_view = ActiveView::Home;
    }

    /// Track the replay task of a new session; a previous one is aborted.
    pub fn attach_feed(&mut self, task: JoinHandle<()>) {
        if let Some(old) = self.feed_task.replace(task) {
            old.abort();
        }
    }

    /// Abort the running replay, if any.
    pub fn stop_feed(&mut self) {
        if let Some(task) = self.feed_task.take() {
            tracing::debug!("stopping training feed");
            task.abort();
        }
    }

    pub fn open_settings(&mut self) {
        if matches!(self.active_view, ActiveView::Home | ActiveView::Deck) {
            self.underlying_view = self.active_view;
        }
        self.active_view = ActiveView::SettingsMenu;
        self.settings_selected = 0;
    }

    pub fn close_settings(&mut self) {
        self.active_view = self.underlying_view;
        self.awaiting_rebind = false;
    }

    /// Record the terminal size and lay the deck out against it.
    pub fn set_terminal_area(&mut self, area: Rect) {
        self.terminal_area = area;
        let layout = AppLayout::from_area(area);
        self.deck.layout(layout.deck_area.width);
    }

    /// Push changed scroll settings to the live controller.
    pub fn apply_scroll_config(&mut self) {
        self.deck.controller.set_config(self.config.scroll_config());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// A task that never finishes on its own; the receiver closes once the
    /// task is dropped.
    fn parked_task() -> (JoinHandle<()>, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let _tx = tx;
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        (task, rx)
    }

    #[tokio::test]
    async fn test_going_home_aborts_the_feed() {
        let mut state = AppState::new(AppConfig::default());
        state.open_workflow(WorkflowId::DigitalTwin);
        let (task, mut alive) = parked_task();
        state.attach_feed(task);

        state.go_home();
        assert!(state.feed_task.is_none());
        assert!(alive.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_new_session_replaces_the_old_feed() {
        let mut state = AppState::new(AppConfig::default());
        let (first, mut first_alive) = parked_task();
        state.attach_feed(first);
        let (second, _second_alive) = parked_task();
        state.attach_feed(second);
        assert!(first_alive.recv().await.is_none());
        assert!(state.feed_task.is_some());
        state.stop_feed();
    }
}
