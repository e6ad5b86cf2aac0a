//! Input handling — maps key/mouse events to state mutations.

use std::time::Instant;

use chrono::Local;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::core::content::{digital_twin, materials, WorkflowId};
use crate::core::molecules::AUTO_SELECT_COUNT;
use crate::ui::home::HomeGeometry;
use crate::ui::layout::{contains, AppLayout};
use crate::ui::nav::NavGeometry;

use super::settings::{persist, SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState, Focus};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Home => handle_home_key(state, key),
        ActiveView::Deck => handle_deck_key(state, key, now),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Home screen ─────────────────────────────────────────────────

fn handle_home_key(state: &mut AppState, key: KeyEvent) {
    let last = WorkflowId::SELECTABLE.len() - 1;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.home_selected = state.home_selected.saturating_sub(1);
            return;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.home_selected = (state.home_selected + 1).min(last);
            return;
        }
        _ => {}
    }

    match state.config.match_key(key) {
        Some(Action::Activate) => open_selected_workflow(state),
        Some(Action::OpenSettings) => state.open_settings(),
        Some(Action::Quit) => state.should_quit = true,
        _ => {}
    }
}

fn open_selected_workflow(state: &mut AppState) {
    if let Some(&workflow) = WorkflowId::SELECTABLE.get(state.home_selected) {
        state.open_workflow(workflow);
    }
}

// ── Deck (configurable bindings) ────────────────────────────────

/// What a key press does inside the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckCommand {
    Step(isize),
    First,
    Last,
    /// Move the grid cursor by (`dx`, `dy`) cells.
    Cursor(isize, isize),
    RunStep,
    ToggleSelect,
    ToggleFocus,
    /// Give keyboard focus back to the deck.
    Unfocus,
    Home,
    OpenSettings,
    Quit,
}

/// Route an action.  With global capture on, section navigation works
/// regardless of focus; with it off, the panel keeps Left/Right for itself.
pub fn route(action: Action, focus: Focus, capture_globally: bool) -> DeckCommand {
    let scoped = focus == Focus::Panel && !capture_globally;
    match action {
        Action::NextSection if scoped => DeckCommand::Cursor(1, 0),
        Action::PrevSection if scoped => DeckCommand::Cursor(-1, 0),
        Action::NextSection => DeckCommand::Step(1),
        Action::PrevSection => DeckCommand::Step(-1),
        Action::FirstSection => DeckCommand::First,
        Action::LastSection => DeckCommand::Last,
        Action::Activate => DeckCommand::RunStep,
        Action::ToggleSelect => DeckCommand::ToggleSelect,
        Action::FocusPanel => DeckCommand::ToggleFocus,
        Action::Back if focus == Focus::Panel => DeckCommand::Unfocus,
        Action::Back => DeckCommand::Home,
        Action::OpenSettings => DeckCommand::OpenSettings,
        Action::Quit => DeckCommand::Quit,
    }
}

fn handle_deck_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // The section may have changed under a focused panel.
    if state.focus == Focus::Panel && !state.deck.active_panel_focusable() {
        state.focus = Focus::Deck;
    }

    // Rows of the grid are only reachable while the panel has focus.
    if state.focus == Focus::Panel {
        let dy = match key.code {
            KeyCode::Up | KeyCode::Char('k') => -1,
            KeyCode::Down | KeyCode::Char('j') => 1,
            _ => 0,
        };
        if dy != 0 {
            move_cursor(state, 0, dy);
            return;
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let command = route(action, state.focus, state.config.capture_keys_globally);
    apply_command(state, command, now);
}

fn apply_command(state: &mut AppState, command: DeckCommand, now: Instant) {
    match command {
        DeckCommand::Step(delta) => state.deck.controller.step(delta, now),
        DeckCommand::First => state.deck.controller.scroll_to_section(0, now),
        DeckCommand::Last => {
            let controller = &mut state.deck.controller;
            let last = controller.section_count() - 1;
            controller.scroll_to_section(last, now);
        }
        DeckCommand::Cursor(dx, dy) => move_cursor(state, dx, dy),
        DeckCommand::RunStep => run_step(state, now),
        DeckCommand::ToggleSelect => toggle_select(state),
        DeckCommand::ToggleFocus => match state.focus {
            Focus::Panel => state.focus = Focus::Deck,
            Focus::Deck if state.deck.active_panel_focusable() => state.focus = Focus::Panel,
            Focus::Deck => state.status_message = Some("Nothing to focus in this section".into()),
        },
        DeckCommand::Unfocus => state.focus = Focus::Deck,
        DeckCommand::Home => state.go_home(),
        DeckCommand::OpenSettings => state.open_settings(),
        DeckCommand::Quit => state.should_quit = true,
    }
}

fn move_cursor(state: &mut AppState, dx: isize, dy: isize) {
    let index = state.deck.controller.active_index();
    if let Some(bench) = state.deck.panels.bench_mut() {
        bench.move_cursor(dx, dy);
    } else if let Some(lab) = state.deck.panels.twin_mut() {
        match index {
            digital_twin::DATASET => {
                lab.select_dataset(dx);
                lab.move_feature_cursor(dy);
            }
            digital_twin::MODELS => lab.move_model_cursor(dx + dy),
            digital_twin::IMPORTANCE => lab.inspect(dx + dy),
            _ => {}
        }
    }
}

fn toggle_select(state: &mut AppState) {
    let index = state.deck.controller.active_index();
    let result = if let Some(bench) = state.deck.panels.bench_mut() {
        bench.toggle_selected().map_err(|e| e.to_string())
    } else if let Some(lab) = state.deck.panels.twin_mut() {
        match index {
            digital_twin::DATASET => lab.toggle_feature().map_err(|e| e.to_string()),
            digital_twin::MODELS => {
                lab.toggle_model();
                Ok(())
            }
            _ => Ok(()),
        }
    } else {
        Ok(())
    };
    if let Err(message) = result {
        state.status_message = Some(message);
    }
}

/// Run the interactive step of the active section, or advance when the
/// section has none.
fn run_step(state: &mut AppState, now: Instant) {
    let index = state.deck.controller.active_index();
    match (state.deck.workflow, index) {
        (
            WorkflowId::Materials,
            materials::GENERATE | materials::PREDICT | materials::SELECT | materials::VALIDATE,
        ) => {
            // Mid-transition the bench may not be mounted yet.
            let Some(bench) = state.deck.panels.bench_mut() else {
                return;
            };
            let result = match index {
                materials::GENERATE => bench
                    .generate(now, &mut rand::rng())
                    .map(|()| "Generating candidates…".to_string()),
                materials::PREDICT => bench
                    .predict()
                    .map(|()| "Properties predicted".to_string()),
                materials::SELECT => bench
                    .auto_select(AUTO_SELECT_COUNT)
                    .map(|()| format!("Selected the {AUTO_SELECT_COUNT} most stable candidates")),
                _ => bench
                    .validate()
                    .map(|(passed, failed)| format!("{passed} passed, {failed} failed")),
            };
            state.status_message = Some(result.unwrap_or_else(|e| e.to_string()));
        }
        (WorkflowId::DigitalTwin, digital_twin::DATASET) => {
            let Some(lab) = state.deck.panels.twin_mut() else {
                return;
            };
            lab.next_dataset();
            let name = lab.dataset().name;
            state.status_message = Some(format!("Dataset: {name}"));
        }
        (WorkflowId::DigitalTwin, digital_twin::TRAIN) => {
            let Some(lab) = state.deck.panels.twin_mut() else {
                return;
            };
            match lab.start(Local::now()) {
                Ok((session, request)) => {
                    tracing::debug!("training session {session} requested");
                    state.status_message =
                        Some(format!("Training {} models", request.models.len()));
                    state.pending_training = Some((session, request));
                }
                Err(e) => state.status_message = Some(e.to_string()),
            }
        }
        (WorkflowId::DigitalTwin, digital_twin::IMPORTANCE) => {
            if let Some(lab) = state.deck.panels.twin_mut() {
                lab.inspect(1);
            }
        }
        _ => state.deck.controller.step(1, now),
    }
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.close_settings();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.close_settings();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                // Start rebinding the selected action.
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" item.
                state.config.reset_defaults();
                persist(state);
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            // Clear all bindings for the selected action.
            if state.controls_selected < Action::ALL.len() {
                let action = Action::ALL[state.controls_selected];
                state.config.bindings.insert(action, Vec::new());
                persist(state);
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Esc cancels rebinding.
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    // Don't allow rebinding Ctrl+C (reserved for emergency quit).
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }

    let Some(&action) = Action::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    state.config.add_binding(action, KeyBind::from_key_event(key));
    persist(state);
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let layout = AppLayout::from_area(state.terminal_area);
    match state.active_view {
        ActiveView::Home => handle_home_mouse(state, &layout, mouse),
        ActiveView::Deck => handle_deck_mouse(state, &layout, mouse, now),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => {}
    }
}

fn handle_home_mouse(state: &mut AppState, layout: &AppLayout, mouse: MouseEvent) {
    let last = WorkflowId::SELECTABLE.len() - 1;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(i) = HomeGeometry::new(layout.deck_area).hit(mouse.column, mouse.row) {
                state.home_selected = i;
                open_selected_workflow(state);
            }
        }
        MouseEventKind::ScrollUp => {
            state.home_selected = state.home_selected.saturating_sub(1);
        }
        MouseEventKind::ScrollDown => {
            state.home_selected = (state.home_selected + 1).min(last);
        }
        _ => {}
    }
}

fn handle_deck_mouse(state: &mut AppState, layout: &AppLayout, mouse: MouseEvent, now: Instant) {
    let controller = &mut state.deck.controller;
    let step = controller.client_width().unwrap_or(0.0) * state.config.wheel_step;

    match mouse.kind {
        // Vertical wheels are mapped onto the horizontal deck.
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => controller.scroll_by(step, now),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => controller.scroll_by(-step, now),
        MouseEventKind::Down(MouseButton::Left) => {
            let nav = NavGeometry::new(
                layout.nav_area,
                controller.section_count(),
                controller.active_index(),
            );
            if let Some(target) = nav.hit(mouse.column, mouse.row) {
                controller.scroll_to_section(nav.resolve(target), now);
                state.drag_column = None;
            } else if contains(layout.deck_area, mouse.column, mouse.row) {
                controller.hold(now);
                state.drag_column = Some(mouse.column);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(last) = state.drag_column {
                // Content follows the pointer: dragging right reveals the left.
                controller.scroll_by(f64::from(last) - f64::from(mouse.column), now);
                state.drag_column = Some(mouse.column);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            controller.release(now);
            state.drag_column = None;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::controller::ScrollBehavior;
    use crate::core::molecules::GENERATION_DELAY;
    use ratatui::layout::Rect;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn state() -> AppState {
        let mut config = AppConfig::default();
        config.scroll_behavior = ScrollBehavior::Instant;
        config.snap_to_sections = false;
        let mut s = AppState::new(config);
        s.set_terminal_area(Rect::new(0, 0, 100, 30));
        s
    }

    fn frames(s: &mut AppState, mut now: Instant, n: u32) -> Instant {
        for _ in 0..n {
            now += FRAME;
            s.deck.on_frame(now);
        }
        now
    }

    fn open(s: &mut AppState, workflow: WorkflowId, now: Instant) -> Instant {
        s.home_selected = WorkflowId::SELECTABLE
            .iter()
            .position(|&w| w == workflow)
            .expect("selectable");
        handle_key(s, press(KeyCode::Enter), now);
        frames(s, now, 2)
    }

    #[test]
    fn test_route_honours_key_capture() {
        assert_eq!(route(Action::NextSection, Focus::Panel, true), DeckCommand::Step(1));
        assert_eq!(route(Action::NextSection, Focus::Panel, false), DeckCommand::Cursor(1, 0));
        assert_eq!(route(Action::PrevSection, Focus::Deck, false), DeckCommand::Step(-1));
        assert_eq!(route(Action::Back, Focus::Panel, true), DeckCommand::Unfocus);
        assert_eq!(route(Action::Back, Focus::Deck, true), DeckCommand::Home);
    }

    #[test]
    fn test_home_enter_opens_workflow_and_escape_returns() {
        let mut s = state();
        let now = Instant::now();
        handle_key(&mut s, press(KeyCode::Down), now);
        assert_eq!(s.home_selected, 1);
        handle_key(&mut s, press(KeyCode::Enter), now);
        assert_eq!(s.active_view, ActiveView::Deck);
        assert_eq!(s.deck.workflow, WorkflowId::DigitalTwin);

        handle_key(&mut s, press(KeyCode::Esc), now);
        assert_eq!(s.active_view, ActiveView::Home);
        assert_eq!(s.deck.workflow, WorkflowId::Home);
        assert_eq!(s.home_selected, 1);
    }

    #[test]
    fn test_arrow_keys_step_and_clamp() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::Materials, Instant::now());

        handle_key(&mut s, press(KeyCode::Left), now);
        let now = frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), 0);

        handle_key(&mut s, press(KeyCode::Right), now);
        let now = frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), 1);

        handle_key(&mut s, press(KeyCode::End), now);
        frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), materials::IMPACT);
    }

    #[test]
    fn test_step_sequence_runs_the_bench() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::Materials, Instant::now());
        // Overview has no step of its own: Enter advances.
        handle_key(&mut s, press(KeyCode::Enter), now);
        let now = frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), materials::GENERATE);

        handle_key(&mut s, press(KeyCode::Enter), now);
        assert!(s.deck.panels.bench_mut().expect("mounted").is_generating());
        let frames_needed = (GENERATION_DELAY.as_millis() / FRAME.as_millis()) as u32 + 2;
        let now = frames(&mut s, now, frames_needed);
        assert!(!s.deck.panels.bench_mut().expect("mounted").cells().is_empty());

        // Selecting before predicting is refused, not a panic.
        handle_key(&mut s, press(KeyCode::Right), now);
        let now = frames(&mut s, now, 2);
        handle_key(&mut s, press(KeyCode::Right), now);
        let now = frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), materials::SELECT);
        handle_key(&mut s, press(KeyCode::Enter), now);
        assert_eq!(s.status_message.as_deref(), Some("run the property predictions first"));
    }

    #[test]
    fn test_scoped_keys_move_the_cursor() {
        let mut s = state();
        s.config.capture_keys_globally = false;
        let now = open(&mut s, WorkflowId::Materials, Instant::now());
        handle_key(&mut s, press(KeyCode::Right), now);
        let now = frames(&mut s, now, 2);

        handle_key(&mut s, press(KeyCode::Tab), now);
        assert_eq!(s.focus, Focus::Panel);
        handle_key(&mut s, press(KeyCode::Right), now);
        let now = frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), materials::GENERATE);

        handle_key(&mut s, press(KeyCode::Esc), now);
        assert_eq!(s.focus, Focus::Deck);
        assert_eq!(s.active_view, ActiveView::Deck);
    }

    #[test]
    fn test_focus_refused_without_panel() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::Spectra, Instant::now());
        handle_key(&mut s, press(KeyCode::Tab), now);
        assert_eq!(s.focus, Focus::Deck);
        assert!(s.status_message.is_some());
    }

    #[test]
    fn test_train_step_needs_models_then_queues_a_session() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::DigitalTwin, Instant::now());
        s.deck.controller.scroll_to_section(digital_twin::TRAIN, now);
        let now = frames(&mut s, now, 2);
        handle_key(&mut s, press(KeyCode::Enter), now);
        assert!(s.pending_training.is_none());
        assert_eq!(s.status_message.as_deref(), Some("select at least one model first"));

        // Pick two models on the models section.
        handle_key(&mut s, press(KeyCode::Left), now);
        let now = frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), digital_twin::MODELS);
        handle_key(&mut s, press(KeyCode::Tab), now);
        handle_key(&mut s, press(KeyCode::Char(' ')), now);
        handle_key(&mut s, press(KeyCode::Down), now);
        handle_key(&mut s, press(KeyCode::Down), now);
        handle_key(&mut s, press(KeyCode::Char(' ')), now);
        handle_key(&mut s, press(KeyCode::Tab), now);

        handle_key(&mut s, press(KeyCode::Right), now);
        let now = frames(&mut s, now, 2);
        handle_key(&mut s, press(KeyCode::Enter), now);
        let (session, request) = s.pending_training.clone().expect("queued");
        assert_eq!(request.models, vec!["AdaBoost", "Random Forest"]);
        let lab = s.deck.panels.twin_mut().expect("mounted");
        assert_eq!(lab.board().session(), session);
        assert_eq!(lab.board().runs().len(), 2);

        // A second press while the session runs is refused.
        s.pending_training = None;
        handle_key(&mut s, press(KeyCode::Enter), now);
        assert!(s.pending_training.is_none());
        assert_eq!(s.status_message.as_deref(), Some("training already in progress"));
    }

    #[test]
    fn test_dataset_section_cycles_and_excludes_features() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::DigitalTwin, Instant::now());
        handle_key(&mut s, press(KeyCode::Enter), now);
        let lab = s.deck.panels.twin_mut().expect("mounted");
        assert_eq!(lab.dataset().name, "turbofan_engines.csv");

        handle_key(&mut s, press(KeyCode::Tab), now);
        assert_eq!(s.focus, Focus::Panel);
        handle_key(&mut s, press(KeyCode::Down), now);
        handle_key(&mut s, press(KeyCode::Char(' ')), now);
        let lab = s.deck.panels.twin_mut().expect("mounted");
        assert_eq!(lab.feature_cursor(), 1);
        assert!(lab.is_excluded(1));
        assert!(!lab.selected_features().contains(&"core_speed".to_string()));
    }

    #[test]
    fn test_wheel_and_drag_scroll_the_deck() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::Materials, Instant::now());

        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 50, 15), now);
        assert_eq!(s.deck.controller.scroll_left(), 25.0);

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 60, 15), now);
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), 70, 15), now);
        assert_eq!(s.deck.controller.scroll_left(), 15.0);
        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), 70, 15), now);
        assert_eq!(s.drag_column, None);
    }

    #[test]
    fn test_single_wheel_notches_walk_the_sections_with_default_settings() {
        let mut s = AppState::new(AppConfig::default());
        s.set_terminal_area(Rect::new(0, 0, 100, 30));
        let mut now = open(&mut s, WorkflowId::Materials, Instant::now());
        for expected in 1..=materials::IMPACT {
            handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 50, 15), now);
            now = frames(&mut s, now, 40);
            assert_eq!(s.deck.controller.active_index(), expected);
        }
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollUp, 50, 15), now);
        frames(&mut s, now, 40);
        assert_eq!(s.deck.controller.active_index(), materials::INDUSTRIES);
    }

    #[test]
    fn test_drag_holds_snap_until_release() {
        let mut s = AppState::new(AppConfig::default());
        s.set_terminal_area(Rect::new(0, 0, 100, 30));
        let now = open(&mut s, WorkflowId::Materials, Instant::now());

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 80, 15), now);
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), 50, 15), now);
        let now = frames(&mut s, now, 40);
        assert_eq!(s.deck.controller.scroll_left(), 30.0);

        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), 50, 15), now);
        frames(&mut s, now, 40);
        assert_eq!(s.deck.controller.scroll_left(), 100.0);
        assert_eq!(s.deck.controller.active_index(), materials::GENERATE);
    }

    #[test]
    fn test_nav_click_jumps_to_section() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::Materials, Instant::now());
        // 7 sections in a 100-column row: dots start at column 42, the
        // active one is three cells wide, so section 3 sits at column 50.
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 50, 28), now);
        frames(&mut s, now, 2);
        assert_eq!(s.deck.controller.active_index(), 3);
    }

    #[test]
    fn test_home_click_opens_card() {
        let mut s = state();
        // Deck area is rows 8..28; three 4-row cards start at row 12.
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 50, 21);
        handle_mouse(&mut s, click, Instant::now());
        assert_eq!(s.active_view, ActiveView::Deck);
        assert_eq!(s.deck.workflow, WorkflowId::Spectra);
    }

    #[test]
    fn test_settings_round_trip_restores_view() {
        let mut s = state();
        let now = open(&mut s, WorkflowId::Materials, Instant::now());
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT), now);
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        handle_key(&mut s, press(KeyCode::Esc), now);
        assert_eq!(s.active_view, ActiveView::Deck);
    }
}
