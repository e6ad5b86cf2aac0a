//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* and *app* state and turns it into cells on
//! the terminal.  No state is mutated here.

pub mod deck;
pub mod home;
pub mod layout;
pub mod nav;
pub mod popup;
pub mod spinner;
pub mod text;
pub mod theme;
pub mod title;

use std::time::Instant;

use ratatui::{widgets::Paragraph, Frame};

use crate::app::state::{ActiveView, AppState, Focus};
use crate::config::Action;
use crate::core::title::TitleParams;

use self::layout::AppLayout;
use self::theme::Theme;

/// Render one full frame.
pub fn draw(frame: &mut Frame, state: &AppState, now: Instant) {
    let layout = AppLayout::from_area(frame.area());
    let deck = &state.deck;

    frame.render_widget(
        title::TitleView {
            workflow: deck.workflow,
            sections: deck.sections(),
            progress: deck.controller.progress(),
            params: &TitleParams::default(),
        },
        layout.title_area,
    );

    // Popups draw over whichever screen opened them.
    let screen = match state.active_view {
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => state.underlying_view,
        view => view,
    };
    let panel_focus = state.focus == Focus::Panel && deck.active_panel_focusable();

    match screen {
        ActiveView::Deck => {
            let activate_key = state.config.display_bindings(Action::Activate);
            frame.render_widget(
                deck::DeckView {
                    deck,
                    panel_focus,
                    activate_key: &activate_key,
                    now,
                },
                layout.deck_area,
            );
            let geometry = nav::NavGeometry::new(
                layout.nav_area,
                deck.controller.section_count(),
                deck.controller.active_index(),
            );
            frame.render_widget(nav::NavBar { geometry: &geometry }, layout.nav_area);
        }
        _ => {
            let geometry = home::HomeGeometry::new(layout.deck_area);
            frame.render_widget(
                home::HomeView {
                    geometry: &geometry,
                    selected: state.home_selected,
                },
                layout.deck_area,
            );
        }
    }

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Home | ActiveView::Deck => {
            let text = state.status_message.as_deref().unwrap_or(&hint);
            if panel_focus {
                format!(" [panel] {text}")
            } else {
                format!(" {text}")
            }
        }
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => String::new(),
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(
                popup::SettingsPopup {
                    selected: state.settings_selected,
                    state,
                },
                frame.area(),
            );
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Home | ActiveView::Deck => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use ratatui::{backend::TestBackend, layout::Rect, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_home_screen_lists_workflows() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        let mut state = AppState::new(AppConfig::default());
        state.set_terminal_area(Rect::new(0, 0, 100, 30));
        terminal
            .draw(|f| draw(f, &state, Instant::now()))
            .expect("draw");
        let text = screen(&terminal);
        assert!(text.contains("M a t e r i a l s A I"));
        assert!(text.contains("spectra matching with AI"));
        assert!(text.contains("p e r s o n a l"));
    }

    #[test]
    fn test_settings_popup_over_deck() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        let mut state = AppState::new(AppConfig::default());
        state.set_terminal_area(Rect::new(0, 0, 100, 30));
        state.open_workflow(crate::core::content::WorkflowId::Materials);
        state.open_settings();
        terminal
            .draw(|f| draw(f, &state, Instant::now()))
            .expect("draw");
        let text = screen(&terminal);
        assert!(text.contains("Settings"));
        assert!(text.contains("o v e r v i e w"));
    }
}
