// SmtpView - ui/panels/toolbar.rs
//
// Top toolbar: pane tabs, search box with "Find next", and "Clear all".

use crate::app::state::{AppState, Pane};
use crate::ui::theme;

/// Render the toolbar (top panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.selectable_value(&mut state.active_pane, Pane::Logs, Pane::Logs.label());
        ui.selectable_value(
            &mut state.active_pane,
            Pane::LastMail,
            Pane::LastMail.label(),
        );

        ui.separator();

        let search = ui.add(
            egui::TextEdit::singleline(&mut state.search_term)
                .hint_text("Find\u{2026}")
                .desired_width(theme::SEARCH_BOX_WIDTH),
        );
        let enter = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add_enabled(!state.search_term.is_empty(), egui::Button::new("Find next"))
            .clicked();
        if enter || clicked {
            state.find_next();
            if enter {
                search.request_focus();
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button("Clear all")
                .on_hover_text("Clear the logs and the last message")
                .clicked()
            {
                state.clear_all();
            }
        });
    });
}
