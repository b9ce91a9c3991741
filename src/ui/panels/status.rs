// SmtpView - ui/panels/status.rs
//
// Bottom status bar: last status message, binding warnings.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the status bar (bottom panel).
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(&state.status_message).color(theme::STATUS_TEXT));

        if !state.warnings.is_empty() {
            ui.separator();
            let summary = if state.warnings.len() == 1 {
                state.warnings[0].clone()
            } else {
                format!("{} warnings", state.warnings.len())
            };
            ui.label(egui::RichText::new(summary).color(theme::WARNING_TEXT))
                .on_hover_text(state.warnings.join("\n"));
        }

        if state.debug_mode {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "sink: {} ({})",
                        state.bridge.sink_name(),
                        if state.bridge.is_bound() { "bound" } else { "unbound" }
                    ))
                    .small()
                    .color(theme::STATUS_TEXT),
                );
            });
        }
    });
}
