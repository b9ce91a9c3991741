// SmtpView - ui/panels/mod.rs
//
// Individual UI panels. Each panel is a function that renders into an egui::Ui.

pub mod status;
pub mod toolbar;
