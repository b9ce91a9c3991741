// SmtpView - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state, render surface), egui.
// Must NOT depend on: platform, direct I/O.

pub mod pane;
pub mod panels;
pub mod theme;
