// SmtpView - app/mod.rs
//
// Application layer: event distribution, display subscribers, log capture
// bridge, render hand-off, state.
// Dependencies: core, util.
// Must NOT depend on: ui, platform specifics.

pub mod clear_source;
pub mod demo;
pub mod display;
pub mod log_bridge;
pub mod mail_source;
pub mod publisher;
pub mod render;
pub mod state;
