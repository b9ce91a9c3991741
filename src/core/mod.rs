// SmtpView - core/mod.rs
//
// Core business logic layer.
// Dependencies: util, chrono, regex.
// Must NOT depend on: ui, platform, app, or any threading/I/O concern.

pub mod buffer;
pub mod event;
pub mod search;
