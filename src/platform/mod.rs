// SmtpView - platform/mod.rs
//
// Platform layer: OS-specific directories and configuration files.
// Dependencies: util.

pub mod config;
