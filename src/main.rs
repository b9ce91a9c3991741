// SmtpView - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and validation
// 3. Logging initialisation with the configured capture sink
// 4. Pipeline wiring (publisher, panes, logging bridge)
// 5. Optional demo producer
// 6. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::ui::...` etc.
pub use smtpview::app;
pub use smtpview::platform;
pub use smtpview::ui;
pub use smtpview::util;

use clap::Parser;
use std::path::PathBuf;

/// SmtpView - live viewer for SMTP session logs and the last received mail.
#[derive(Parser, Debug)]
#[command(name = "SmtpView", version, about)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Name of the capture sink the logs pane binds to (overrides config).
    #[arg(short = 's', long = "sink")]
    sink: Option<String>,

    /// Play simulated SMTP sessions so the panes have something to show.
    #[arg(long = "demo")]
    demo: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging exists; its warnings are replayed below.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    // Sinks must exist before the subscriber is installed.
    let sinks = config.sink_registry();
    util::logging::init(cli.debug, config.log_level.as_deref(), &sinks);

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "SmtpView starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let sink_name = cli.sink.as_deref().unwrap_or(&config.sink_name);
    let mut state = app::state::AppState::new(&sinks, sink_name, cli.debug);
    state.warnings.extend(config_warnings);

    let demo = cli
        .demo
        .then(|| app::demo::DemoProducer::start(state.mail_source.clone()));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode);
            Ok(Box::new(gui::SmtpViewApp::new(state, font_size, demo)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch SmtpView GUI: {e}");
        std::process::exit(1);
    }
}
