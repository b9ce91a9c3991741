// SmtpView - gui.rs
//
// Top-level eframe::App implementation.
// Drains the render queues into the pane views each frame and wires the
// panels together.

use crate::app::demo::DemoProducer;
use crate::app::state::{AppState, Pane};
use crate::ui;
use crate::ui::pane::PaneView;

/// The SmtpView application.
///
/// The demo producer publishes into `state`, so it is declared first and
/// therefore stopped before the render queues are dropped.
pub struct SmtpViewApp {
    demo: Option<DemoProducer>,
    pub state: AppState,
    pub logs_view: PaneView,
    pub mail_view: PaneView,
    pub font_size: f32,
}

impl SmtpViewApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState, font_size: f32, demo: Option<DemoProducer>) -> Self {
        Self {
            demo,
            state,
            logs_view: PaneView::new(true),
            mail_view: PaneView::new(false),
            font_size,
        }
    }

    /// Stop background producers while the panes can still receive events.
    pub fn shutdown(&mut self) {
        if let Some(mut demo) = self.demo.take() {
            demo.stop();
            tracing::debug!("Demo producer stopped");
        }
    }
}

impl Drop for SmtpViewApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl eframe::App for SmtpViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply everything the producer threads queued since the last frame.
        let applied = self.state.logs_queue.drain_into(&mut self.logs_view)
            + self.state.mail_queue.drain_into(&mut self.mail_view);
        if applied > 0 {
            tracing::trace!(commands = applied, "Render commands applied");
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::panels::toolbar::render(ui, &mut self.state);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(egui::Frame::default().fill(ui::theme::STATUS_BG))
            .show(ctx, |ui| {
                ui::panels::status::render(ui, &self.state);
            });

        // A search issued from the toolbar this frame queued its selection;
        // apply it before the pane is drawn.
        self.state.logs_queue.drain_into(&mut self.logs_view);
        self.state.mail_queue.drain_into(&mut self.mail_view);

        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_pane {
            Pane::Logs => ui::pane::render(ui, "logs_pane", &mut self.logs_view, self.font_size),
            Pane::LastMail => {
                ui::pane::render(ui, "last_mail_pane", &mut self.mail_view, self.font_size)
            }
        });

        // Producers run on other threads; poll for their output.
        ctx.request_repaint_after(std::time::Duration::from_millis(
            crate::util::constants::RENDER_POLL_INTERVAL_MS,
        ));
    }
}
