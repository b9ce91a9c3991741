// SmtpView - app/demo.rs
//
// Demo producer for `--demo`: a background thread that plays simulated SMTP
// sessions. Session chatter is logged through `tracing` under the SMTP
// component target, so it reaches the logs pane the same way a real server's
// logging would (capture sink -> bridge -> publisher). Each finished session
// hands its mail to the `MailSource`.
//
// The thread sleeps in short slices and checks the cancel flag between them,
// so stopping takes effect promptly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Local;

use crate::app::mail_source::MailSource;
use crate::core::event::MailModel;
use crate::util::constants::{DEMO_SESSION_INTERVAL_MS, DEMO_STEP_INTERVAL_MS};

/// `tracing` target of the simulated session records.
pub const SESSION_TARGET: &str = "smtpview::smtp::session";

/// Wake-up granularity for the cancel check (ms).
const CANCEL_CHECK_INTERVAL_MS: u64 = 50;

const SENDERS: &[&str] = &["alice@example.com", "build-bot@ci.local", "noreply@shop.test"];
const RECIPIENTS: &[&str] = &["bob@example.com", "team@example.com", "qa@example.com"];
const SUBJECTS: &[&str] = &["Weekly report", "Build #1432 passed", "Your order has shipped"];

/// Handle to the running demo thread.
pub struct DemoProducer {
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DemoProducer {
    /// Start producing sessions until [`Self::stop`] is called or the handle is dropped.
    pub fn start(mail_source: MailSource) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = std::thread::Builder::new()
            .name("smtp-demo".to_string())
            .spawn(move || run_demo(mail_source, flag));

        let handle = match handle {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::error!(error = %e, "Failed to spawn demo producer thread");
                None
            }
        };

        tracing::info!("Demo producer started");
        Self { cancel, handle }
    }

    /// Ask the thread to stop and wait for it.
    pub fn stop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Demo producer thread panicked");
            }
        }
    }
}

impl Drop for DemoProducer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_demo(mail_source: MailSource, cancel: Arc<AtomicBool>) {
    let mut session: usize = 0;
    loop {
        if !sleep_unless_cancelled(DEMO_SESSION_INTERVAL_MS, &cancel) {
            return;
        }

        let mail = demo_mail(session);
        for step in session_transcript(&mail) {
            tracing::info!(target: SESSION_TARGET, "{}", step);
            if !sleep_unless_cancelled(DEMO_STEP_INTERVAL_MS, &cancel) {
                return;
            }
        }
        mail_source.notify_model_saved(&mail);
        session = session.wrapping_add(1);
    }
}

/// Sleep `total_ms`, returning `false` as soon as `cancel` is set.
fn sleep_unless_cancelled(total_ms: u64, cancel: &AtomicBool) -> bool {
    let slices = (total_ms / CANCEL_CHECK_INTERVAL_MS).max(1);
    for _ in 0..slices {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        std::thread::sleep(Duration::from_millis(CANCEL_CHECK_INTERVAL_MS));
    }
    !cancel.load(Ordering::SeqCst)
}

/// Build the n-th simulated mail.
pub fn demo_mail(n: usize) -> MailModel {
    let from = SENDERS[n % SENDERS.len()].to_string();
    let to = vec![RECIPIENTS[n % RECIPIENTS.len()].to_string()];
    let subject = SUBJECTS[n % SUBJECTS.len()].to_string();
    let received_at = Local::now();

    let rendered = format!(
        "Received: from localhost\r\n\
         Date: {}\r\n\
         From: {from}\r\n\
         To: {}\r\n\
         Subject: {subject}\r\n\
         Content-Type: text/html; charset=UTF-8\r\n\
         \r\n\
         <html><body><p>Demo message #{n}.</p></body></html>\r\n",
        received_at.to_rfc2822(),
        to.join(", "),
    );

    MailModel {
        received_at,
        from,
        to,
        subject: Some(subject),
        rendered,
    }
}

/// The log lines a server would emit while receiving `mail`.
fn session_transcript(mail: &MailModel) -> Vec<String> {
    let mut lines = vec![
        "Connection received from 127.0.0.1".to_string(),
        "Client: EHLO localhost".to_string(),
        format!("Client: MAIL FROM:<{}>", mail.from),
    ];
    for rcpt in &mail.to {
        lines.push(format!("Client: RCPT TO:<{rcpt}>"));
    }
    lines.push("Client: DATA".to_string());
    lines.push(format!("Message stored ({} bytes)", mail.rendered.len()));
    lines.push("Client: QUIT".to_string());
    lines
}
