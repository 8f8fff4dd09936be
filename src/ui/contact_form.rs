use imgui::{Condition, Ui};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{error, info};

use crate::core::{ContactDraft, Notifier};
use crate::store::NoteStore;

/// How long "Sending..." is shown before the record is stored
pub const SEND_DELAY: Duration = Duration::from_secs(2);

/// Contact form window. Submissions run on the runtime and report back through a oneshot.
pub struct ContactForm {
    draft: ContactDraft,
    store: Arc<dyn NoteStore>,
    runtime: Handle,
    send_delay: Duration,
    sending: Option<oneshot::Receiver<Result<usize, String>>>,
}

impl ContactForm {
    pub fn new(store: Arc<dyn NoteStore>, runtime: Handle) -> Self {
        info!("Contact messages go to {}", store.describe());
        Self {
            draft: ContactDraft::default(),
            store,
            runtime,
            send_delay: SEND_DELAY,
            sending: None,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending.is_some()
    }

    /// Validate the draft and start storing it
    pub fn submit(&mut self, notifier: &mut Notifier) -> bool {
        if self.sending.is_some() {
            return false;
        }

        let record = match self.draft.validate() {
            Ok(record) => record,
            Err(_) => {
                notifier.error("Please fill in all fields.");
                return false;
            }
        };

        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let delay = self.send_delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let result = store.append(record).await.map_err(|e| format!("{:#}", e));
            let _ = tx.send(result);
        });

        self.sending = Some(rx);
        true
    }

    /// Pick up a finished submission, if any
    pub fn poll(&mut self, notifier: &mut Notifier) {
        let Some(rx) = self.sending.as_mut() else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err("submission task ended early".to_string()),
        };
        self.sending = None;

        match result {
            Ok(count) => {
                info!("Stored contact message ({} total)", count);
                notifier.success("Message sent successfully! We'll get back to you soon.");
                self.draft.clear();
            }
            Err(e) => {
                error!("Failed to store contact message: {}", e);
                notifier.error("Could not send your message. Please try again.");
            }
        }
    }

    pub fn render(&mut self, ui: &Ui, notifier: &mut Notifier, opened: &mut bool) {
        self.poll(notifier);

        ui.window("Get In Touch")
            .size([420.0, 360.0], Condition::FirstUseEver)
            .position([60.0, 520.0], Condition::FirstUseEver)
            .opened(opened)
            .build(|| {
                ui.text_wrapped("Have questions about the tutorial? Send us a message.");
                ui.spacing();

                ui.input_text("Name", &mut self.draft.name).build();
                ui.input_text("Email", &mut self.draft.email).build();
                ui.input_text_multiline("Message", &mut self.draft.message, [-1.0, 140.0])
                    .build();
                ui.spacing();

                if self.sending.is_some() {
                    ui.disabled(true, || {
                        ui.button("Sending...");
                    });
                } else if ui.button("Send Message") {
                    self.submit(notifier);
                }
            });
    }
}
