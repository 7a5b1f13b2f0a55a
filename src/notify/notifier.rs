use colored::Colorize;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::warn;

use super::notice::{Notice, NoticeLevel};
use crate::utils::ShelterError;

/// Single channel through which every operation reports its outcome
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn report_error(&self, err: &ShelterError) {
        warn!("{}", err);
        self.notify(Notice::from_error(err));
    }

    fn success(&self, title: &str, message: &str) {
        self.notify(Notice::new(NoticeLevel::Success, title, message));
    }

    fn info(&self, title: &str, message: &str) {
        self.notify(Notice::new(NoticeLevel::Info, title, message));
    }
}

/// Prints notices for one-shot commands
///
/// Errors go to stderr so command output stays clean.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                eprintln!("{} {}", format!("[{}]", notice.title).red().bold(), notice.message)
            }
            NoticeLevel::Success => {
                println!("{} {}", format!("[{}]", notice.title).green().bold(), notice.message)
            }
            NoticeLevel::Info => {
                println!("{} {}", format!("[{}]", notice.title).cyan(), notice.message)
            }
        }
    }
}

/// Buffers notices for the interactive UI to pick up
#[derive(Debug, Default)]
pub struct QueueNotifier {
    queue: Mutex<VecDeque<Notice>>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything raised since the last call
    pub fn drain(&self) -> Vec<Notice> {
        self.queue.lock().drain(..).collect()
    }

    pub fn latest(&self) -> Option<Notice> {
        self.queue.lock().back().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Notifier for QueueNotifier {
    fn notify(&self, notice: Notice) {
        self.queue.lock().push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_collects_in_order() {
        let notifier = QueueNotifier::new();
        notifier.info("Loading", "animals");
        notifier.report_error(&ShelterError::Unauthorized("log in again".into()));
        notifier.success("Saved", "Animal registered");

        assert_eq!(notifier.latest().map(|n| n.level), Some(NoticeLevel::Success));

        let notices = notifier.drain();
        let levels: Vec<_> = notices.iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NoticeLevel::Info, NoticeLevel::Error, NoticeLevel::Success]
        );
        assert_eq!(notices[1].message, "log in again");
        assert!(notifier.is_empty());
    }
}
