// Gateway module for user notifications - follows the Train Station Pattern

mod notice;
mod notifier;

pub use notice::{Notice, NoticeLevel};
pub use notifier::{Notifier, QueueNotifier, TerminalNotifier};
