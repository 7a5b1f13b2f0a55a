// Gateway module for views - follows the Train Station Pattern
// Turns API entities into what the screens and commands display

mod calendar;
pub mod format;

pub use calendar::{build_agenda, Agenda, AgendaItem};
