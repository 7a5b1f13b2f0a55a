/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{
    AdopterArgs, AdopterCommand, AnimalArgs, AnimalChanges, AnimalCommand, AppointmentArgs,
    AppointmentCommand, Cli, Commands, LoginArgs, OutputFormat, ProfileCommand, RegisterArgs,
    VaccineArgs, VaccineCommand,
};
pub use commands::{handle_command, target_route, CommandOutcome};
