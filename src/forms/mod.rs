// Gateway module for forms - follows the Train Station Pattern
// Every form is validated here before anything touches the network

mod account;
mod records;
mod validation;

pub use account::{LoginForm, PasswordChangeForm, ProfileForm, RegisterForm};
pub use records::{AdopterForm, AnimalForm, AppointmentForm, VaccinationForm};
