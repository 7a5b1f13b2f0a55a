// Gateway module for the backend API - follows the Train Station Pattern
// All external access must go through this gateway

mod client;
mod resources;
mod types;

pub use client::ApiClient;
pub use types::{
    AgeUnit, Adopter, AdopterPayload, Animal, AnimalHistory, AnimalPayload, AnimalSummary,
    Appointment, AppointmentDetails, AppointmentUpdate, AuthResponse, HealthRecord, LoginRequest,
    NewAppointment, NewVaccination, PasswordChange, ProfileUpdate, RegisterRequest, UserProfile,
    Vaccination,
};
