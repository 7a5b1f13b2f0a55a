use super::validation::{
    date, date_time, email, format_date_time, non_negative_integer, optional, required,
};
use crate::api::{
    AdopterPayload, AgeUnit, Animal, AnimalPayload, Appointment, AppointmentUpdate,
    NewAppointment, NewVaccination,
};
use crate::constants::CUSTOM_VACCINE_MARKER;
use crate::utils::ValidationError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalForm {
    pub name: String,
    pub species: String,
    pub age: String,
    pub age_unit: String,
    pub health_status: String,
    pub adopter_id: String,
}

impl AnimalForm {
    pub fn validate(&self) -> Result<AnimalPayload, ValidationError> {
        let name = required("name", &self.name)?;
        let species = required("species", &self.species)?;
        let age = non_negative_integer("age", &self.age)?;
        let age_unit = if self.age_unit.trim().is_empty() {
            AgeUnit::default()
        } else {
            self.age_unit
                .parse::<AgeUnit>()
                .map_err(|reason| ValidationError::Invalid {
                    field: "age unit",
                    reason,
                })?
        };
        let health_status = required("health status", &self.health_status)?;
        let adopter_id = required("adopter", &self.adopter_id)?;

        Ok(AnimalPayload {
            name,
            species,
            age,
            age_unit,
            health_status,
            adopter_id,
        })
    }
}

/// Prefill for editing an existing animal
impl From<&Animal> for AnimalForm {
    fn from(animal: &Animal) -> Self {
        Self {
            name: animal.name.clone(),
            species: animal.species.clone(),
            age: animal.age.to_string(),
            age_unit: animal.age_unit.to_string(),
            health_status: animal.health_status.clone(),
            adopter_id: animal.adopter_id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdopterForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

impl AdopterForm {
    pub fn validate(&self) -> Result<AdopterPayload, ValidationError> {
        Ok(AdopterPayload {
            name: required("name", &self.name)?,
            email: email("email", &self.email)?,
            address: required("address", &self.address)?,
            phone: required("phone", &self.phone)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentForm {
    pub animal_id: String,
    pub date: String,
    pub reason: String,
    pub veterinarian: String,
    pub status: Option<String>,
}

impl AppointmentForm {
    /// Validate for scheduling a new appointment
    pub fn validate(&self) -> Result<NewAppointment, ValidationError> {
        let animal_id = required("animal", &self.animal_id)?;
        let when = date_time("date", &self.date)?;

        Ok(NewAppointment {
            animal_id,
            scheduled_at: format_date_time(&when),
            reason: required("reason", &self.reason)?,
            veterinarian: required("veterinarian", &self.veterinarian)?,
        })
    }

    /// Validate for editing; the animal is fixed but a status is required
    pub fn validate_update(&self) -> Result<AppointmentUpdate, ValidationError> {
        let when = date_time("date", &self.date)?;

        Ok(AppointmentUpdate {
            scheduled_at: format_date_time(&when),
            reason: required("reason", &self.reason)?,
            veterinarian: required("veterinarian", &self.veterinarian)?,
            status: optional(self.status.as_deref()).ok_or(ValidationError::Required("status"))?,
        })
    }
}

impl From<&Appointment> for AppointmentForm {
    fn from(appointment: &Appointment) -> Self {
        Self {
            animal_id: appointment.animal_ref().unwrap_or_default().to_string(),
            date: appointment.scheduled_at.clone(),
            reason: appointment.reason.clone(),
            veterinarian: appointment.veterinarian.clone(),
            status: appointment.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccinationForm {
    pub animal_id: String,
    pub name: String,
    pub custom_name: Option<String>,
    pub applied_on: String,
}

impl VaccinationForm {
    pub fn validate(&self) -> Result<NewVaccination, ValidationError> {
        let animal_id = required("animal", &self.animal_id)?;
        let selected = required("vaccine name", &self.name)?;
        let name = if selected.eq_ignore_ascii_case(CUSTOM_VACCINE_MARKER) {
            optional(self.custom_name.as_deref()).ok_or(ValidationError::Required("custom vaccine name"))?
        } else {
            selected
        };
        let applied_on = date("application date", &self.applied_on)?;

        Ok(NewVaccination {
            name,
            applied_on: applied_on.format("%Y-%m-%d").to_string(),
            animal_id,
        })
    }
}
