use futures::try_join;
use tracing::debug;

use super::client::ApiClient;
use super::types::{
    Adopter, AdopterPayload, Animal, AnimalHistory, AnimalPayload, Appointment,
    AppointmentDetails, AppointmentUpdate, AuthResponse, HealthRecord, LoginRequest,
    NewAppointment, NewVaccination, PasswordChange, ProfileUpdate, RegisterRequest, UserProfile,
    Vaccination,
};
use crate::constants::REGISTER_PATH;
use crate::utils::Result;

// Auth
impl ApiClient {
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let path = self.login_path().to_string();
        self.post(&path, request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.post_unit(REGISTER_PATH, request).await
    }
}

// Animals
impl ApiClient {
    pub async fn list_animals(&self) -> Result<Vec<Animal>> {
        self.get("/animales").await
    }

    pub async fn get_animal(&self, id: &str) -> Result<Animal> {
        self.get(&format!("/animales/{}", id)).await
    }

    pub async fn create_animal(&self, animal: &AnimalPayload) -> Result<()> {
        self.post_unit("/animales", animal).await
    }

    pub async fn update_animal(&self, id: &str, animal: &AnimalPayload) -> Result<()> {
        self.put_unit(&format!("/animales/{}", id), animal).await
    }

    pub async fn delete_animal(&self, id: &str) -> Result<()> {
        self.delete(&format!("/animales/{}", id)).await
    }

    /// Animal with its appointments and vaccinations
    pub async fn animal_history(&self, id: &str) -> Result<AnimalHistory> {
        let (animal, appointments, vaccinations) = try_join!(
            self.get_animal(id),
            self.appointments_for_animal(id),
            self.vaccinations_for_animal(id)
        )?;

        Ok(AnimalHistory {
            animal,
            appointments,
            vaccinations,
        })
    }
}

// Adopters
impl ApiClient {
    pub async fn list_adopters(&self) -> Result<Vec<Adopter>> {
        self.get("/adoptantes").await
    }

    pub async fn get_adopter(&self, id: &str) -> Result<Adopter> {
        self.get(&format!("/adoptantes/{}", id)).await
    }

    pub async fn create_adopter(&self, adopter: &AdopterPayload) -> Result<()> {
        self.post_unit("/adoptantes", adopter).await
    }

    pub async fn delete_adopter(&self, id: &str) -> Result<()> {
        self.delete(&format!("/adoptantes/{}", id)).await
    }
}

// Appointments
impl ApiClient {
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.get("/citas").await
    }

    pub async fn get_appointment(&self, id: &str) -> Result<Appointment> {
        self.get(&format!("/citas/{}", id)).await
    }

    pub async fn appointments_for_animal(&self, animal_id: &str) -> Result<Vec<Appointment>> {
        self.get(&format!("/citas/animal/{}", animal_id)).await
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        self.post_unit("/citas", appointment).await
    }

    pub async fn update_appointment(&self, id: &str, update: &AppointmentUpdate) -> Result<()> {
        self.put_unit(&format!("/citas/{}", id), update).await
    }

    /// Appointment, then its animal, then that animal's adopter
    pub async fn appointment_details(&self, id: &str) -> Result<AppointmentDetails> {
        let appointment = self.get_appointment(id).await?;

        let animal = match appointment.animal_ref() {
            Some(animal_id) => Some(self.get_animal(animal_id).await?),
            None => {
                debug!(appointment = id, "appointment has no animal reference");
                None
            }
        };

        let adopter = match animal.as_ref().and_then(|a| a.adopter_id.as_deref()) {
            Some(adopter_id) => Some(self.get_adopter(adopter_id).await?),
            None => None,
        };

        Ok(AppointmentDetails {
            appointment,
            animal,
            adopter,
        })
    }
}

// Vaccinations and health records
impl ApiClient {
    pub async fn vaccinations_for_animal(&self, animal_id: &str) -> Result<Vec<Vaccination>> {
        self.get(&format!("/vacunas/animal/{}", animal_id)).await
    }

    pub async fn create_vaccination(&self, vaccination: &NewVaccination) -> Result<()> {
        self.post_unit("/vacunas", vaccination).await
    }

    pub async fn health_records(&self) -> Result<Vec<HealthRecord>> {
        self.get("/registro-salud").await
    }
}

// Profile of the signed-in user
impl ApiClient {
    pub async fn get_profile(&self) -> Result<UserProfile> {
        let user_id = self.current_user_id()?;
        self.get(&format!("/usuarios/{}", user_id)).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let user_id = self.current_user_id()?;
        self.put_unit(&format!("/usuarios/{}", user_id), update).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        let user_id = self.current_user_id()?;
        self.put_unit(&format!("/usuarios/{}/cambiar-contrasena", user_id), change)
            .await
    }
}
