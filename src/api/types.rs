use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::{CachedProfile, Session};

/// Identifiers arrive as JSON strings or numbers; both become `String`
pub(crate) mod flexible_id {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    impl RawId {
        fn into_string(self) -> String {
            match self {
                Self::Text(s) => s,
                Self::Unsigned(n) => n.to_string(),
                Self::Signed(n) => n.to_string(),
            }
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(RawId::into_string)
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Option::<RawId>::deserialize(d).map(|raw| raw.map(RawId::into_string))
    }
}

/// Ages are numbers on the wire but some clients stored them as strings
fn flexible_age<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Number(u32),
        Text(String),
    }

    match RawAge::deserialize(d)? {
        RawAge::Number(n) => Ok(n),
        RawAge::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeUnit {
    #[default]
    #[serde(rename = "años")]
    Years,
    #[serde(rename = "meses")]
    Months,
}

impl FromStr for AgeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "years" | "year" | "y" | "años" | "anos" => Ok(Self::Years),
            "months" | "month" | "m" | "meses" => Ok(Self::Months),
            other => Err(format!("unknown age unit '{}' (use years or months)", other)),
        }
    }
}

impl fmt::Display for AgeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years => f.write_str("years"),
            Self::Months => f.write_str("months"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie", default)]
    pub species: String,
    #[serde(rename = "edad", default, deserialize_with = "flexible_age")]
    pub age: u32,
    #[serde(rename = "unidadEdad", default)]
    pub age_unit: AgeUnit,
    #[serde(rename = "estadoSalud", default)]
    pub health_status: String,
    #[serde(
        rename = "adoptanteId",
        default,
        deserialize_with = "flexible_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub adopter_id: Option<String>,
}

/// Body of `POST /animales` and `PUT /animales/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie")]
    pub species: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "unidadEdad")]
    pub age_unit: AgeUnit,
    #[serde(rename = "estadoSalud")]
    pub health_status: String,
    #[serde(rename = "adoptanteId")]
    pub adopter_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adopter {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
}

/// Body of `POST /adoptantes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdopterPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
}

/// Animal fields embedded in some appointment listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalSummary {
    #[serde(default, deserialize_with = "flexible_id::optional")]
    pub id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(
        rename = "animalId",
        default,
        deserialize_with = "flexible_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub animal_id: Option<String>,
    /// ISO-8601 date-time as sent by the server
    #[serde(rename = "fechaCita")]
    pub scheduled_at: String,
    #[serde(rename = "motivo", default)]
    pub reason: String,
    #[serde(rename = "veterinario", default)]
    pub veterinarian: String,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal: Option<AnimalSummary>,
}

impl Appointment {
    /// `YYYY-MM-DD` part of the scheduled date-time
    pub fn date(&self) -> &str {
        self.scheduled_at
            .split_once('T')
            .map(|(date, _)| date)
            .unwrap_or(&self.scheduled_at)
    }

    /// `HH:MM` part of the scheduled date-time, if there is one
    pub fn time(&self) -> Option<&str> {
        let (_, rest) = self.scheduled_at.split_once('T')?;
        rest.get(..5)
    }

    /// Animal id from the flat field or the embedded summary
    pub fn animal_ref(&self) -> Option<&str> {
        self.animal_id
            .as_deref()
            .or_else(|| self.animal.as_ref().and_then(|a| a.id.as_deref()))
    }
}

/// Body of `POST /citas`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointment {
    #[serde(rename = "animalId")]
    pub animal_id: String,
    #[serde(rename = "fechaCita")]
    pub scheduled_at: String,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "veterinario")]
    pub veterinarian: String,
}

/// Body of `PUT /citas/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentUpdate {
    #[serde(rename = "fechaCita")]
    pub scheduled_at: String,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "veterinario")]
    pub veterinarian: String,
    #[serde(rename = "estado")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccination {
    #[serde(
        default,
        deserialize_with = "flexible_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fechaAplicacion")]
    pub applied_on: String,
    #[serde(
        rename = "animalId",
        default,
        deserialize_with = "flexible_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub animal_id: Option<String>,
}

/// Body of `POST /vacunas`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVaccination {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fechaAplicacion")]
    pub applied_on: String,
    #[serde(rename = "animalId")]
    pub animal_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(
        rename = "animalId",
        default,
        deserialize_with = "flexible_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub animal_id: Option<String>,
    #[serde(rename = "fechaConsulta", default)]
    pub consulted_on: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "veterinario", default)]
    pub veterinarian: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "fotoPerfilUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserProfile {
    pub fn to_cache(&self) -> CachedProfile {
        CachedProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }
}

/// Body of `PUT /usuarios/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "direccion")]
    pub address: String,
}

/// Body of `PUT /usuarios/{id}/cambiar-contrasena`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChange {
    #[serde(rename = "passwordActual")]
    pub current: String,
    #[serde(rename = "nuevaPassword")]
    pub new: String,
}

/// Body of the login request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Body of `POST /usuarios/registro`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// What the server hands back after a successful login
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "userId", default, deserialize_with = "flexible_id::optional")]
    pub user_id: Option<String>,
    #[serde(default, alias = "accessToken")]
    pub token: Option<String>,
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Session::new(resp.user_id, resp.token)
    }
}

/// Animal with its appointments and vaccinations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalHistory {
    pub animal: Animal,
    pub appointments: Vec<Appointment>,
    pub vaccinations: Vec<Vaccination>,
}

/// Appointment with the animal it is for and that animal's adopter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub animal: Option<Animal>,
    pub adopter: Option<Adopter>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_numeric_ids_become_strings() {
        let animal: Animal = serde_json::from_value(json!({
            "id": 7,
            "nombre": "Luna",
            "especie": "perro",
            "edad": "3",
            "unidadEdad": "meses",
            "estadoSalud": "sana",
            "adoptanteId": 12
        }))
        .unwrap();

        assert_eq!(animal.id, "7");
        assert_eq!(animal.age, 3);
        assert_eq!(animal.age_unit, AgeUnit::Months);
        assert_eq!(animal.adopter_id.as_deref(), Some("12"));
    }

    #[test]
    fn test_auth_response_into_session() {
        let resp: AuthResponse =
            serde_json::from_value(json!({ "userId": 42, "token": "abc" })).unwrap();
        let session: Session = resp.into();
        assert_eq!(session, Session::new(Some("42".into()), Some("abc".into())));

        let bare: AuthResponse = serde_json::from_value(json!({ "userId": null })).unwrap();
        assert!(!Session::from(bare).is_present());
    }

    #[test]
    fn test_appointment_date_and_time() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": "1",
            "fechaCita": "2024-05-01T09:30:00",
            "motivo": "control",
            "animal": { "id": 3, "nombre": "Toby" }
        }))
        .unwrap();

        assert_eq!(appt.date(), "2024-05-01");
        assert_eq!(appt.time(), Some("09:30"));
        assert_eq!(appt.animal_ref(), Some("3"));
        assert_eq!(appt.veterinarian, "");
    }

    #[test]
    fn test_login_request_wire_shape() {
        let body = serde_json::to_value(LoginRequest {
            username: None,
            email: "a@b.com".into(),
            password: "secret".into(),
        })
        .unwrap();
        assert_eq!(body, json!({ "email": "a@b.com", "contrasena": "secret" }));
    }

    #[test]
    fn test_age_unit_parsing() {
        assert_eq!("Years".parse::<AgeUnit>(), Ok(AgeUnit::Years));
        assert_eq!("meses".parse::<AgeUnit>(), Ok(AgeUnit::Months));
        assert!("weeks".parse::<AgeUnit>().is_err());
    }
}
