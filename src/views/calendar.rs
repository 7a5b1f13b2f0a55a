use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::api::{Animal, Appointment};

/// One appointment as listed under its day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaItem {
    pub appointment_id: String,
    pub title: String,
    pub veterinarian: String,
    pub time: Option<String>,
}

/// Appointments keyed by `YYYY-MM-DD`, days in ascending order
pub type Agenda = BTreeMap<String, Vec<AgendaItem>>;

/// Group appointments by day, each day ordered by time
///
/// The title is `"<animal> - <reason>"`. The animal name comes from the
/// appointment itself, then from `animals`, then falls back to `#<id>`.
pub fn build_agenda(appointments: &[Appointment], animals: &[Animal]) -> Agenda {
    let names: HashMap<&str, &str> = animals
        .iter()
        .map(|a| (a.id.as_str(), a.name.as_str()))
        .collect();

    let mut agenda = Agenda::new();
    for appointment in appointments {
        let animal = appointment
            .animal
            .as_ref()
            .map(|a| a.name.clone())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                appointment
                    .animal_ref()
                    .and_then(|id| names.get(id))
                    .map(|name| name.to_string())
            })
            .unwrap_or_else(|| format!("#{}", appointment.animal_ref().unwrap_or("?")));

        agenda
            .entry(appointment.date().to_string())
            .or_default()
            .push(AgendaItem {
                appointment_id: appointment.id.clone(),
                title: format!("{} - {}", animal, appointment.reason),
                veterinarian: appointment.veterinarian.clone(),
                time: appointment.time().map(str::to_string),
            });
    }

    for items in agenda.values_mut() {
        items.sort_by(|a, b| a.time.cmp(&b.time));
    }
    agenda
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn appointment(value: serde_json::Value) -> Appointment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grouped_by_day_and_sorted_by_time() {
        let appointments = vec![
            appointment(json!({
                "id": 1, "fechaCita": "2024-05-02T15:00:00", "motivo": "vacuna",
                "veterinario": "Dr. Ruiz", "animal": { "id": 3, "nombre": "Toby" }
            })),
            appointment(json!({
                "id": 2, "fechaCita": "2024-05-01T11:30:00", "motivo": "control",
                "veterinario": "Dra. Paz", "animalId": 7
            })),
            appointment(json!({
                "id": 3, "fechaCita": "2024-05-01T09:00:00", "motivo": "cirugía",
                "veterinario": "Dra. Paz", "animalId": 8
            })),
        ];
        let animals: Vec<Animal> =
            serde_json::from_value(json!([{ "id": 7, "nombre": "Luna" }])).unwrap();

        let agenda = build_agenda(&appointments, &animals);

        let days: Vec<_> = agenda.keys().cloned().collect();
        assert_eq!(days, vec!["2024-05-01", "2024-05-02"]);

        let first_day: Vec<_> = agenda["2024-05-01"].iter().map(|i| i.title.as_str()).collect();
        assert_eq!(first_day, vec!["#8 - cirugía", "Luna - control"]);
        assert_eq!(agenda["2024-05-01"][0].time.as_deref(), Some("09:00"));
        assert_eq!(agenda["2024-05-02"][0].title, "Toby - vacuna");
    }

    #[test]
    fn test_empty_agenda() {
        assert!(build_agenda(&[], &[]).is_empty());
    }
}
