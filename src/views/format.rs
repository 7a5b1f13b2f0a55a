use std::fmt::Write;

use super::calendar::Agenda;
use crate::api::{
    Adopter, Animal, AnimalHistory, Appointment, AppointmentDetails, HealthRecord, UserProfile,
    Vaccination,
};

const NONE: &str = "-";

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        NONE
    } else {
        value
    }
}

pub fn animal_line(animal: &Animal) -> String {
    format!(
        "#{:<5} {:<16} {:<10} {} {}",
        animal.id,
        animal.name,
        or_dash(&animal.species),
        animal.age,
        animal.age_unit
    )
}

pub fn animal_detail(animal: &Animal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", animal.name, animal.id);
    let _ = writeln!(out, "  Species:  {}", or_dash(&animal.species));
    let _ = writeln!(out, "  Age:      {} {}", animal.age, animal.age_unit);
    let _ = writeln!(out, "  Health:   {}", or_dash(&animal.health_status));
    let _ = writeln!(out, "  Adopter:  {}", animal.adopter_id.as_deref().unwrap_or(NONE));
    out
}

pub fn adopter_line(adopter: &Adopter) -> String {
    format!(
        "#{:<5} {:<20} {:<24} {}",
        adopter.id,
        adopter.name,
        or_dash(&adopter.email),
        or_dash(&adopter.phone)
    )
}

pub fn adopter_detail(adopter: &Adopter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", adopter.name, adopter.id);
    let _ = writeln!(out, "  Email:    {}", or_dash(&adopter.email));
    let _ = writeln!(out, "  Address:  {}", or_dash(&adopter.address));
    let _ = writeln!(out, "  Phone:    {}", or_dash(&adopter.phone));
    out
}

pub fn appointment_line(appointment: &Appointment) -> String {
    format!(
        "#{:<5} {} {}  {:<20} {}",
        appointment.id,
        appointment.date(),
        appointment.time().unwrap_or("--:--"),
        appointment.reason,
        or_dash(&appointment.veterinarian)
    )
}

pub fn appointment_details(details: &AppointmentDetails) -> String {
    let appointment = &details.appointment;
    let mut out = String::new();
    let _ = writeln!(out, "Appointment #{}", appointment.id);
    let _ = writeln!(
        out,
        "  When:         {} {}",
        appointment.date(),
        appointment.time().unwrap_or("")
    );
    let _ = writeln!(out, "  Reason:       {}", or_dash(&appointment.reason));
    let _ = writeln!(out, "  Veterinarian: {}", or_dash(&appointment.veterinarian));
    let _ = writeln!(
        out,
        "  Status:       {}",
        appointment.status.as_deref().unwrap_or(NONE)
    );

    match &details.animal {
        Some(animal) => {
            let _ = writeln!(out, "\nAnimal");
            let _ = write!(out, "{}", indent(&animal_detail(animal)));
        }
        None => {
            let _ = writeln!(out, "\nAnimal: {}", NONE);
        }
    }
    if let Some(adopter) = &details.adopter {
        let _ = writeln!(out, "\nAdopter");
        let _ = write!(out, "{}", indent(&adopter_detail(adopter)));
    }
    out
}

pub fn vaccination_line(vaccination: &Vaccination) -> String {
    format!("{}  {}", vaccination.applied_on, vaccination.name)
}

pub fn health_record_line(record: &HealthRecord) -> String {
    format!(
        "#{:<5} {}  animal {}  {}  ({})",
        record.id,
        or_dash(&record.consulted_on),
        record.animal_id.as_deref().unwrap_or(NONE),
        or_dash(&record.description),
        or_dash(&record.veterinarian)
    )
}

pub fn animal_history(history: &AnimalHistory) -> String {
    let mut out = animal_detail(&history.animal);

    let _ = writeln!(out, "\nAppointments ({})", history.appointments.len());
    for appointment in &history.appointments {
        let _ = writeln!(out, "  {}", appointment_line(appointment));
    }

    let _ = writeln!(out, "\nVaccinations ({})", history.vaccinations.len());
    for vaccination in &history.vaccinations {
        let _ = writeln!(out, "  {}", vaccination_line(vaccination));
    }
    out
}

pub fn profile_detail(profile: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", or_dash(&profile.name), profile.id);
    let _ = writeln!(out, "  Email:    {}", or_dash(&profile.email));
    let _ = writeln!(out, "  Address:  {}", or_dash(&profile.address));
    if !profile.roles.is_empty() {
        let _ = writeln!(out, "  Roles:    {}", profile.roles.join(", "));
    }
    out
}

pub fn agenda(agenda: &Agenda) -> String {
    let mut out = String::new();
    for (day, items) in agenda {
        let _ = writeln!(out, "{}", day);
        for item in items {
            let _ = writeln!(
                out,
                "  {}  {:<30} {}",
                item.time.as_deref().unwrap_or("--:--"),
                item.title,
                or_dash(&item.veterinarian)
            );
        }
    }
    out
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {}\n", line)).collect()
}
