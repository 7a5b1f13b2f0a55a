use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::{
    app::{get_config_dir, init_config, AppState},
    constants::{CONFIG_FILE_NAME, LOCAL_CONFIG_DIR},
    forms::{AnimalForm, AppointmentForm},
    nav::{Root, Route},
    utils::{Result, ShelterError, ValidationError},
    views::{build_agenda, format},
};

use super::args::{
    AdopterCommand, AnimalCommand, AppointmentCommand, Commands, OutputFormat, ProfileCommand,
    VaccineCommand,
};

/// What the caller should do once a command has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Finished; exit normally
    Done,
    /// Finished with an error that was already reported
    Failed,
    /// Mount the interactive interface
    Ui,
}

/// Screen a command stands for, used to check it against the current root
pub fn target_route(command: &Commands) -> Option<Route> {
    let route = match command {
        Commands::Init | Commands::Status | Commands::Ui => return None,
        Commands::Login(_) => Route::Login,
        Commands::Register(_) => Route::Register,
        Commands::Logout => Route::Logout,
        Commands::Animals(cmd) => match cmd {
            AnimalCommand::List | AnimalCommand::Delete { .. } => Route::Dashboard,
            AnimalCommand::Add(_) => Route::RegisterAnimal,
            AnimalCommand::Edit { id, .. } => Route::EditAnimal { id: id.clone() },
            AnimalCommand::Show { id } | AnimalCommand::History { id } => {
                Route::AnimalHistory { id: id.clone() }
            }
        },
        Commands::Adopters(_) => Route::Adopters,
        Commands::Appointments(cmd) => match cmd {
            AppointmentCommand::List | AppointmentCommand::Calendar => Route::Calendar,
            AppointmentCommand::Show { id } => Route::AppointmentDetails { id: id.clone() },
            AppointmentCommand::Schedule(_) => Route::ScheduleAppointment,
            AppointmentCommand::Edit { id, .. } => Route::EditAppointment { id: id.clone() },
        },
        Commands::Vaccines(cmd) => match cmd {
            VaccineCommand::List { animal } => Route::AnimalVaccines { id: animal.clone() },
            VaccineCommand::Add(args) => Route::AnimalVaccines {
                id: args.animal.clone(),
            },
        },
        Commands::HealthRecords => Route::HealthRecords,
        Commands::Profile(_) => Route::Profile,
    };
    Some(route)
}

/// Handle CLI subcommands
///
/// Failures are reported through the state's notifier and come back as
/// [`CommandOutcome::Failed`].
pub async fn handle_command(
    command: &Commands,
    state: &AppState,
    output: OutputFormat,
) -> anyhow::Result<CommandOutcome> {
    match command {
        Commands::Init => {
            let (path, created) = init_config()?;
            if created {
                state
                    .notifier
                    .success("Configuration", &format!("written to {}", path.display()));
            } else {
                state
                    .notifier
                    .info("Configuration", &format!("already exists at {}", path.display()));
            }
            return Ok(CommandOutcome::Done);
        }
        Commands::Status => {
            show_status(state).await;
            return Ok(CommandOutcome::Done);
        }
        Commands::Ui => return Ok(CommandOutcome::Ui),
        _ => {}
    }

    if let Some(route) = target_route(command) {
        let root = state.gate.root();
        if let Err(e) = check_admitted(root, &route) {
            state.notifier.report_error(&e);
            return Ok(CommandOutcome::Failed);
        }
        debug!(route = %route, "command admitted");
    }

    match run(command, state, output).await {
        Ok(()) => Ok(CommandOutcome::Done),
        Err(e) => {
            state.notifier.report_error(&e);
            Ok(CommandOutcome::Failed)
        }
    }
}

fn check_admitted(root: Root, route: &Route) -> Result<()> {
    if root.admits(route) {
        return Ok(());
    }
    let message = match root {
        Root::Authenticated => "You are already logged in. Run `shelter logout` first.",
        Root::Auth | Root::Splash => "You are not logged in. Run `shelter login` first.",
    };
    Err(ShelterError::Session(message.to_string()))
}

async fn run(command: &Commands, state: &AppState, output: OutputFormat) -> Result<()> {
    let api = &state.api;
    let notifier = &state.notifier;

    match command {
        Commands::Login(args) => {
            state.auth.login(&args.into()).await?;
            let who = state
                .gate
                .cached_profile()
                .await
                .map(|p| p.name)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| args.email.trim().to_string());
            notifier.success("Welcome", &format!("logged in as {}", who));
        }
        Commands::Register(args) => {
            state.auth.register(&args.into()).await?;
            notifier.success("Account created", "You can log in now.");
        }
        Commands::Logout => {
            state.auth.logout().await?;
            notifier.success("Logged out", "Session cleared.");
        }
        Commands::Animals(cmd) => match cmd {
            AnimalCommand::List => {
                let animals = api.list_animals().await?;
                emit(output, &animals, |list| lines(list, format::animal_line))?;
            }
            AnimalCommand::Show { id } => {
                let animal = api.get_animal(id).await?;
                emit(output, &animal, format::animal_detail)?;
            }
            AnimalCommand::Add(args) => {
                let payload = AnimalForm::from(args).validate()?;
                api.create_animal(&payload).await?;
                notifier.success("Saved", &format!("{} registered", payload.name));
            }
            AnimalCommand::Edit { id, changes } => {
                let mut form = AnimalForm::from(&api.get_animal(id).await?);
                changes.apply(&mut form);
                let payload = form.validate()?;
                api.update_animal(id, &payload).await?;
                notifier.success("Saved", &format!("{} updated", payload.name));
            }
            AnimalCommand::Delete { id, yes } => {
                confirm(*yes, "animal")?;
                api.delete_animal(id).await?;
                notifier.success("Deleted", &format!("animal #{} removed", id));
            }
            AnimalCommand::History { id } => {
                let history = api.animal_history(id).await?;
                emit(output, &history, format::animal_history)?;
            }
        },
        Commands::Adopters(cmd) => match cmd {
            AdopterCommand::List => {
                let adopters = api.list_adopters().await?;
                emit(output, &adopters, |list| lines(list, format::adopter_line))?;
            }
            AdopterCommand::Show { id } => {
                let adopter = api.get_adopter(id).await?;
                emit(output, &adopter, format::adopter_detail)?;
            }
            AdopterCommand::Add(args) => {
                let payload = crate::forms::AdopterForm::from(args).validate()?;
                api.create_adopter(&payload).await?;
                notifier.success("Saved", &format!("{} added", payload.name));
            }
            AdopterCommand::Delete { id, yes } => {
                confirm(*yes, "adopter")?;
                api.delete_adopter(id).await?;
                notifier.success("Deleted", &format!("adopter #{} removed", id));
            }
        },
        Commands::Appointments(cmd) => match cmd {
            AppointmentCommand::List => {
                let appointments = api.list_appointments().await?;
                emit(output, &appointments, |list| {
                    lines(list, format::appointment_line)
                })?;
            }
            AppointmentCommand::Show { id } => {
                let details = api.appointment_details(id).await?;
                emit(output, &details, format::appointment_details)?;
            }
            AppointmentCommand::Schedule(args) => {
                let payload = AppointmentForm::from(args).validate()?;
                api.create_appointment(&payload).await?;
                notifier.success("Scheduled", &format!("appointment on {}", payload.scheduled_at));
            }
            AppointmentCommand::Edit {
                id,
                date,
                reason,
                veterinarian,
                status,
            } => {
                let mut form = AppointmentForm::from(&api.get_appointment(id).await?);
                if let Some(date) = date {
                    form.date = date.clone();
                }
                if let Some(reason) = reason {
                    form.reason = reason.clone();
                }
                if let Some(veterinarian) = veterinarian {
                    form.veterinarian = veterinarian.clone();
                }
                if status.is_some() {
                    form.status = status.clone();
                }
                let update = form.validate_update()?;
                api.update_appointment(id, &update).await?;
                notifier.success("Saved", &format!("appointment #{} updated", id));
            }
            AppointmentCommand::Calendar => {
                let (appointments, animals) =
                    futures::try_join!(api.list_appointments(), api.list_animals())?;
                let agenda = build_agenda(&appointments, &animals);
                emit(output, &agenda, format::agenda)?;
            }
        },
        Commands::Vaccines(cmd) => match cmd {
            VaccineCommand::List { animal } => {
                let vaccinations = api.vaccinations_for_animal(animal).await?;
                emit(output, &vaccinations, |list| {
                    lines(list, format::vaccination_line)
                })?;
            }
            VaccineCommand::Add(args) => {
                let payload = crate::forms::VaccinationForm::from(args).validate()?;
                api.create_vaccination(&payload).await?;
                notifier.success("Saved", &format!("{} recorded", payload.name));
            }
        },
        Commands::HealthRecords => {
            let records = api.health_records().await?;
            emit(output, &records, |list| lines(list, format::health_record_line))?;
        }
        Commands::Profile(cmd) => match cmd {
            ProfileCommand::Show => {
                let profile = api.get_profile().await?;
                emit(output, &profile, format::profile_detail)?;
            }
            ProfileCommand::Update { .. } => {
                if let Some(form) = cmd.profile_form() {
                    let profile = state.auth.update_profile(&form).await?;
                    notifier.success("Saved", &format!("profile of {} updated", profile.name));
                }
            }
            ProfileCommand::Password { .. } => {
                if let Some(form) = cmd.password_form() {
                    api.change_password(&form.validate()?).await?;
                    notifier.success("Saved", "Password changed.");
                }
            }
        },
        Commands::Init | Commands::Status | Commands::Ui => {}
    }
    Ok(())
}

fn confirm(yes: bool, what: &'static str) -> Result<()> {
    if yes {
        return Ok(());
    }
    Err(ValidationError::Invalid {
        field: what,
        reason: "deletion needs --yes to confirm".to_string(),
    }
    .into())
}

/// Print a result as text or JSON
fn emit<T: Serialize + ?Sized>(
    output: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            let out = text(value);
            if out.trim().is_empty() {
                println!("{}", "(nothing to show)".dimmed());
            } else {
                print!("{}", out);
                if !out.ends_with('\n') {
                    println!();
                }
            }
        }
    }
    Ok(())
}

fn lines<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    items.iter().map(|item| format!("{}\n", line(item))).collect()
}

/// Show configuration and session status
async fn show_status(state: &AppState) {
    println!("{}", "Shelter Status:".bold());
    println!();

    println!("  API:      {}", state.api.base_url());

    match get_config_dir() {
        Ok(dir) => {
            let global = dir.join(CONFIG_FILE_NAME);
            if global.exists() {
                println!("  [OK] Configuration: {}", global.display());
            } else {
                println!("  [WARNING] Configuration: Not found (using defaults)");
            }
        }
        Err(e) => println!("  [ERROR] Configuration: {}", e),
    }
    let local = std::path::Path::new(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME);
    if local.exists() {
        println!("  [OK] Local override: {}", local.display());
    }

    match state.gate.state().session() {
        Some(session) => {
            println!(
                "  [OK] Session: logged in (user {})",
                session.user_id().unwrap_or("unknown").green()
            );
            if let Some(profile) = state.gate.cached_profile().await {
                println!("      {} <{}>", profile.name, profile.email);
            }
        }
        None => println!("  [WARNING] Session: not logged in"),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::LoginArgs;

    #[test]
    fn test_session_commands_need_authenticated_root() {
        let list = target_route(&Commands::Animals(AnimalCommand::List)).unwrap();
        assert!(check_admitted(Root::Auth, &list).is_err());
        assert!(check_admitted(Root::Authenticated, &list).is_ok());
    }

    #[test]
    fn test_login_only_from_auth_root() {
        let login = target_route(&Commands::Login(LoginArgs::default())).unwrap();
        assert_eq!(login, Route::Login);
        assert!(check_admitted(Root::Auth, &login).is_ok());
        assert!(check_admitted(Root::Authenticated, &login).is_err());
    }

    #[test]
    fn test_local_commands_are_not_gated() {
        assert_eq!(target_route(&Commands::Status), None);
        assert_eq!(target_route(&Commands::Init), None);
    }
}
