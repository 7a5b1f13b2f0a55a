use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::constants::DEFAULT_VACCINE_NAME;
use crate::forms::{
    AdopterForm, AnimalForm, AppointmentForm, LoginForm, PasswordChangeForm, ProfileForm,
    RegisterForm, VaccinationForm,
};

#[derive(Parser, Debug)]
#[command(name = "shelter")]
#[command(version)]
#[command(about = "Animal shelter client: animals, adopters, appointments and vaccinations", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Backend base URL (overrides api.base_url)
    #[arg(long, env = "SHELTER_API_URL")]
    pub api_url: Option<String>,

    /// Keep the session in memory only; nothing is written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Show configuration and session status
    Status,
    /// Open the interactive interface (default)
    Ui,
    /// Log in and remember the session
    Login(LoginArgs),
    /// Create an account
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Manage animals
    #[command(subcommand)]
    Animals(AnimalCommand),
    /// Manage adopters
    #[command(subcommand)]
    Adopters(AdopterCommand),
    /// Manage veterinary appointments
    #[command(subcommand)]
    Appointments(AppointmentCommand),
    /// Vaccination records of an animal
    #[command(subcommand)]
    Vaccines(VaccineCommand),
    /// List health records
    HealthRecords,
    /// Your user profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginArgs {
    #[arg(short, long, default_value = "")]
    pub email: String,
    #[arg(short, long, env = "SHELTER_PASSWORD", hide_env_values = true, default_value = "")]
    pub password: String,
    /// Optional user name sent along with the credentials
    #[arg(short, long)]
    pub username: Option<String>,
}

impl From<&LoginArgs> for LoginForm {
    fn from(args: &LoginArgs) -> Self {
        Self {
            username: args.username.clone(),
            email: args.email.clone(),
            password: args.password.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RegisterArgs {
    #[arg(short, long, default_value = "")]
    pub name: String,
    #[arg(short, long, default_value = "")]
    pub email: String,
    #[arg(short, long, default_value = "")]
    pub address: String,
    #[arg(short, long, default_value = "")]
    pub password: String,
    /// Repeat the password
    #[arg(long, default_value = "")]
    pub confirm_password: String,
}

impl From<&RegisterArgs> for RegisterForm {
    fn from(args: &RegisterArgs) -> Self {
        Self {
            name: args.name.clone(),
            email: args.email.clone(),
            address: args.address.clone(),
            password: args.password.clone(),
            confirm_password: args.confirm_password.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AnimalCommand {
    /// List all animals
    List,
    /// Show one animal
    Show { id: String },
    /// Register a new animal
    Add(AnimalArgs),
    /// Change an animal; fields not given keep their value
    Edit {
        id: String,
        #[command(flatten)]
        changes: AnimalChanges,
    },
    /// Delete an animal
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },
    /// Animal with its appointments and vaccinations
    History { id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnimalArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub species: String,
    #[arg(long, default_value = "")]
    pub age: String,
    /// years or months
    #[arg(long, default_value = "years")]
    pub age_unit: String,
    #[arg(long, default_value = "")]
    pub health_status: String,
    /// Id of the adopter
    #[arg(long, default_value = "")]
    pub adopter: String,
}

impl From<&AnimalArgs> for AnimalForm {
    fn from(args: &AnimalArgs) -> Self {
        Self {
            name: args.name.clone(),
            species: args.species.clone(),
            age: args.age.clone(),
            age_unit: args.age_unit.clone(),
            health_status: args.health_status.clone(),
            adopter_id: args.adopter.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnimalChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub species: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub age_unit: Option<String>,
    #[arg(long)]
    pub health_status: Option<String>,
    #[arg(long)]
    pub adopter: Option<String>,
}

impl AnimalChanges {
    pub fn apply(&self, form: &mut AnimalForm) {
        let fields = [
            (&self.name, &mut form.name),
            (&self.species, &mut form.species),
            (&self.age, &mut form.age),
            (&self.age_unit, &mut form.age_unit),
            (&self.health_status, &mut form.health_status),
            (&self.adopter, &mut form.adopter_id),
        ];
        for (change, field) in fields {
            if let Some(value) = change {
                *field = value.clone();
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AdopterCommand {
    /// List all adopters
    List,
    /// Show one adopter
    Show { id: String },
    /// Add an adopter
    Add(AdopterArgs),
    /// Delete an adopter
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct AdopterArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

impl From<&AdopterArgs> for AdopterForm {
    fn from(args: &AdopterArgs) -> Self {
        Self {
            name: args.name.clone(),
            email: args.email.clone(),
            address: args.address.clone(),
            phone: args.phone.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AppointmentCommand {
    /// List all appointments
    List,
    /// Appointment with its animal and adopter
    Show { id: String },
    /// Schedule an appointment
    Schedule(AppointmentArgs),
    /// Change an appointment; fields not given keep their value
    Edit {
        id: String,
        /// YYYY-MM-DD HH:MM
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        veterinarian: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Appointments grouped by day
    Calendar,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AppointmentArgs {
    /// Id of the animal
    #[arg(long, default_value = "")]
    pub animal: String,
    /// YYYY-MM-DD HH:MM
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub reason: String,
    #[arg(long, default_value = "")]
    pub veterinarian: String,
}

impl From<&AppointmentArgs> for AppointmentForm {
    fn from(args: &AppointmentArgs) -> Self {
        Self {
            animal_id: args.animal.clone(),
            date: args.date.clone(),
            reason: args.reason.clone(),
            veterinarian: args.veterinarian.clone(),
            status: None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum VaccineCommand {
    /// Vaccinations of an animal
    List { animal: String },
    /// Record a vaccination
    Add(VaccineArgs),
}

#[derive(Args, Debug, Clone)]
pub struct VaccineArgs {
    pub animal: String,
    /// Vaccine name, or "custom" together with --custom-name
    #[arg(long, default_value = DEFAULT_VACCINE_NAME)]
    pub name: String,
    #[arg(long)]
    pub custom_name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub date: String,
}

impl From<&VaccineArgs> for VaccinationForm {
    fn from(args: &VaccineArgs) -> Self {
        Self {
            animal_id: args.animal.clone(),
            name: args.name.clone(),
            custom_name: args.custom_name.clone(),
            applied_on: args.date.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show your profile
    Show,
    /// Update name, email and address
    Update {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Change your password
    Password {
        #[arg(long, default_value = "")]
        current: String,
        #[arg(long = "new", default_value = "")]
        new_password: String,
    },
}

impl ProfileCommand {
    pub fn profile_form(&self) -> Option<ProfileForm> {
        match self {
            Self::Update {
                name,
                email,
                address,
            } => Some(ProfileForm {
                name: name.clone(),
                email: email.clone(),
                address: address.clone(),
            }),
            _ => None,
        }
    }

    pub fn password_form(&self) -> Option<PasswordChangeForm> {
        match self {
            Self::Password {
                current,
                new_password,
            } => Some(PasswordChangeForm {
                current: current.clone(),
                new: new_password.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
