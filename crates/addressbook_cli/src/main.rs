//! Address-book command-line front end.
//!
//! # Responsibility
//! - Resolve the connection descriptor from flags, env or settings file.
//! - Call the contact store and render its outcomes as status lines.

use addressbook_core::{
    default_log_level, init_logging, AppSettings, Contact, ContactService, SqliteContactStore,
    StoreError,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod report;

#[derive(Debug, Parser)]
#[command(name = "addressbook")]
#[command(about = "Address book contact store", long_about = None)]
struct Cli {
    /// Connection descriptor; overrides the settings file.
    #[arg(long, env = "ADDRESSBOOK_CONNECTION")]
    connection: Option<String>,

    /// JSON settings file holding `ConnectionStrings`.
    #[arg(long, env = "ADDRESSBOOK_SETTINGS", default_value = "appsettings.json")]
    settings: PathBuf,

    /// Connection string name inside the settings file.
    #[arg(long, default_value = addressbook_core::DEFAULT_CONNECTION_NAME)]
    connection_name: String,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the AddressBook table if missing
    Init,
    /// Add one contact
    Add(ContactArgs),
    /// Add every contact from a JSON array file
    Import { file: PathBuf },
    /// Replace all fields of the contact with the given id
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        contact: ContactArgs,
    },
    /// Delete every contact with the given name
    Delete {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// List all contacts
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct ContactArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value_t = 0)]
    zip: i64,
    #[arg(long, default_value_t = 0)]
    phone_number: i64,
    #[arg(long, default_value = "")]
    email: String,
}

impl ContactArgs {
    fn into_contact(self, id: i64) -> Contact {
        Contact {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            phone_number: self.phone_number,
            email: self.email,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let service = match open_service(&cli) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&service, cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn open_service(
    cli: &Cli,
) -> Result<ContactService<SqliteContactStore>, Box<dyn std::error::Error>> {
    let descriptor = match &cli.connection {
        Some(descriptor) => descriptor.clone(),
        None => AppSettings::load(&cli.settings)?
            .connection_string(&cli.connection_name)?
            .to_string(),
    };
    let store = SqliteContactStore::open(&descriptor)?;
    Ok(ContactService::new(store))
}

fn run(
    service: &ContactService<SqliteContactStore>,
    command: Commands,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Commands::Init => {
            let status = service.ensure_table()?;
            println!("{}", report::table_status_line(status));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Add(args) => {
            let contact = args.into_contact(0);
            let outcome = service.add_contact(&contact);
            Ok(report::print_added(&contact, outcome))
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let contacts: Vec<Contact> = serde_json::from_str(&raw)?;
            let summary = service.add_contacts(&contacts);
            Ok(report::print_bulk_insert(&summary))
        }
        Commands::Update { id, contact } => {
            let contact = contact.into_contact(id);
            let outcome = service.update_contact(&contact);
            Ok(report::print_update(id, outcome))
        }
        Commands::Delete {
            first_name,
            last_name,
        } => {
            let outcome = service.delete_contact(&first_name, &last_name);
            Ok(report::print_delete(&first_name, &last_name, outcome))
        }
        Commands::List { json } => {
            let contacts = service.list_contacts().map_err(|err: StoreError| {
                format!("problem occurred while retrieving contacts: {err}")
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contacts)?);
            } else {
                report::print_contacts(&contacts);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
