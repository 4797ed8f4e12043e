//! Terminal front end for the contact book.
//!
//! # Responsibility
//! - Drive the same add/list/search/favourite/update/delete flows the mobile
//!   screens use, against a local database file.
//! - Keep output line-oriented so it can be piped or diffed.

use clap::{Args, Parser, Subcommand};
use contactbook_core::db::open_db;
use contactbook_core::{
    default_log_level, init_logging, Contact, ContactId, ContactInput, ContactService, RepoError,
    SqliteContactRepository, WriteOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contactbook", version, about = "Manage the local contact book")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "CONTACTBOOK_DB_PATH", default_value = "Contact.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "CONTACTBOOK_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a contact.
    Add(ContactArgs),
    /// List contacts in insertion order.
    List {
        /// Only favourites.
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive name filter.
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },
    /// Show one contact.
    Show { id: ContactId },
    /// Replace fields of a contact; omitted flags keep current values.
    Update {
        id: ContactId,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete a contact.
    Delete { id: ContactId },
    /// Mark a contact as favourite (or clear it with --off).
    Favorite {
        id: ContactId,
        #[arg(long)]
        off: bool,
    },
}

#[derive(Debug, Args)]
struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    mobile: String,
    #[arg(long, default_value = "")]
    landline: String,
    /// Photo URI or data reference.
    #[arg(long)]
    photo: Option<String>,
    #[arg(long)]
    favorite: bool,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    mobile: Option<String>,
    #[arg(long)]
    landline: Option<String>,
    #[arg(long)]
    photo: Option<String>,
    /// Remove the stored photo.
    #[arg(long, conflicts_with = "photo")]
    clear_photo: bool,
}

impl ContactArgs {
    fn into_input(self) -> ContactInput {
        let input = ContactInput::new(self.name, self.mobile)
            .with_landline(self.landline)
            .with_favorite(self.favorite);
        match self.photo {
            Some(photo) => input.with_photo(photo),
            None => input,
        }
    }
}

impl UpdateArgs {
    fn apply(self, current: &Contact) -> ContactInput {
        let mut input = current.to_input();
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(mobile) = self.mobile {
            input.mobile = mobile;
        }
        if let Some(landline) = self.landline {
            input.landline = landline;
        }
        if self.clear_photo {
            input.photo = None;
        } else if let Some(photo) = self.photo {
            input = input.with_photo(photo);
        }
        input
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        if let Err(err) = init_logging(&level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let conn = open_db(&cli.db)
        .map_err(|err| format!("failed to open {}: {err}", cli.db.display()))?;
    let repo = SqliteContactRepository::try_new(&conn).map_err(describe_error)?;
    let service = ContactService::new(repo);

    match cli.command {
        Command::Add(args) => {
            let id = service
                .create_contact(&args.into_input())
                .map_err(describe_error)?;
            println!("Contact created successfully! id={id}");
        }
        Command::List {
            favorites,
            search,
            json,
        } => {
            let contacts = if favorites {
                service.list_favorites()
            } else {
                service.list_contacts()
            }
            .map_err(describe_error)?;
            let contacts = match search {
                Some(query) => contactbook_core::search_contacts(&query, &contacts),
                None => contacts,
            };
            print_contacts(&contacts, json)?;
        }
        Command::Show { id } => {
            let contact = service
                .get_contact(id)
                .map_err(describe_error)?
                .ok_or_else(|| format!("no contact with id {id}"))?;
            println!("{}", format_contact(&contact));
        }
        Command::Update { id, fields } => {
            let current = service
                .get_contact(id)
                .map_err(describe_error)?
                .ok_or_else(|| format!("no contact with id {id}"))?;
            let outcome = service
                .update_contact(id, &fields.apply(&current))
                .map_err(describe_error)?;
            report_outcome(outcome, id, "updated")?;
        }
        Command::Delete { id } => {
            let outcome = service.delete_contact(id).map_err(describe_error)?;
            report_outcome(outcome, id, "deleted")?;
        }
        Command::Favorite { id, off } => {
            let outcome = service.set_favorite(id, !off).map_err(describe_error)?;
            report_outcome(outcome, id, if off { "unfavourited" } else { "favourited" })?;
        }
    }

    Ok(())
}

fn report_outcome(outcome: WriteOutcome, id: ContactId, verb: &str) -> Result<(), String> {
    match outcome {
        WriteOutcome::Applied => {
            println!("contact {id} {verb}");
            Ok(())
        }
        WriteOutcome::NotFound => Err(format!("no contact with id {id}")),
    }
}

fn print_contacts(contacts: &[Contact], json: bool) -> Result<(), String> {
    if json {
        let rendered = serde_json::to_string_pretty(contacts)
            .map_err(|err| format!("failed to render JSON: {err}"))?;
        println!("{rendered}");
        return Ok(());
    }

    if contacts.is_empty() {
        println!("No contacts.");
    }
    for contact in contacts {
        println!("{}", format_contact(contact));
    }
    Ok(())
}

fn format_contact(contact: &Contact) -> String {
    format!(
        "{}\t{}{}\tmobile={}\tlandline={}\tphoto={}",
        contact.id,
        if contact.is_favorite { "♥ " } else { "" },
        contact.name,
        contact.mobile,
        contact.landline,
        if contact.photo.is_some() { "yes" } else { "no" }
    )
}

fn describe_error(err: RepoError) -> String {
    match err {
        RepoError::Validation(err) => err
            .report()
            .errors()
            .into_iter()
            .map(|(field, message)| format!("{}: {message}", field.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_error, Cli, Command, UpdateArgs};
    use clap::Parser;
    use contactbook_core::{Contact, ContactInput, RepoError};

    #[test]
    fn parses_add_with_defaults() {
        let cli = Cli::try_parse_from([
            "contactbook",
            "--db",
            "/tmp/c.db",
            "add",
            "--name",
            "Alex1",
            "--mobile",
            "9876543210",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                let input = args.into_input();
                assert_eq!(input.landline, "");
                assert_eq!(input.photo, None);
                assert!(!input.is_favorite);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn photo_and_clear_photo_conflict() {
        let result = Cli::try_parse_from([
            "contactbook",
            "update",
            "3",
            "--photo",
            "file:///a.png",
            "--clear-photo",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn update_args_keep_unset_fields() {
        let current = Contact {
            id: 3,
            name: "Alex1".to_string(),
            mobile: "9876543210".to_string(),
            landline: "0201234567".to_string(),
            photo: Some("file:///a.png".to_string()),
            is_favorite: true,
        };
        let args = UpdateArgs {
            name: Some("Alex2".to_string()),
            mobile: None,
            landline: None,
            photo: None,
            clear_photo: true,
        };
        let input = args.apply(&current);
        assert_eq!(input.name, "Alex2");
        assert_eq!(input.landline, "0201234567");
        assert_eq!(input.photo, None);
        assert!(input.is_favorite);
    }

    #[test]
    fn validation_errors_list_every_field() {
        let err = ContactInput::new("", "1").validate().unwrap_err();
        let message = describe_error(RepoError::Validation(err));
        assert!(message.contains("name: Please enter the name"));
        assert!(message.contains("mobile:"));
    }
}
