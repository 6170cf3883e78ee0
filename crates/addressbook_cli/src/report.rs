//! Human-readable rendering of store outcomes.

use addressbook_core::{
    BulkInsertReport, Contact, ContactId, DeleteOutcome, InsertStatus, StoreResult,
    TableStatus, UpdateOutcome,
};
use log::warn;
use std::process::ExitCode;

const NOT_FOUND_EXIT: u8 = 2;

pub fn table_status_line(status: TableStatus) -> &'static str {
    match status {
        TableStatus::Created => "Table created successfully.",
        TableStatus::AlreadyExists => "Table already exists.",
    }
}

pub fn print_added(contact: &Contact, outcome: StoreResult<ContactId>) -> ExitCode {
    match outcome {
        Ok(id) => {
            println!("Contact {} added successfully (id {id}).", contact.full_name());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Contact {} could not be added: {err}", contact.full_name());
            ExitCode::FAILURE
        }
    }
}

pub fn print_bulk_insert(report: &BulkInsertReport) -> ExitCode {
    for outcome in &report.outcomes {
        match &outcome.status {
            InsertStatus::Inserted { id } => println!(
                "Contact {} {} added successfully (id {id}).",
                outcome.first_name, outcome.last_name
            ),
            InsertStatus::Failed(err) => println!(
                "Contact {} {} could not be added: {err}",
                outcome.first_name, outcome.last_name
            ),
        }
    }

    if let Some(abort) = &report.aborted {
        eprintln!(
            "Problem occurred while adding contacts; stopped at item {}: {}",
            abort.at_index + 1,
            abort.error
        );
        return ExitCode::FAILURE;
    }

    if report.failed_count() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

pub fn print_update(id: i64, outcome: StoreResult<UpdateOutcome>) -> ExitCode {
    match outcome {
        Ok(UpdateOutcome::Updated) => {
            println!("Contact with ID {id} updated successfully.");
            ExitCode::SUCCESS
        }
        Ok(UpdateOutcome::NotFound) => {
            println!("Contact with ID {id} not found; nothing updated.");
            ExitCode::from(NOT_FOUND_EXIT)
        }
        Ok(UpdateOutcome::MultipleRows(rows)) => {
            warn!(
                "event=cli_update module=cli status=anomaly contact_id={id} rows_affected={rows}"
            );
            eprintln!(
                "Warning: updating ID {id} changed {rows} rows; the table has duplicate ids."
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Problem occurred while updating contact {id}: {err}");
            ExitCode::FAILURE
        }
    }
}

pub fn print_delete(
    first_name: &str,
    last_name: &str,
    outcome: StoreResult<DeleteOutcome>,
) -> ExitCode {
    match outcome {
        Ok(DeleteOutcome::Deleted(count)) => {
            println!("Deleted {count} contact(s) named {first_name} {last_name}.");
            ExitCode::SUCCESS
        }
        Ok(DeleteOutcome::NotFound) => {
            println!("Contact with name {first_name} {last_name} not found.");
            ExitCode::from(NOT_FOUND_EXIT)
        }
        Err(err) => {
            eprintln!("Problem occurred while deleting contact: {err}");
            ExitCode::FAILURE
        }
    }
}

pub fn print_contacts(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts.");
        return;
    }
    for contact in contacts {
        println!("{}", contact_line(contact));
    }
}

fn contact_line(contact: &Contact) -> String {
    format!(
        "[{}] {} | {}, {}, {} {} | phone {} | {}",
        contact.id,
        contact.full_name(),
        contact.address,
        contact.city,
        contact.state,
        contact.zip,
        contact.phone_number,
        contact.email
    )
}
