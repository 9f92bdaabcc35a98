//! Student record commands: init, seed, add, find, update, update-field, delete
//!
//! Input is gathered and validated first; the store (and its connection) is
//! only touched once everything is in hand. Store failures are reported and
//! swallowed: the command ends normally without its effect.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use studentctl_core::{
    FieldUpdate, NewStudent, SchemaStatus, StoreError, Student, StudentField, StudentInfo,
    StudentNumber, ValidationError,
};

use super::ConnectionArgs;
use crate::wizard::{self, FieldChoice};

// ============================================================================
// Args
// ============================================================================

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Student name
    #[arg(long)]
    pub name: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Age in years (whole number)
    #[arg(long)]
    pub age: Option<String>,

    /// Student number (lookup key, must be unique)
    #[arg(long)]
    pub number: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON object, or null when absent (for piping to jq)
    Json,
}

#[derive(Parser, Debug)]
pub struct FindArgs {
    /// Student number to look up
    pub number: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Number of the student to update
    #[arg(long)]
    pub number: Option<String>,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New address
    #[arg(long)]
    pub address: Option<String>,

    /// New age (whole number)
    #[arg(long)]
    pub age: Option<String>,

    /// New student number
    #[arg(long)]
    pub new_number: Option<String>,
}

#[derive(Parser, Debug)]
pub struct UpdateFieldArgs {
    /// Number of the student to update
    #[arg(long)]
    pub number: Option<String>,

    /// Field to update: 1 (name), 2 (address) or 3 (age)
    #[arg(long)]
    pub field: Option<String>,

    /// Replacement value
    #[arg(long)]
    pub value: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Number of the student to delete
    #[arg(long)]
    pub number: Option<String>,
}

// ============================================================================
// Commands
// ============================================================================

pub async fn run_init(conn: &ConnectionArgs) -> Result<()> {
    let store = conn.store()?;

    match store.initialize_schema().await {
        Ok(SchemaStatus::Ready) => println!("Student table created successfully"),
        Ok(SchemaStatus::DuplicateNumbers) => {
            println!("Student table created successfully");
            println!(
                "Warning: existing rows share student numbers; \
                 lookups use the lowest student_id until duplicates are removed"
            );
        }
        Err(e) => report_failure("creating PostgreSQL table", &e),
    }
    Ok(())
}

pub async fn run_seed(conn: &ConnectionArgs) -> Result<()> {
    let store = conn.store()?;

    match store.insert_fixed_record().await {
        Ok(id) => println!("Data added successfully (student_id {id})"),
        Err(e) => report_failure("inserting data into PostgreSQL table", &e),
    }
    Ok(())
}

pub async fn run_add(args: AddArgs, conn: &ConnectionArgs) -> Result<()> {
    let name = wizard::text_or_prompt(args.name, "name", "Enter name:")?;
    let address = wizard::text_or_prompt(args.address, "address", "Enter address:")?;
    let age = wizard::text_or_prompt(args.age, "age", "Enter age:")?;
    let number = wizard::text_or_prompt(args.number, "number", "Enter number:")?;

    let student = match NewStudent::parse(&name, &address, &age, &number) {
        Ok(student) => student,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let store = conn.store()?;
    match store.insert_record(&student).await {
        Ok(id) => println!("Data added successfully (student_id {id})"),
        Err(e) => report_failure("inserting data into PostgreSQL table", &e),
    }
    Ok(())
}

pub async fn run_find(args: FindArgs, conn: &ConnectionArgs) -> Result<()> {
    let number = match StudentNumber::new(&args.number) {
        Ok(number) => number,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let store = conn.store()?;
    match store.find_by_number(&number).await {
        Ok(found) => println!("{}", render_found(&number, found.as_ref(), args.format)?),
        Err(e) => report_failure("fetching student from PostgreSQL", &e),
    }
    Ok(())
}

pub async fn run_update(args: UpdateArgs, conn: &ConnectionArgs) -> Result<()> {
    let number = wizard::text_or_prompt(args.number, "number", "Enter student number to update:")?;
    let name = wizard::text_or_prompt(args.name, "name", "Enter new name:")?;
    let address = wizard::text_or_prompt(args.address, "address", "Enter new address:")?;
    let age = wizard::text_or_prompt(args.age, "age", "Enter new age:")?;
    let new_number = wizard::text_or_prompt(args.new_number, "new-number", "Enter new number:")?;

    let parsed = StudentNumber::new(&number)
        .and_then(|n| NewStudent::parse(&name, &address, &age, &new_number).map(|s| (n, s)));
    let (number, student) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let store = conn.store()?;
    match store.update_all_fields(&number, &student).await {
        Ok(0) => println!("No student found with number {number}; nothing updated"),
        Ok(_) => println!("Data updated successfully"),
        Err(e) => report_failure("updating data in PostgreSQL table", &e),
    }
    Ok(())
}

pub async fn run_update_field(args: UpdateFieldArgs, conn: &ConnectionArgs) -> Result<()> {
    let number = wizard::text_or_prompt(args.number, "number", "Enter student number to update:")?;
    let number = match StudentNumber::new(&number) {
        Ok(number) => number,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let field = match wizard::field_or_prompt(args.field)? {
        FieldChoice::Picked(field) => field,
        FieldChoice::Given(raw) => match StudentField::from_choice(&raw) {
            Ok(field) => field,
            Err(e) => {
                report_invalid(&e);
                return Ok(());
            }
        },
    };

    let raw = wizard::text_or_prompt(args.value, "value", field.prompt())?;
    let update = match FieldUpdate::parse(field, &raw) {
        Ok(update) => update,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let store = conn.store()?;
    match store.update_single_field(&number, &update).await {
        Ok(0) => println!("No student found with number {number}; nothing updated"),
        Ok(_) => println!("{} updated successfully", field.label()),
        Err(e) => report_failure("updating data in PostgreSQL table", &e),
    }
    Ok(())
}

pub async fn run_delete(args: DeleteArgs, conn: &ConnectionArgs) -> Result<()> {
    let number = wizard::text_or_prompt(
        args.number,
        "number",
        "Enter student number you want to delete:",
    )?;
    let number = match StudentNumber::new(&number) {
        Ok(number) => number,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let store = conn.store()?;
    let preview = |student: &Student| println!("Student to be deleted: {student}");
    match store.delete_by_number(&number, preview).await {
        Ok(removed) if removed.is_empty() => {
            println!("No student found with number {number}");
        }
        Ok(_) => println!("Student with number {number} deleted successfully"),
        Err(e) => report_failure("deleting data in PostgreSQL table", &e),
    }
    Ok(())
}

// ============================================================================
// Reporting
// ============================================================================

fn render_found(
    number: &StudentNumber,
    found: Option<&StudentInfo>,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&found)?,
        OutputFormat::Human => match found {
            Some(info) => format!("Student found with number {number}: {info}"),
            None => format!("No student found with number {number}"),
        },
    })
}

fn report_invalid(err: &ValidationError) {
    tracing::debug!(error = %err, "input rejected before connecting");
    match err {
        ValidationError::InvalidChoice { .. } => println!("{err}"),
        _ => println!("Invalid input: {err}"),
    }
}

fn report_failure(action: &str, err: &StoreError) {
    tracing::error!(error = %err, "{action} failed");
    match err {
        StoreError::Connect(source) => {
            eprintln!("Error while connecting to PostgreSQL: {source}")
        }
        _ => eprintln!("Error while {action}: {err}"),
    }
}
