//! CLI binary for validating and importing ledger transaction files.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use erp_import::error::ImportError;
use erp_import::import::{
    ImportRow, ImportSession, ValidationOptions, ValidationReport, read_csv_file, validate_rows,
};
use erp_import::importer::BlockingImporter;
use erp_import::models::{AccountCategory, CategoryIndex, ImportOutcome};
use erp_import::templates::{Template, read_categories_file, write_template};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use secrecy::{ExposeSecret as _, SecretString};

/// Environment variable name for the API base URL.
const BASE_URL_ENV: &str = "ERP_API_URL";

/// Environment variable name for the optional API token.
const TOKEN_ENV: &str = "ERP_API_TOKEN";

/// ERP ledger import CLI — validate and bulk-import transaction CSV files.
#[derive(Debug, Parser)]
#[command(name = "erp-import", version, about)]
struct Cli {
    /// Ledger API base URL (default: $ERP_API_URL or http://127.0.0.1:8000).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List the account categories known to the ledger.
    Categories,
    /// Write a CSV template to disk.
    Template {
        /// Which template to write.
        #[arg(value_enum)]
        kind: TemplateKind,
        /// Directory to write the template into.
        #[arg(long, short, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },
    /// Validate a transaction file without importing it.
    Validate(ValidateArgs),
    /// Validate a transaction file and import it if every row is valid.
    Import(ImportArgs),
}

/// Template selector for the `template` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TemplateKind {
    /// Transaction import template.
    Transactions,
    /// Account category reference list.
    Categories,
}

impl From<TemplateKind> for Template {
    fn from(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Transactions => Self::Transactions,
            TemplateKind::Categories => Self::Categories,
        }
    }
}

/// Arguments for the `validate` subcommand.
#[derive(Debug, Args)]
struct ValidateArgs {
    /// Transaction CSV file to validate.
    file: PathBuf,
    /// Validate against a local category CSV instead of the server.
    #[arg(long, value_name = "FILE")]
    categories: Option<PathBuf>,
    /// Also reject rows whose category books a different transaction type.
    #[arg(long)]
    check_category_type: bool,
}

/// Arguments for the `import` subcommand.
#[derive(Debug, Args)]
struct ImportArgs {
    /// Transaction CSV file to import.
    file: PathBuf,
    /// Also reject rows whose category books a different transaction type.
    #[arg(long)]
    check_category_type: bool,
}

/// Connection settings gathered from flags and the environment.
#[derive(Debug, Default)]
struct Settings {
    /// API base URL override.
    base_url: Option<String>,
    /// Optional bearer token.
    token: Option<SecretString>,
}

/// Reads a non-empty environment variable.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|val| !val.is_empty())
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let settings = Settings {
        base_url: cli.base_url.or_else(|| read_env(BASE_URL_ENV)),
        token: read_env(TOKEN_ENV).map(SecretString::from),
    };

    dispatch(&settings, cli.command)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(settings: &Settings, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Categories => cmd_categories(settings),
        Command::Template { kind, output } => cmd_template(kind.into(), &output),
        Command::Validate(args) => cmd_validate(settings, &args),
        Command::Import(args) => cmd_import(settings, &args),
    }
}

/// Builds the blocking importer, printing an error on failure.
fn build_importer(
    settings: &Settings,
    options: ValidationOptions,
) -> io::Result<Option<BlockingImporter>> {
    let mut builder = BlockingImporter::builder().validation_options(options);
    if let Some(url) = settings.base_url.as_deref() {
        builder = builder.base_url(url);
    }
    if let Some(token) = settings.token.as_ref() {
        builder = builder.token(token.expose_secret());
    }
    match builder.build() {
        Ok(importer) => Ok(Some(importer)),
        Err(err) => {
            report_error("failed to build client", &err)?;
            Ok(None)
        }
    }
}

/// Reads and parses a transaction file, printing an error on failure.
fn load_rows(path: &Path) -> io::Result<Option<Vec<ImportRow>>> {
    match read_csv_file(path) {
        Ok(rows) => Ok(Some(rows)),
        Err(err) => {
            report_error(&format!("cannot read {}", path.display()), &err)?;
            Ok(None)
        }
    }
}

/// Executes the `categories` subcommand: lists the server's categories.
fn cmd_categories(settings: &Settings) -> io::Result<ExitCode> {
    let Some(importer) = build_importer(settings, ValidationOptions::default())? else {
        return Ok(ExitCode::FAILURE);
    };
    let spinner = make_spinner("Fetching account categories...");

    match importer.categories() {
        Ok(index) => {
            spinner.finish_and_clear();
            print_categories_table(&index.sorted())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_error("failed to fetch account categories", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `template` subcommand: writes a template file.
fn cmd_template(template: Template, output: &Path) -> io::Result<ExitCode> {
    match write_template(template, output) {
        Ok(path) => {
            writeln!(
                io::stdout().lock(),
                "{} {}",
                "Template written:".green().bold(),
                path.display()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error("failed to write template", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Resolves the reference categories from a local file or the server.
fn reference_categories(
    settings: &Settings,
    local: Option<&Path>,
) -> io::Result<Option<CategoryIndex>> {
    if let Some(path) = local {
        return match read_categories_file(path) {
            Ok(categories) => Ok(Some(CategoryIndex::new(categories))),
            Err(err) => {
                report_error(&format!("cannot read {}", path.display()), &err)?;
                Ok(None)
            }
        };
    }

    let Some(importer) = build_importer(settings, ValidationOptions::default())? else {
        return Ok(None);
    };
    let spinner = make_spinner("Fetching account categories...");
    let result = importer.categories();
    spinner.finish_and_clear();
    match result {
        Ok(index) => Ok(Some(index)),
        Err(err) => {
            report_error("failed to fetch account categories", &err)?;
            Ok(None)
        }
    }
}

/// Executes the `validate` subcommand: validates a file and prints the
/// report.
fn cmd_validate(settings: &Settings, args: &ValidateArgs) -> io::Result<ExitCode> {
    let Some(rows) = load_rows(&args.file)? else {
        return Ok(ExitCode::FAILURE);
    };
    let Some(categories) = reference_categories(settings, args.categories.as_deref())? else {
        return Ok(ExitCode::FAILURE);
    };

    let options = ValidationOptions {
        check_category_type: args.check_category_type,
    };
    let report = validate_rows(&rows, &categories, options);
    print_report(&report)?;

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Executes the `import` subcommand: validates, then submits the file in
/// one bulk request.
fn cmd_import(settings: &Settings, args: &ImportArgs) -> io::Result<ExitCode> {
    let Some(rows) = load_rows(&args.file)? else {
        return Ok(ExitCode::FAILURE);
    };
    let options = ValidationOptions {
        check_category_type: args.check_category_type,
    };
    let Some(importer) = build_importer(settings, options)? else {
        return Ok(ExitCode::FAILURE);
    };

    let mut session = ImportSession::new();
    let spinner = make_spinner("Validating against account categories...");
    let loaded = importer.load(&mut session, rows).map(ValidationReport::clone);
    spinner.finish_and_clear();
    let report = match loaded {
        Ok(report) => report,
        Err(err) => {
            report_error("failed to validate file", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    print_report(&report)?;

    let spinner = make_spinner("Importing transactions...");
    let submitted = importer.submit(&mut session);
    spinner.finish_and_clear();
    match submitted {
        Ok(outcome) => {
            print_outcome(&outcome)?;
            Ok(if outcome.is_complete_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err) => {
            report_error("import refused", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Returns a remediation hint for errors the operator can fix.
fn hint_for(err: &ImportError) -> Option<&'static str> {
    match *err {
        ImportError::NotCsv { .. } => Some("only .csv files can be imported"),
        ImportError::MissingColumns { .. } => {
            Some("run `erp-import template transactions` for the expected header")
        }
        ImportError::ValidationFailed { .. } => {
            Some("fix the rows listed above and run the import again")
        }
        ImportError::Http(_) => Some("check that the ledger API is running, or set ERP_API_URL"),
        ImportError::Api { status: 401 | 403, .. } => {
            Some("set ERP_API_TOKEN to a valid access token")
        }
        ImportError::Api { .. }
        | ImportError::Serialization(_)
        | ImportError::Csv(_)
        | ImportError::Io(_)
        | ImportError::InvalidStage { .. } => None,
    }
}

/// Prints an error with an optional hint to stderr.
fn report_error(context: &str, err: &ImportError) -> io::Result<()> {
    let mut out = io::stderr().lock();
    writeln!(out, "{} {context}: {err}", "error:".red().bold())?;
    if let Some(hint) = hint_for(err) {
        writeln!(out, "  {} {hint}", "hint:".cyan())?;
    }
    Ok(())
}

/// Prints account categories in a table.
fn print_categories_table(categories: &[&AccountCategory]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if categories.is_empty() {
        writeln!(out, "{}", "No account categories found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Code").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Parent").fg(Color::Cyan),
    ]);

    for cat in categories {
        let parent = cat
            .parent_id
            .map_or_else(|| "\u{2014}".to_owned(), |id| id.to_string());
        _ = table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(&cat.code),
            Cell::new(&cat.name),
            Cell::new(cat.kind),
            Cell::new(parent),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Account Categories".green().bold(),
        format_args!("({})", categories.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints a validation report: a summary line and the error table.
fn print_report(report: &ValidationReport) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let failed = report.total_rows().saturating_sub(report.importable_count());
    writeln!(
        out,
        "{} {}",
        "Validation".green().bold(),
        format_args!(
            "({} rows, {} valid, {} with errors)",
            report.total_rows(),
            report.importable_count(),
            failed
        )
        .dimmed()
    )?;

    if report.is_clean() {
        writeln!(out, "{}", "All rows are valid.".green())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Row").fg(Color::Cyan),
        Cell::new("Field").fg(Color::Cyan),
        Cell::new("Message").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);

    for err in report.errors() {
        _ = table.add_row(vec![
            Cell::new(err.row),
            Cell::new(err.field),
            Cell::new(&err.message).fg(Color::Red),
            Cell::new(&err.value).fg(Color::DarkGrey),
        ]);
    }

    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the import outcome returned by the backend.
fn print_outcome(outcome: &ImportOutcome) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let title = if outcome.is_complete_success() {
        "Import complete!".green().bold().to_string()
    } else {
        "Import finished with failures".yellow().bold().to_string()
    };
    writeln!(out, "{title}")?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Imported:".bold(), outcome.success_count.green())?;
    writeln!(out, "  {} {}", "Failed:".bold(), outcome.failed_count.red())?;
    if let Some(failure) = outcome.failure.as_deref() {
        writeln!(out, "  {} {failure}", "Reason:".bold())?;
    }

    if !outcome.errors.is_empty() {
        let mut table = Table::new();
        _ = table.load_preset(UTF8_FULL);
        _ = table.set_header(vec![
            Cell::new("Row").fg(Color::Cyan),
            Cell::new("Error").fg(Color::Cyan),
        ]);
        for err in &outcome.errors {
            _ = table.add_row(vec![Cell::new(err.row), Cell::new(&err.error).fg(Color::Red)]);
        }
        writeln!(out)?;
        writeln!(out, "{table}")?;
    }
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr itself may be gone; nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
