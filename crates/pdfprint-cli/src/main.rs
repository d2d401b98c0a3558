use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdfprint::config::{MediaSize, Orientation, Parity, PrintRequest};
use pdfprint::printing::{self, CupsBackend, PrintBackend};
use pdfprint::unlock::unlocked_path;
use pdfprint::{JOB_TITLE, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pdfprint",
    version,
    about = "Unlock a password-protected PDF and print it through CUPS"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unlock a PDF and send it to a printer
    Print(PrintArgs),
    /// List available printers
    Printers,
    /// Show page count and encryption status of a PDF
    Info(DocumentArgs),
    /// Write a password-free copy of a PDF
    Unlock {
        #[command(flatten)]
        document: DocumentArgs,

        /// Output path (default: input with an `_unlocked.pdf` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DocumentArgs {
    /// Input PDF file
    input: PathBuf,

    /// Document password
    #[arg(short, long, env = "PDFPRINT_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct PrintArgs {
    #[command(flatten)]
    document: DocumentArgs,

    /// Printer name (default: the CUPS default destination)
    #[arg(short = 'd', long, env = "PDFPRINT_PRINTER")]
    printer: Option<String>,

    /// Number of copies
    #[arg(short = 'n', long, default_value = "1", allow_hyphen_values = true)]
    copies: String,

    /// Pages to print (e.g. "1-5,7,10-15"; default: all pages)
    #[arg(long, default_value = "")]
    pages: String,

    /// Page mode: all, even or odd
    #[arg(long, default_value = "all")]
    parity: Parity,

    /// Paper orientation: portrait or landscape
    #[arg(long, default_value = "portrait")]
    orientation: Orientation,

    /// Paper size: A4, A3, Letter or Legal
    #[arg(long, default_value = "A4")]
    media: MediaSize,

    /// Show the job that would be sent without printing
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    let backend = CupsBackend::new();
    match command {
        Command::Print(args) => print(&backend, args),
        Command::Printers => list_printers(&backend),
        Command::Info(args) => info(args),
        Command::Unlock { document, output } => unlock(document, output),
    }
}

fn open_session(args: &DocumentArgs) -> Result<Session> {
    Session::open(&args.input, &args.password)
        .with_context(|| format!("unlocking {:?}", args.input))
}

fn print(backend: &dyn PrintBackend, args: PrintArgs) -> Result<()> {
    let mut session = open_session(&args.document)?;

    let request = PrintRequest {
        copies: args.copies,
        pages: args.pages,
        parity: args.parity,
        orientation: args.orientation,
        media: args.media,
    };
    let options = session.prepare(&request)?;

    if args.dry_run {
        let printer = args.printer.as_deref().unwrap_or("(default)");
        println!("Printer: {printer}");
        println!("Title: {JOB_TITLE}");
        for (key, value) in options.to_cups_options() {
            println!("{key}={value}");
        }
        return Ok(());
    }

    let printer = printing::resolve_printer(backend, args.printer.as_deref())
        .context("selecting a printer")?;
    let submission = session
        .submit(backend, &printer, &options)
        .with_context(|| format!("printing on {printer}"))?;

    if let Some(warning) = &submission.cleanup_warning {
        eprintln!("Warning: {warning}");
    }
    println!(
        "The document has been sent to {} (job {}).\nPages: {}",
        submission.printer, submission.job, submission.page_ranges
    );
    Ok(())
}

fn list_printers(backend: &dyn PrintBackend) -> Result<()> {
    let printers = printing::available_printers(backend)?;
    let default = backend.default_printer()?;
    for name in printers {
        let marker = if default.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("{name}{marker}");
    }
    Ok(())
}

fn info(args: DocumentArgs) -> Result<()> {
    let session = open_session(&args)?;
    let doc = session.document();
    println!("File: {:?}", doc.source());
    println!("Pages: {}", doc.page_count());
    println!("Encrypted: {}", if doc.was_encrypted() { "yes" } else { "no" });
    Ok(())
}

fn unlock(args: DocumentArgs, output: Option<PathBuf>) -> Result<()> {
    let session = open_session(&args)?;
    let output = output.unwrap_or_else(|| unlocked_path(&args.input));
    session
        .document()
        .save(&output)
        .with_context(|| format!("writing output to {:?}", output))?;
    println!("Unlocked: {:?} -> {:?}", args.input, output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_print_defaults() {
        let cli = Cli::try_parse_from(["pdfprint", "print", "in.pdf", "-p", "pw"]).unwrap();
        let Command::Print(args) = cli.command else {
            panic!("expected print command");
        };
        assert_eq!(args.document.input, PathBuf::from("in.pdf"));
        assert_eq!(args.document.password, "pw");
        assert_eq!(args.copies, "1");
        assert_eq!(args.pages, "");
        assert_eq!(args.parity, Parity::All);
        assert_eq!(args.orientation, Orientation::Portrait);
        assert_eq!(args.media, MediaSize::A4);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_print_options_parse_case_insensitively() {
        let cli = Cli::try_parse_from([
            "pdfprint",
            "print",
            "in.pdf",
            "--parity",
            "Even",
            "--orientation",
            "Landscape",
            "--media",
            "letter",
            "--pages",
            "1-4",
            "-n",
            "3",
            "-d",
            "office",
        ])
        .unwrap();
        let Command::Print(args) = cli.command else {
            panic!("expected print command");
        };
        assert_eq!(args.parity, Parity::Even);
        assert_eq!(args.orientation, Orientation::Landscape);
        assert_eq!(args.media, MediaSize::Letter);
        assert_eq!(args.pages, "1-4");
        assert_eq!(args.copies, "3");
        assert_eq!(args.printer.as_deref(), Some("office"));
    }

    #[test]
    fn test_rejects_unknown_media() {
        let result = Cli::try_parse_from(["pdfprint", "print", "in.pdf", "--media", "tabloid"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_copies_accepted_as_free_text() {
        // Copies are validated by the library, not by clap.
        let cli = Cli::try_parse_from(["pdfprint", "print", "in.pdf", "-n", "zero"]).unwrap();
        let Command::Print(args) = cli.command else {
            panic!("expected print command");
        };
        assert_eq!(args.copies, "zero");
    }

    #[test]
    fn test_negative_copies_reach_library_validation() {
        let cli = Cli::try_parse_from(["pdfprint", "print", "in.pdf", "-n", "-1"]).unwrap();
        let Command::Print(args) = cli.command else {
            panic!("expected print command");
        };
        assert_eq!(args.copies, "-1");

        let pages = pdfprint::pages::select("", 1).unwrap();
        let err = pdfprint::job::build(&args.copies, pages, args.orientation, args.media)
            .unwrap_err();
        assert_eq!(
            err,
            pdfprint::ValidationError::InvalidCopies("-1".to_string())
        );
    }
}
