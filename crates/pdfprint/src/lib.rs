pub mod config;
pub mod error;
pub mod job;
pub mod pages;
pub mod printing;
pub mod session;
pub mod unlock;

use std::path::Path;

pub use config::{MediaSize, Orientation, Parity, PrintRequest};
pub use error::{
    CleanupWarning, NoPrintersError, ParseError, PrintError, SubmitError, UnlockError,
    ValidationError,
};
pub use job::{JOB_TITLE, PrintOptions};
pub use pages::PageSet;
pub use printing::{CupsBackend, JobId, PrintBackend};
pub use session::{Session, SessionState, Submission};
pub use unlock::UnlockedDocument;

/// Unlock the PDF at `path` and print it once on `printer`.
///
/// When `printer` is `None` the backend's default destination is used, or
/// the first available one.
pub fn print_file(
    path: impl AsRef<Path>,
    password: &str,
    backend: &dyn PrintBackend,
    printer: Option<&str>,
    request: &PrintRequest,
) -> Result<Submission, PrintError> {
    let mut session = Session::open(path, password)?;
    let options = session.prepare(request)?;
    let printer = printing::resolve_printer(backend, printer)?;
    Ok(session.submit(backend, &printer, &options)?)
}
