//! A print session: one unlocked document and the jobs sent from it.
//!
//! Unlocking creates the session; a failed unlock produces no session at
//! all. Preparing options is pure and never changes state. Each submission
//! writes the decrypted copy next to the source, hands it to the backend and
//! removes it again, so the same session can print any number of times.

use std::path::Path;

use tracing::info;

use crate::config::PrintRequest;
use crate::error::{CleanupWarning, PrintError, SubmitError, UnlockError};
use crate::job::{self, JOB_TITLE, PrintOptions};
use crate::pages;
use crate::printing::{JobId, PrintBackend};
use crate::unlock::{self, UnlockedDocument};

/// Where a session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The document is ready and nothing has been sent yet.
    Unlocked,
    /// At least one job was accepted; `job` is the most recent.
    Submitted { job: JobId },
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub job: JobId,
    pub printer: String,
    /// Pages sent, as an ascending comma-joined list.
    pub page_ranges: String,
    /// Set when the decrypted copy could not be deleted afterwards.
    pub cleanup_warning: Option<CleanupWarning>,
}

#[derive(Debug)]
pub struct Session {
    document: UnlockedDocument,
    state: SessionState,
}

impl Session {
    /// Unlock the PDF at `path` and start a session for it.
    pub fn open(path: impl AsRef<Path>, password: &str) -> Result<Self, UnlockError> {
        let document = unlock::unlock(path, password)?;
        Ok(Self::from_document(document))
    }

    /// Start a session for an already unlocked document.
    pub fn from_document(document: UnlockedDocument) -> Self {
        Self {
            document,
            state: SessionState::Unlocked,
        }
    }

    pub fn document(&self) -> &UnlockedDocument {
        &self.document
    }

    pub fn page_count(&self) -> u32 {
        self.document.page_count()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Validate `request` against this document and assemble print options.
    pub fn prepare(&self, request: &PrintRequest) -> Result<PrintOptions, PrintError> {
        let selected =
            pages::select_with_parity(&request.pages, self.page_count(), request.parity)?;
        let options = job::build(&request.copies, selected, request.orientation, request.media)?;
        Ok(options)
    }

    /// Send the document to `printer`.
    ///
    /// The decrypted copy is removed whether or not the backend accepts the
    /// job. A failed submission leaves the state unchanged.
    pub fn submit(
        &mut self,
        backend: &dyn PrintBackend,
        printer: &str,
        options: &PrintOptions,
    ) -> Result<Submission, SubmitError> {
        let artifact = self
            .document
            .write_artifact()
            .map_err(|source| SubmitError::Artifact {
                path: self.document.artifact_path(),
                source,
            })?;

        let result = backend.submit(
            printer,
            artifact.path(),
            JOB_TITLE,
            &options.to_cups_options(),
        );
        let cleanup_warning = artifact.cleanup();
        let job = result?;

        info!(%job, printer, pages = %options.page_ranges(), "document sent to printer");
        self.state = SessionState::Submitted { job: job.clone() };
        Ok(Submission {
            job,
            printer: printer.to_string(),
            page_ranges: options.page_ranges(),
            cleanup_warning,
        })
    }

    /// [`Session::prepare`] followed by [`Session::submit`].
    pub fn print(
        &mut self,
        backend: &dyn PrintBackend,
        printer: &str,
        request: &PrintRequest,
    ) -> Result<Submission, PrintError> {
        let options = self.prepare(request)?;
        Ok(self.submit(backend, printer, &options)?)
    }
}
