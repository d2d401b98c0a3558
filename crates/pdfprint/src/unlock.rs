//! Unlocking of password-protected PDFs.
//!
//! Decryption is delegated to `lopdf`. The decrypted document is kept in
//! memory; a password-free copy is only written to disk while a print job
//! is being submitted.

use std::path::{Path, PathBuf};

use lopdf::Document;
use lopdf::encryption::DecryptionError;
use tracing::{debug, info, warn};

use crate::error::{CleanupWarning, UnlockError};

const UNLOCKED_SUFFIX: &str = "_unlocked.pdf";

/// A decrypted PDF, ready to be handed to the printing subsystem.
#[derive(Debug, Clone)]
pub struct UnlockedDocument {
    source: PathBuf,
    page_count: u32,
    was_encrypted: bool,
    pdf: Vec<u8>,
}

impl UnlockedDocument {
    /// Path of the original (protected) file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Whether the source file was encrypted.
    pub fn was_encrypted(&self) -> bool {
        self.was_encrypted
    }

    /// The decrypted PDF bytes.
    pub fn pdf(&self) -> &[u8] {
        &self.pdf
    }

    /// Where the decrypted copy is written next to the source.
    pub fn artifact_path(&self) -> PathBuf {
        unlocked_path(&self.source)
    }

    /// Write the decrypted copy to an explicit path and keep it.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.pdf)
    }

    /// Write the decrypted copy next to the source for the duration of a
    /// print attempt.
    pub fn write_artifact(&self) -> std::io::Result<DecryptedArtifact> {
        let path = self.artifact_path();
        if path.exists() {
            warn!(path = %path.display(), "overwriting existing file with decrypted copy");
        }
        self.save(&path)?;
        debug!(path = %path.display(), "wrote decrypted copy");
        Ok(DecryptedArtifact {
            path,
            removed: false,
        })
    }
}

/// A password-free copy of the document on disk.
///
/// Removed by [`DecryptedArtifact::cleanup`], or best-effort on drop.
#[derive(Debug)]
pub struct DecryptedArtifact {
    path: PathBuf,
    removed: bool,
}

impl DecryptedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file, reporting a warning instead of failing.
    pub fn cleanup(mut self) -> Option<CleanupWarning> {
        self.removed = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not delete decrypted copy");
                Some(CleanupWarning {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl Drop for DecryptedArtifact {
    fn drop(&mut self) {
        if !self.removed
            && let Err(e) = std::fs::remove_file(&self.path)
        {
            warn!(path = %self.path.display(), error = %e, "could not delete decrypted copy");
        }
    }
}

/// Derive the path of the decrypted copy: `report.pdf` → `report_unlocked.pdf`.
///
/// Files without a `.pdf` extension get the suffix appended to their name.
pub fn unlocked_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let has_pdf_ext = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let stem = if has_pdf_ext {
        &name[..name.len() - ".pdf".len()]
    } else {
        name.as_str()
    };
    source.with_file_name(format!("{stem}{UNLOCKED_SUFFIX}"))
}

/// Open the PDF at `path` and decrypt it with `password`.
pub fn unlock(path: impl AsRef<Path>, password: &str) -> Result<UnlockedDocument, UnlockError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        UnlockError::CorruptOrUnreadable(format!("cannot read {}: {e}", path.display()))
    })?;
    unlock_bytes(path, &data, password)
}

/// Decrypt PDF bytes that were read from `source`.
pub fn unlock_bytes(
    source: impl Into<PathBuf>,
    data: &[u8],
    password: &str,
) -> Result<UnlockedDocument, UnlockError> {
    let source = source.into();
    let mut doc = Document::load_mem(data)
        .map_err(|e| UnlockError::CorruptOrUnreadable(format!("invalid PDF: {e}")))?;

    // lopdf only tries the empty user password while loading; objects of a
    // document with a real user password are only read when the password is
    // supplied up front.
    if doc.is_encrypted() {
        doc = Document::load_mem_with_password(data, password).map_err(|e| match e {
            lopdf::Error::InvalidPassword
            | lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
                UnlockError::WrongPassword
            }
            other => UnlockError::CorruptOrUnreadable(format!("decryption failed: {other}")),
        })?;
    }
    let was_encrypted = doc.encryption_state.is_some();

    let page_count = doc.get_pages().len() as u32;
    if page_count == 0 {
        return Err(UnlockError::CorruptOrUnreadable(
            "document has no pages".to_string(),
        ));
    }
    let mut pdf = Vec::new();
    doc.save_to(&mut pdf)
        .map_err(|e| UnlockError::CorruptOrUnreadable(format!("failed to write PDF: {e}")))?;

    info!(
        source = %source.display(),
        page_count,
        was_encrypted,
        "unlocked document"
    );
    Ok(UnlockedDocument {
        source,
        page_count,
        was_encrypted,
        pdf,
    })
}
