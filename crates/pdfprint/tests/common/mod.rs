//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, dictionary};
use pdfprint::{JobId, PrintBackend, SubmitError};

pub const PASSWORD: &str = "s3cret";

/// Build a document with `num_pages` blank A4 pages and a file ID.
fn build_document(num_pages: u32) -> Document {
    let mut doc = Document::with_version("1.7");
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![1u8; 16], lopdf::StringFormat::Literal),
            Object::String(vec![2u8; 16], lopdf::StringFormat::Literal),
        ]),
    );

    let pages_id = doc.new_object_id();
    let mut page_ids = Vec::new();

    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 100 700 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_refs: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => num_pages as i64,
            "Kids" => page_refs,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

/// A minimal unencrypted PDF with the given number of pages.
pub fn make_test_pdf(num_pages: u32) -> Vec<u8> {
    let mut doc = build_document(num_pages);
    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

/// A PDF with the given number of pages, protected by `user_password`.
pub fn make_encrypted_pdf(num_pages: u32, user_password: &str) -> Vec<u8> {
    let mut doc = build_document(num_pages);
    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner-only",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

/// Write `bytes` to `name` inside `dir` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("should write fixture PDF");
    path
}

/// One call to [`PrintBackend::submit`], as seen by [`RecordingBackend`].
#[derive(Debug, Clone)]
pub struct RecordedJob {
    pub printer: String,
    pub document: PathBuf,
    pub title: String,
    pub options: Vec<(&'static str, String)>,
    /// Contents of `document` at submission time, if it existed.
    pub document_bytes: Option<Vec<u8>>,
}

/// An in-memory printing subsystem that records every submission.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub printers: Vec<String>,
    pub default: Option<String>,
    /// When set, looking up the default destination fails.
    pub default_unavailable: bool,
    /// When set, every submission fails with this message.
    pub reject_with: Option<String>,
    pub jobs: RefCell<Vec<RecordedJob>>,
}

impl RecordingBackend {
    pub fn with_printers(printers: &[&str]) -> Self {
        Self {
            printers: printers.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            printers: vec!["office".to_string()],
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl PrintBackend for RecordingBackend {
    fn list_printers(&self) -> Result<Vec<String>, SubmitError> {
        Ok(self.printers.clone())
    }

    fn default_printer(&self) -> Result<Option<String>, SubmitError> {
        if self.default_unavailable {
            return Err(SubmitError::Failed {
                command: "lpstat".to_string(),
                message: "scheduler is not running".to_string(),
            });
        }
        Ok(self.default.clone())
    }

    fn submit(
        &self,
        printer: &str,
        document: &Path,
        title: &str,
        options: &[(&'static str, String)],
    ) -> Result<JobId, SubmitError> {
        let mut jobs = self.jobs.borrow_mut();
        jobs.push(RecordedJob {
            printer: printer.to_string(),
            document: document.to_path_buf(),
            title: title.to_string(),
            options: options.to_vec(),
            document_bytes: std::fs::read(document).ok(),
        });
        if let Some(message) = &self.reject_with {
            return Err(SubmitError::Failed {
                command: "lp".to_string(),
                message: message.clone(),
            });
        }
        Ok(JobId(format!("{printer}-{}", jobs.len())))
    }
}
