use bytes::Bytes;
use uuid::Uuid;

pub const MAX_FILE_BYTES: usize = 2 * 1024 * 1024;

const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];
const RESUME_MIME_TYPES: &[&str] = &["application/pdf"];

/// A file offered to the intake, before filtering.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// An accepted file, keyed by an opaque local id for the session's
/// progress map. Lives only until submit success or user removal.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub id: Uuid,
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Collects candidate files against a MIME allow-list and size cap.
///
/// Rejected files are dropped silently from the accepted set; one aggregated
/// field error survives, last rejection reason wins.
#[derive(Debug)]
pub struct Intake {
    allowed: &'static [&'static str],
    mime_message: &'static str,
    single: bool,
    pending: Vec<PendingUpload>,
    error: Option<String>,
}

impl Intake {
    pub fn gallery() -> Self {
        Intake {
            allowed: IMAGE_MIME_TYPES,
            mime_message: "File must be in PNG, JPEG or JPG format",
            single: false,
            pending: Vec::new(),
            error: None,
        }
    }

    pub fn resume() -> Self {
        Intake {
            allowed: RESUME_MIME_TYPES,
            mime_message: "File must be in PDF format",
            single: true,
            pending: Vec::new(),
            error: None,
        }
    }

    pub fn accept(&mut self, candidates: Vec<Candidate>) {
        for candidate in candidates {
            if candidate.bytes.len() > MAX_FILE_BYTES {
                self.error = Some("File size must be less than 2MB".to_string());
                continue;
            }
            if !self.allowed.contains(&candidate.mime.as_str()) {
                self.error = Some(self.mime_message.to_string());
                continue;
            }

            let accepted = PendingUpload {
                id: Uuid::new_v4(),
                name: candidate.name,
                mime: candidate.mime,
                bytes: candidate.bytes,
            };
            if self.single {
                // Resume slot holds at most one file; a new accept replaces it.
                self.pending.clear();
            }
            self.pending.push(accepted);
        }
    }

    pub fn remove(&mut self, id: Uuid) {
        self.pending.retain(|f| f.id != id);
    }

    pub fn pending(&self) -> &[PendingUpload] {
        &self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.error = None;
    }
}
