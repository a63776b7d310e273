use std::sync::{Arc, Mutex};

use tracing::{error, warn};
use uuid::Uuid;

use crate::api::{CreateAccount, CreateGallery, RecordsApi};
use crate::error::SubmitError;
use crate::forms::{FieldError, GalleryForm, ResumeForm};
use crate::intake::Intake;
use crate::progress::ProgressMap;
use crate::storage::ObjectStore;

/// Submission phase. Every terminal outcome, success or any failure,
/// returns the session to `Idle`; there is no retry transition, the user
/// resubmits from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CheckingAvailability,
    Uploading,
    Creating,
}

/// One form session: the accepted files, their progress, and the current
/// submission phase. All transient state lives here and nowhere else.
pub struct Session {
    store: Arc<dyn ObjectStore>,
    api: Arc<dyn RecordsApi>,
    pub intake: Intake,
    progress: ProgressMap,
    phase: Arc<Mutex<Phase>>,
}

impl Session {
    pub fn gallery(store: Arc<dyn ObjectStore>, api: Arc<dyn RecordsApi>) -> Self {
        Session::new(store, api, Intake::gallery())
    }

    pub fn resume(store: Arc<dyn ObjectStore>, api: Arc<dyn RecordsApi>) -> Self {
        Session::new(store, api, Intake::resume())
    }

    fn new(store: Arc<dyn ObjectStore>, api: Arc<dyn RecordsApi>, intake: Intake) -> Self {
        Session {
            store,
            api,
            intake,
            progress: ProgressMap::default(),
            phase: Arc::new(Mutex::new(Phase::Idle)),
        }
    }

    /// Shared view of per-file progress, for rendering alongside an active
    /// submission.
    pub fn progress(&self) -> ProgressMap {
        self.progress.clone()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    /// Busy while the availability check or create call is pending, or any
    /// tracked upload is below 100%.
    pub fn is_busy(&self) -> bool {
        self.phase() != Phase::Idle || self.progress.any_incomplete()
    }

    /// Drives a gallery submission: availability check, concurrent uploads
    /// with per-file progress, then exactly one create call.
    pub async fn submit_gallery(&mut self, form: &GalleryForm) -> Result<(), SubmitError> {
        form.check().map_err(SubmitError::validation)?;
        if self.intake.pending().is_empty() {
            return Err(SubmitError::validation(vec![FieldError::new(
                "images",
                "Please add at least one image",
            )]));
        }

        self.set_phase(Phase::CheckingAvailability);
        let available = fail_closed("identifier", self.api.check_identifier(&form.identifier).await);
        if !available {
            self.set_phase(Phase::Idle);
            return Err(SubmitError::Conflict {
                field: "identifier",
            });
        }

        // Fire every upload before awaiting any of them. Handles are then
        // awaited in selection order, which also fixes the URL order.
        self.set_phase(Phase::Uploading);
        let mut handles = Vec::with_capacity(self.intake.pending().len());
        for file in self.intake.pending() {
            let store = Arc::clone(&self.store);
            let key = format!("gallery/{}", file.id);
            let blob = file.bytes.clone();
            let on_progress = self.progress.handle(file.id);
            handles.push((
                file.id,
                file.name.clone(),
                tokio::spawn(async move { store.put(&key, blob, on_progress).await }),
            ));
        }

        let mut images = Vec::with_capacity(handles.len());
        for (file_id, file_name, handle) in handles {
            match handle.await {
                Ok(Ok(url)) => images.push(url),
                Ok(Err(e)) => {
                    // Remaining uploads keep running unobserved; their
                    // handles are simply dropped.
                    warn!("Upload of {file_name} failed: {e}");
                    self.fail();
                    return Err(SubmitError::Upload { file_id, file_name });
                }
                Err(e) => {
                    warn!("Upload task for {file_name} panicked: {e}");
                    self.fail();
                    return Err(SubmitError::Upload { file_id, file_name });
                }
            }
        }

        self.set_phase(Phase::Creating);
        let request = CreateGallery {
            identifier: form.identifier.clone(),
            width: form.width.clone(),
            height: form.height.clone(),
            images,
        };
        match self.api.create_gallery(&request).await {
            Ok(()) => {
                self.reset();
                Ok(())
            }
            Err(e) => {
                error!("Gallery create failed: {e}");
                self.fail();
                Err(SubmitError::Create { record: "gallery" })
            }
        }
    }

    /// Drives a resume submission: availability check, one upload, then the
    /// account-create call.
    pub async fn submit_resume(&mut self, form: &ResumeForm) -> Result<(), SubmitError> {
        form.check().map_err(SubmitError::validation)?;
        let Some(file) = self.intake.pending().first().cloned() else {
            return Err(SubmitError::validation(vec![FieldError::new(
                "resume",
                "Please upload a resume",
            )]));
        };

        self.set_phase(Phase::CheckingAvailability);
        let available = fail_closed("email", self.api.check_email(&form.email).await);
        if !available {
            self.set_phase(Phase::Idle);
            return Err(SubmitError::Conflict { field: "email" });
        }

        self.set_phase(Phase::Uploading);
        let key = format!("resumes/{}", Uuid::new_v4());
        let on_progress = self.progress.handle(file.id);
        let resume_url = match self.store.put(&key, file.bytes.clone(), on_progress).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Upload of {} failed: {e}", file.name);
                self.fail();
                return Err(SubmitError::Upload {
                    file_id: file.id,
                    file_name: file.name,
                });
            }
        };

        self.set_phase(Phase::Creating);
        let request = CreateAccount {
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            resume_url,
        };
        match self.api.create_account(&request).await {
            Ok(()) => {
                self.reset();
                Ok(())
            }
            Err(e) => {
                error!("Account create failed: {e}");
                self.fail();
                Err(SubmitError::Create { record: "account" })
            }
        }
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.lock().expect("phase lock poisoned") = phase;
    }

    /// Terminal success: all transient state goes at once.
    fn reset(&mut self) {
        self.intake.clear();
        self.progress.clear();
        self.set_phase(Phase::Idle);
    }

    /// Terminal failure: pending files survive so the user can resubmit,
    /// but stale progress is dropped so the busy signal clears.
    fn fail(&self) {
        self.progress.clear();
        self.set_phase(Phase::Idle);
    }
}

/// The availability check is advisory: a transport failure counts as
/// unavailable (fail closed) rather than letting uploads start against a
/// dead backend.
fn fail_closed(field: &str, result: Result<bool, crate::api::ApiCallError>) -> bool {
    match result {
        Ok(available) => available,
        Err(e) => {
            warn!("Availability check for {field} failed, treating as taken: {e}");
            false
        }
    }
}
