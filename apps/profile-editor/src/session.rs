use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::avatar::{AvatarUploader, UploadError};
use crate::draft::{DraftRecord, DraftStore, Hydrator};
use crate::models::{DoctorId, DoctorRecord};
use crate::notify::Notifier;
use crate::submission::{
    ProfileStore, Settlement, SubmissionPipeline, SubmissionState, SubmissionTicket, SubmitError,
};

/// One profile-editing session: the draft, its hydrator and its pipeline.
///
/// Created when editing starts and dropped when it ends; nothing outlives it.
#[derive(Debug, Default)]
pub struct EditingSession {
    hydrator: Hydrator,
    draft: DraftStore,
    pipeline: SubmissionPipeline,
    source: Option<Arc<DoctorRecord>>,
}

impl EditingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session already hydrated from `source`.
    pub fn for_source(source: Option<Arc<DoctorRecord>>) -> Self {
        let mut session = Self::new();
        session.observe_source(source);
        session
    }

    /// Feeds the current source reference. Returns whether the draft was
    /// rehydrated, which discards unsaved edits.
    pub fn observe_source(&mut self, source: Option<Arc<DoctorRecord>>) -> bool {
        let hydrated = self.hydrator.observe(source.as_ref(), &mut self.draft);
        self.source = source;
        hydrated
    }

    pub fn draft(&self) -> &DraftRecord {
        self.draft.record()
    }

    /// Mutable access for scalar and collection edits.
    pub fn edit(&mut self) -> &mut DraftStore {
        &mut self.draft
    }

    pub fn state(&self) -> SubmissionState {
        self.pipeline.state()
    }

    /// The durable id submissions are addressed to. Taken from the source,
    /// never from the draft.
    pub fn target(&self) -> Option<&DoctorId> {
        self.source.as_deref().map(|s| &s.id)
    }

    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, SubmitError> {
        let target = self.target().cloned().ok_or(SubmitError::MissingTarget)?;
        self.pipeline.begin(&target, self.draft.record())
    }

    pub fn settle(&mut self, settlement: &Settlement, notifier: &dyn Notifier) {
        self.pipeline.settle(settlement, notifier);
    }

    /// Reopens the pipeline after a ticket from [`begin_submit`] was dropped
    /// unsent. Returns false if `attempt_id` is not the attempt in flight.
    ///
    /// [`begin_submit`]: EditingSession::begin_submit
    pub fn abandon_submit(&mut self, attempt_id: Uuid) -> bool {
        self.pipeline.abandon(attempt_id)
    }

    /// Begin, send and settle in one call.
    ///
    /// A submission that cannot start for lack of a target is reported to the
    /// notifier as well as returned. A refused duplicate is only returned.
    /// If the returned future is dropped before it completes, the attempt is
    /// abandoned and the session goes back to Idle.
    pub async fn submit(
        &mut self,
        store: &dyn ProfileStore,
        notifier: &dyn Notifier,
    ) -> Result<Settlement, SubmitError> {
        let ticket = match self.begin_submit() {
            Ok(ticket) => ticket,
            Err(SubmitError::AlreadySubmitting) => return Err(SubmitError::AlreadySubmitting),
            Err(e) => {
                notifier.error(&e.user_message());
                return Err(e);
            }
        };

        let mut guard = AbandonOnDrop {
            pipeline: &mut self.pipeline,
            attempt_id: ticket.attempt_id(),
        };
        let settlement = ticket.send(store).await;
        guard.pipeline.settle(&settlement, notifier);
        Ok(settlement)
    }

    /// Uploads a new avatar and stores its URL in the draft.
    /// On any failure the current avatar stays as it was.
    pub async fn upload_avatar(
        &mut self,
        uploader: &dyn AvatarUploader,
        file_name: &str,
        file: Bytes,
    ) -> Result<&str, UploadError> {
        let uploaded = uploader.upload(file_name, file).await.and_then(|image| image.into_url());
        match uploaded {
            Ok(url) => {
                debug!("avatar uploaded: {url}");
                self.draft.set_photo(url);
                Ok(self.draft.record().photo().unwrap_or_default())
            }
            Err(e) => {
                warn!("avatar upload failed: {e}");
                Err(e)
            }
        }
    }
}

/// Abandons its attempt when dropped. A no-op once the attempt has settled.
struct AbandonOnDrop<'a> {
    pipeline: &'a mut SubmissionPipeline,
    attempt_id: Uuid,
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        self.pipeline.abandon(self.attempt_id);
    }
}
