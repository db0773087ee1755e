//! Doctor profile editor core.
//!
//! Hydrates a draft from a stored profile, edits its scalar fields and its
//! qualification / experience / time-slot collections through one generic
//! mutator, and submits the whole draft as a single `PUT` to the profile
//! service.

pub mod avatar;
pub mod config;
pub mod draft;
pub mod errors;
pub mod models;
pub mod notify;
pub mod session;
pub mod submission;
pub mod telemetry;

pub use avatar::{AvatarUploader, UploadError, UploadedImage};
pub use config::Config;
pub use draft::{
    Collection, CollectionKind, CollectionName, DraftRecord, DraftStore, EntryToken, Experiences,
    Hydrator, ProfileEdit, Qualifications, TicketPrice, TimeSlots,
};
pub use errors::EditError;
pub use models::{DoctorId, DoctorRecord};
pub use notify::{MemoryNotifier, Notice, Notifier, TracingNotifier};
pub use session::EditingSession;
pub use submission::{
    HttpProfileStore, ProfileStore, Settlement, SubmissionPipeline, SubmissionState,
    SubmissionTicket, SubmitError,
};
