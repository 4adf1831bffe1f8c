//! Client lifecycle facade for Clientele.
//!
//! [`ClientLifecycle`] is the single entry point an outer layer (HTTP
//! handlers, jobs) talks to. It composes the profile store, the media store,
//! and the credential manager, all passed in at construction:
//!
//! - registration and password authentication, issuing bearer tokens;
//! - social sign-in through an injected [`IdentityVerifier`];
//! - profile reads, with pictures resolved by the [`ProfileAssembler`];
//! - picture set/replace/delete transitions across the record and the
//!   media store;
//! - account deletion and the orphan [reconciliation sweep](ClientLifecycle::reconcile).
//!
//! Picture transitions touch two independently mutable resources and are
//! not transactional. A crash between steps can leave an unreferenced media
//! object or a record pointing at a missing one; the sweep repairs both.

pub mod assembler;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod picture;
pub mod reconcile;

#[cfg(test)]
mod testing;

pub use assembler::ProfileAssembler;
pub use config::LifecycleConfig;
pub use error::{LifecycleError, LifecycleResult};
pub use identity::{IdentityVerifier, ProviderCredentials};
pub use lifecycle::{ClientLifecycle, Registration, RegistrationOutcome};
pub use picture::PictureSlot;
pub use reconcile::ReconcileReport;

pub use clientele_types::ErrorKind;
