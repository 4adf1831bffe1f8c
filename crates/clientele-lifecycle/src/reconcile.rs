//! Orphan reconciliation between client records and the media store.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use clientele_media::MediaError;
use clientele_profile::ProfileError;
use clientele_types::{ImageRef, MediaId};

use crate::error::LifecycleResult;
use crate::lifecycle::ClientLifecycle;

/// Outcome of one reconciliation sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Unreferenced media objects deleted.
    pub orphans_deleted: usize,
    /// Records reset to the placeholder because their picture was gone.
    pub dangling_reset: usize,
}

impl ClientLifecycle {
    /// Repair what non-transactional picture transitions leave behind.
    ///
    /// Media objects no record references are deleted once they are older
    /// than the orphan grace period, which protects uploads still between
    /// `store` and the record update. Records whose picture no longer exists
    /// are reset to the placeholder.
    pub async fn reconcile(&self) -> LifecycleResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        // Records are listed before media so a picture set mid-sweep shows up
        // as a young orphan rather than a dangling reference.
        let refs = self.profiles.image_refs().await?;
        let live: HashSet<MediaId> = self.media.list_ids().await?.into_iter().collect();
        let referenced: HashSet<MediaId> = refs.iter().map(|(_, media)| *media).collect();

        for (client_id, media_id) in refs.iter().filter(|(_, m)| !live.contains(m)) {
            let record = match self.profiles.find_by_id(client_id).await {
                Ok(record) => record,
                Err(ProfileError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            if record.image != ImageRef::Media(*media_id) {
                continue;
            }
            self.profiles.set_image(client_id, ImageRef::Placeholder).await?;
            tracing::warn!(client_id = %client_id, media_id = %media_id, "reset dangling picture reference");
            report.dangling_reset += 1;
        }

        let now = Utc::now();
        for media_id in live.difference(&referenced) {
            let metadata = match self.media.metadata(media_id).await {
                Ok(metadata) => metadata,
                Err(MediaError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            if now - metadata.upload_date < self.orphan_grace {
                continue;
            }
            if self.media.delete(media_id).await {
                tracing::info!(media_id = %media_id, "deleted orphaned media object");
                report.orphans_deleted += 1;
            }
        }

        tracing::info!(
            orphans_deleted = report.orphans_deleted,
            dangling_reset = report.dangling_reset,
            "reconciliation sweep finished"
        );
        Ok(report)
    }
}
