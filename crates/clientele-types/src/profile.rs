use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::client::ClientRecord;
use crate::id::ClientId;
use crate::image::ResolvedImage;

/// Read-only projection of a client record as seen by callers.
///
/// Carries no credential material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub social_id: Option<String>,
    pub user_id: ClientId,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub image: ResolvedImage,
    pub is_admin: bool,
    pub roles: BTreeSet<String>,
}

impl ProfileView {
    /// Project a record, with its picture already resolved.
    pub fn from_record(record: &ClientRecord, image: ResolvedImage) -> Self {
        Self {
            social_id: record.social_id.clone(),
            user_id: record.id,
            email: record.email.clone(),
            display_name: record.display_name.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            image,
            is_admin: record.is_admin,
            roles: record.roles.clone(),
        }
    }
}

/// Identity attributes vouched for by a third-party provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    /// Provider-scoped subject identifier.
    pub social_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub picture_url: Option<String>,
}
