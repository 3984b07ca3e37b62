use serde::{Deserialize, Serialize};

use crate::models::sync_info::SyncInfo;
use crate::services::catalog_sync::SyncReport;

#[derive(Deserialize)]
pub struct SyncRequest {
    pub api_url: String,
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub report: SyncReport,
    pub sync_info: SyncInfo,
}
