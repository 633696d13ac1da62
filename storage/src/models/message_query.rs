//! Query parameters for listing/filtering messages.
//!
//! Used by MessageRepository::get_messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageQuery {
    pub source: Option<String>,
    pub sender: Option<String>,
    /// Raw label, compared case-insensitively.
    pub sentiment: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    /// Pagination offset (used with limit).
    pub offset: Option<i64>,
}
