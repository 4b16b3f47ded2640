//! Request bodies and query parameters.
//!
//! Bounds are checked again by the core; these types only carry input.

use crate::envelope::ApiResponse;
use quillnote_core::{ListNotesQuery, NoteDraft, PageRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_ITEM_PER_PAGE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

impl From<CreateNoteRequest> for NoteDraft {
    fn from(value: CreateNoteRequest) -> Self {
        NoteDraft::new(value.title, value.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub content: String,
}

impl From<UpdateNoteRequest> for NoteDraft {
    fn from(value: UpdateNoteRequest) -> Self {
        NoteDraft::new(value.title, value.content)
    }
}

/// List query parameters. Missing fields take the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadAllNoteQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_item_per_page")]
    pub item_per_page: u64,
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default = "default_filter_user")]
    pub filter_user: bool,
}

impl Default for ReadAllNoteQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            item_per_page: DEFAULT_ITEM_PER_PAGE,
            include_deleted: false,
            filter_user: true,
        }
    }
}

impl From<ReadAllNoteQuery> for ListNotesQuery {
    fn from(value: ReadAllNoteQuery) -> Self {
        ListNotesQuery {
            page: PageRequest::new(value.page, value.item_per_page),
            include_deleted: value.include_deleted,
            filter_user: value.filter_user,
        }
    }
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_item_per_page() -> u64 {
    DEFAULT_ITEM_PER_PAGE
}

fn default_filter_user() -> bool {
    true
}

/// Decodes a JSON body, or returns the 400 response for malformed input.
pub fn parse_json_body<T: DeserializeOwned>(raw: &str) -> Result<T, ApiResponse> {
    serde_json::from_str(raw)
        .map_err(|err| ApiResponse::failure(400, format!("invalid request body: {err}")))
}
