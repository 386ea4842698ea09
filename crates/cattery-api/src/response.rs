//! Response envelopes for write actions

use serde::Serialize;

use crate::dto::CatView;

/// Body returned by create, adopt and return-to-shelter.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub former_owner: Option<String>,
    pub cat: CatView,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>, cat: CatView) -> Self {
        Self {
            message: message.into(),
            former_owner: None,
            cat,
        }
    }

    pub fn with_former_owner(mut self, former_owner: String) -> Self {
        self.former_owner = Some(former_owner);
        self
    }
}
