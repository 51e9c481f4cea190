//! Host content records, as handed over by the host's object APIs.

use serde::{Deserialize, Serialize};

pub const ATTACHMENT_POST_TYPE: &str = "attachment";
pub const REVISION_POST_TYPE: &str = "revision";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: u64,
    pub post_type: String,
    pub title: String,
}

impl PostRecord {
    pub fn new(id: u64, post_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            post_type: post_type.into(),
            title: title.into(),
        }
    }

    pub fn is_attachment(&self) -> bool {
        self.post_type == ATTACHMENT_POST_TYPE
    }

    pub fn is_revision(&self) -> bool {
        self.post_type == REVISION_POST_TYPE
    }
}

/// A navigation menu (the term grouping menu items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTerm {
    pub term_id: u64,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u64,
    pub menu_order: u32,
    pub parent_id: Option<u64>,
    pub title: String,
    pub url: String,
}
