//! Persistence boundary for the event workflow.
//!
//! [`EventStore`] works at the level of the event aggregate (event row, its
//! ordered blobs, its likes) so that every multi-row write can be made atomic
//! inside one implementation method.

mod sea;


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::entity::county;
use crate::entity::event::EventType;

pub use sea::SeaOrmEventStore;

/// Display fields of the user behind a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRecord {
    pub filename: String,
    pub place_order: i32,
}

/// An event with everything needed to render it, blobs sorted by place-order.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub event_type: EventType,
    pub county: Option<county::Model>,
    pub profile_id: i32,
    pub author: Option<Author>,
    pub likes: i32,
    pub blobs: Vec<BlobRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new event and its attachments, inserted together.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub content: String,
    pub event_type: EventType,
    pub county_id: i32,
    pub profile_id: i32,
    pub blobs: Vec<BlobRecord>,
}

/// Replacement content for an existing event. The blob set is swapped wholesale.
#[derive(Debug, Clone)]
pub struct EventRevision {
    pub title: String,
    pub content: String,
    pub event_type: EventType,
    pub blobs: Vec<BlobRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    County(i32),
    Profile(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u64 = 20;
    pub const MAX_PER_PAGE: u64 = 100;

    /// Normalize optional query parameters: page >= 1, per_page in 1..=100.
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: Ord::max(page.unwrap_or(1), 1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Rows to skip. Saturates at `i64::MAX`, the largest offset Postgres accepts,
    /// so absurd page numbers yield an empty page.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page)
    }
}

/// Result of a like-row write together with the counter it left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeWrite {
    /// Whether a like row was actually inserted or removed.
    pub applied: bool,
    pub likes: i32,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_event(&self, id: i32) -> Result<Option<EventRecord>, DbErr>;

    /// Newest first.
    async fn list_events(
        &self,
        scope: EventScope,
        page: PageRequest,
    ) -> Result<Page<EventRecord>, DbErr>;

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, DbErr>;

    async fn find_profile_by_user_id(&self, user_id: i32)
    -> Result<Option<ProfileRecord>, DbErr>;

    async fn find_county(&self, id: i32) -> Result<Option<county::Model>, DbErr>;

    async fn find_county_by_key(&self, key: &str) -> Result<Option<county::Model>, DbErr>;

    /// Insert the event row, then its blobs, atomically. Returns the new id.
    async fn insert_event(&self, draft: EventDraft) -> Result<i32, DbErr>;

    /// Overwrite content and type, bump `updated_at`, and replace every blob.
    /// Returns `false` if the event does not exist.
    async fn replace_event(&self, id: i32, revision: EventRevision) -> Result<bool, DbErr>;

    /// Remove the event with its blobs and likes. Returns `false` if absent.
    async fn delete_event(&self, id: i32) -> Result<bool, DbErr>;

    async fn has_liked(&self, event_id: i32, profile_id: i32) -> Result<bool, DbErr>;

    /// Insert the like row if absent and increment the counter in the same
    /// transaction. A concurrent duplicate leaves the counter untouched.
    /// Returns `None` if the event no longer exists.
    async fn add_like(&self, event_id: i32, profile_id: i32)
    -> Result<Option<LikeWrite>, DbErr>;

    /// Remove the like row if present and decrement the counter, never below zero.
    async fn remove_like(&self, event_id: i32, profile_id: i32) -> Result<LikeWrite, DbErr>;
}
