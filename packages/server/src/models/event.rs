use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::county::CountySummary;
use super::shared::Pagination;
use crate::entity::event::EventType;
use crate::repository::{EventRecord, Page};
use crate::service::event::{EventContent, NewEvent};

/// Display name used when an event's author no longer resolves.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Request body for creating an event.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Flood")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Rising water on Main St.")]
    pub content: String,
    /// County FIPS code. Leading zeros may be dropped (`6085` for `06085`).
    #[schema(example = 6085)]
    pub county_id: Option<i32>,
    /// Uploaded image filenames or image URLs, in display order.
    #[serde(default)]
    #[schema(example = json!(["3f2b8c1e-4a51-4c3e-9d4e-7c1a2b3c4d5e.jpg"]))]
    pub picture_links: Vec<String>,
    /// Uploaded video filename or URL. Ignored when pictures are present.
    #[schema(example = json!(null))]
    pub video_link: Option<String>,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        NewEvent {
            county_id: req.county_id,
            body: EventContent {
                title: req.title,
                content: req.content,
                picture_links: req.picture_links,
                video_link: req.video_link,
            },
        }
    }
}

/// Request body for replacing an event's content. Attachments are replaced wholesale.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    #[schema(example = "Flood (update)")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Water is receding.")]
    pub content: String,
    #[serde(default)]
    pub picture_links: Vec<String>,
    pub video_link: Option<String>,
}

impl From<UpdateEventRequest> for EventContent {
    fn from(req: UpdateEventRequest) -> Self {
        EventContent {
            title: req.title,
            content: req.content,
            picture_links: req.picture_links,
            video_link: req.video_link,
        }
    }
}

/// An event as rendered to clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Flood")]
    pub title: String,
    pub content: String,
    pub event_type: EventType,
    pub county: Option<CountySummary>,
    /// Image references ordered by place-order.
    pub picture_links: Vec<String>,
    pub video_link: Option<String>,
    #[schema(example = 3)]
    pub likes: i32,
    #[schema(example = "alice_wonder")]
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRecord> for EventResponse {
    fn from(e: EventRecord) -> Self {
        let (picture_links, video_link) = match e.event_type {
            EventType::Image => (e.blobs.into_iter().map(|b| b.filename).collect(), None),
            EventType::Video => (Vec::new(), e.blobs.into_iter().next().map(|b| b.filename)),
            EventType::Text => (Vec::new(), None),
        };
        let (author_username, author_first_name, author_last_name) = match e.author {
            Some(a) => (a.username, a.first_name, a.last_name),
            None => (UNKNOWN_USER.to_string(), String::new(), String::new()),
        };

        Self {
            id: e.id,
            title: e.title,
            content: e.content,
            event_type: e.event_type,
            county: e.county.map(CountySummary::from),
            picture_links,
            video_link,
            likes: e.likes,
            author_username,
            author_first_name,
            author_last_name,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Paginated list of events.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    pub data: Vec<EventResponse>,
    pub pagination: Pagination,
}

impl From<Page<EventRecord>> for EventListResponse {
    fn from(page: Page<EventRecord>) -> Self {
        let pagination = Pagination::from(&page);
        Self {
            data: page.items.into_iter().map(EventResponse::from).collect(),
            pagination,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventIdResponse {
    #[schema(example = 1)]
    pub id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteEventResponse {
    pub deleted: bool,
}

/// New like state after a toggle.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    #[schema(example = 4)]
    pub likes: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CanModifyResponse {
    pub can_modify: bool,
}
