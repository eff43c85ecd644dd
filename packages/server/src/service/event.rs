//! Event lifecycle: creation, revision, deletion, likes and ownership checks.
//!
//! Authorization is the caller's responsibility. [`EventService::update_event`]
//! and [`EventService::delete_event`] act on any existing event; handlers
//! consult [`EventService::can_modify`] first.

use std::sync::Arc;

use common::storage::{MediaStore, validate_media_name};
use tracing::{debug, info, instrument, warn};

use super::caller::Caller;
use super::county::resolve_county;
use super::error::EventError;
use crate::entity::county;
use crate::entity::event::EventType;
use crate::repository::{
    BlobRecord, EventDraft, EventRecord, EventRevision, EventScope, EventStore, Page,
    PageRequest, ProfileRecord,
};

const MAX_TITLE_CHARS: usize = 256;
const MAX_CONTENT_CHARS: usize = 20_000;
const MAX_PICTURES: usize = 20;
const MAX_LINK_CHARS: usize = 2048;

/// Title, body and attachments shared by create and update requests.
#[derive(Debug, Clone, Default)]
pub struct EventContent {
    pub title: String,
    pub content: String,
    pub picture_links: Vec<String>,
    pub video_link: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub county_id: Option<i32>,
    pub body: EventContent,
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    NotFound,
    Liked { likes: i32 },
    Unliked { likes: i32 },
}

/// Derive the event type and its blobs from the supplied links.
///
/// Pictures win over a video; an empty or blank video link counts as absent.
pub fn classify(picture_links: &[String], video_link: Option<&str>) -> (EventType, Vec<BlobRecord>) {
    if !picture_links.is_empty() {
        let blobs = picture_links
            .iter()
            .zip(1..)
            .map(|(link, place_order)| BlobRecord {
                filename: link.clone(),
                place_order,
            })
            .collect();
        return (EventType::Image, blobs);
    }

    match video_link.map(str::trim).filter(|v| !v.is_empty()) {
        Some(video) => (
            EventType::Video,
            vec![BlobRecord {
                filename: video.to_string(),
                place_order: 0,
            }],
        ),
        None => (EventType::Text, Vec::new()),
    }
}

impl EventContent {
    /// Trim text fields and reject values that cannot be stored.
    fn normalized(self) -> Result<Self, EventError> {
        let title = self.title.trim().to_string();
        if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
            return Err(EventError::Validation(format!(
                "Title must be 1-{MAX_TITLE_CHARS} characters"
            )));
        }
        if self.content.chars().count() > MAX_CONTENT_CHARS {
            return Err(EventError::Validation(format!(
                "Content must be at most {MAX_CONTENT_CHARS} characters"
            )));
        }
        if self.picture_links.len() > MAX_PICTURES {
            return Err(EventError::Validation(format!(
                "At most {MAX_PICTURES} pictures per event"
            )));
        }

        let mut picture_links = Vec::with_capacity(self.picture_links.len());
        for link in self.picture_links {
            let link = link.trim();
            if link.is_empty() || link.chars().count() > MAX_LINK_CHARS {
                return Err(EventError::Validation(format!(
                    "Picture links must be 1-{MAX_LINK_CHARS} characters"
                )));
            }
            picture_links.push(link.to_string());
        }

        let video_link = self
            .video_link
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if video_link
            .as_ref()
            .is_some_and(|v| v.chars().count() > MAX_LINK_CHARS)
        {
            return Err(EventError::Validation(format!(
                "Video link must be at most {MAX_LINK_CHARS} characters"
            )));
        }

        Ok(Self {
            title,
            content: self.content,
            picture_links,
            video_link,
        })
    }
}

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    media: Arc<dyn MediaStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { store, media }
    }

    async fn require_profile(&self, caller: &Caller) -> Result<ProfileRecord, EventError> {
        let username = caller
            .username()
            .ok_or(EventError::AuthenticationRequired)?;
        self.store
            .find_profile_by_username(username)
            .await?
            .ok_or_else(|| EventError::ProfileNotFound(username.to_string()))
    }

    /// County by id, accepting ids that lost their leading zeros.
    pub async fn find_county(&self, id: i32) -> Result<Option<county::Model>, EventError> {
        Ok(resolve_county(self.store.as_ref(), id).await?)
    }

    pub async fn get_event(&self, id: i32) -> Result<Option<EventRecord>, EventError> {
        Ok(self.store.find_event(id).await?)
    }

    pub async fn list_by_county(
        &self,
        county_id: i32,
        page: PageRequest,
    ) -> Result<Page<EventRecord>, EventError> {
        Ok(self
            .store
            .list_events(EventScope::County(county_id), page)
            .await?)
    }

    /// Public listing of another user's events.
    pub async fn list_by_user(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Page<EventRecord>, EventError> {
        let profile = self
            .store
            .find_profile_by_user_id(user_id)
            .await?
            .ok_or(EventError::UserNotFound(user_id))?;
        Ok(self
            .store
            .list_events(EventScope::Profile(profile.id), page)
            .await?)
    }

    pub async fn list_mine(
        &self,
        caller: &Caller,
        page: PageRequest,
    ) -> Result<Page<EventRecord>, EventError> {
        let profile = self.require_profile(caller).await?;
        Ok(self
            .store
            .list_events(EventScope::Profile(profile.id), page)
            .await?)
    }

    #[instrument(skip(self, request), fields(title = %request.body.title))]
    pub async fn create_event(
        &self,
        caller: &Caller,
        request: NewEvent,
    ) -> Result<i32, EventError> {
        let profile = self.require_profile(caller).await?;

        let county_id = request.county_id.ok_or(EventError::CountyRequired)?;
        let county = resolve_county(self.store.as_ref(), county_id)
            .await?
            .ok_or(EventError::CountyNotFound(county_id))?;

        let body = request.body.normalized()?;
        let (event_type, blobs) = classify(&body.picture_links, body.video_link.as_deref());

        let id = self
            .store
            .insert_event(EventDraft {
                title: body.title,
                content: body.content,
                event_type,
                county_id: county.id,
                profile_id: profile.id,
                blobs,
            })
            .await?;

        info!(event_id = id, county_id = county.id, ?event_type, "event created");
        Ok(id)
    }

    /// Replace an event's content and attachments. Returns `None` if it does not exist.
    #[instrument(skip(self, body))]
    pub async fn update_event(
        &self,
        id: i32,
        body: EventContent,
    ) -> Result<Option<i32>, EventError> {
        let body = body.normalized()?;
        let (event_type, blobs) = classify(&body.picture_links, body.video_link.as_deref());

        let updated = self
            .store
            .replace_event(
                id,
                EventRevision {
                    title: body.title,
                    content: body.content,
                    event_type,
                    blobs,
                },
            )
            .await?;

        Ok(updated.then_some(id))
    }

    /// Delete an event and then, best effort, the media files its blobs name.
    ///
    /// Rows go first so a database failure never leaves blobs pointing at
    /// removed files. Blobs holding external URLs have no local file.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: i32) -> Result<bool, EventError> {
        let Some(event) = self.store.find_event(id).await? else {
            return Ok(false);
        };

        if !self.store.delete_event(id).await? {
            return Ok(false);
        }

        let names: Vec<&str> = event.blobs.iter().map(|b| b.filename.as_str()).collect();
        self.remove_media(names)
            .await;
        info!(event_id = id, "event deleted");
        Ok(true)
    }

    /// Best-effort removal of uploaded files; failures are logged and skipped.
    pub async fn remove_media<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if validate_media_name(name).is_err() {
                debug!(reference = name, "not a local upload, skipping");
                continue;
            }
            match self.media.delete(name).await {
                Ok(true) => {}
                Ok(false) => warn!(filename = name, "media file already missing"),
                Err(e) => warn!(filename = name, error = %e, "failed to delete media file"),
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn toggle_like(&self, caller: &Caller, id: i32) -> Result<LikeOutcome, EventError> {
        let profile = self.require_profile(caller).await?;

        if self.store.find_event(id).await?.is_none() {
            return Ok(LikeOutcome::NotFound);
        }

        if self.store.has_liked(id, profile.id).await? {
            let write = self.store.remove_like(id, profile.id).await?;
            return Ok(LikeOutcome::Unliked { likes: write.likes });
        }

        match self.store.add_like(id, profile.id).await? {
            Some(write) => Ok(LikeOutcome::Liked { likes: write.likes }),
            None => Ok(LikeOutcome::NotFound),
        }
    }

    /// True iff the caller is authenticated and authored the event.
    pub async fn can_modify(&self, caller: &Caller, id: i32) -> Result<bool, EventError> {
        let Some(username) = caller.username() else {
            return Ok(false);
        };
        let Some(event) = self.store.find_event(id).await? else {
            return Ok(false);
        };
        Ok(event
            .author
            .is_some_and(|author| author.username == username))
    }
}
