use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, OnConflict};
use sea_orm::*;

use super::{
    Author, BlobRecord, EventDraft, EventRecord, EventRevision, EventScope, EventStore, LikeWrite,
    Page, PageRequest, ProfileRecord,
};
use crate::entity::{blob, county, event, event_like, user, user_profile};

/// [`EventStore`] backed by the relational database.
#[derive(Clone)]
pub struct SeaOrmEventStore {
    db: DatabaseConnection,
}

impl SeaOrmEventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn insert_blobs<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    blobs: &[BlobRecord],
) -> Result<(), DbErr> {
    if blobs.is_empty() {
        return Ok(());
    }
    let rows = blobs.iter().map(|b| blob::ActiveModel {
        event_id: Set(event_id),
        filename: Set(b.filename.clone()),
        place_order: Set(b.place_order),
        ..Default::default()
    });
    blob::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

async fn current_likes<C: ConnectionTrait>(db: &C, event_id: i32) -> Result<i32, DbErr> {
    let likes = event::Entity::find_by_id(event_id)
        .select_only()
        .column(event::Column::Likes)
        .into_tuple::<i32>()
        .one(db)
        .await?;
    Ok(likes.unwrap_or(0))
}

/// Attach counties, authors and blobs to a batch of event rows with one
/// query per related table.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    events: Vec<event::Model>,
) -> Result<Vec<EventRecord>, DbErr> {
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let event_ids: Vec<i32> = events.iter().map(|e| e.id).collect();
    let county_ids: Vec<i32> = events.iter().map(|e| e.county_id).collect();
    let profile_ids: Vec<i32> = events.iter().map(|e| e.profile_id).collect();

    let counties: HashMap<i32, county::Model> = county::Entity::find()
        .filter(county::Column::Id.is_in(county_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let profiles = user_profile::Entity::find()
        .filter(user_profile::Column::Id.is_in(profile_ids))
        .all(db)
        .await?;
    let users: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(profiles.iter().map(|p| p.user_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let authors: HashMap<i32, Author> = profiles
        .into_iter()
        .filter_map(|p| {
            users.get(&p.user_id).map(|u| {
                (
                    p.id,
                    Author {
                        username: u.username.clone(),
                        first_name: u.first_name.clone(),
                        last_name: u.last_name.clone(),
                    },
                )
            })
        })
        .collect();

    let mut blobs: HashMap<i32, Vec<BlobRecord>> = HashMap::new();
    for b in blob::Entity::find()
        .filter(blob::Column::EventId.is_in(event_ids))
        .order_by_asc(blob::Column::EventId)
        .order_by_asc(blob::Column::PlaceOrder)
        .all(db)
        .await?
    {
        blobs.entry(b.event_id).or_default().push(BlobRecord {
            filename: b.filename,
            place_order: b.place_order,
        });
    }

    Ok(events
        .into_iter()
        .map(|e| EventRecord {
            county: counties.get(&e.county_id).cloned(),
            author: authors.get(&e.profile_id).cloned(),
            blobs: blobs.remove(&e.id).unwrap_or_default(),
            id: e.id,
            title: e.title,
            content: e.content,
            event_type: e.event_type,
            profile_id: e.profile_id,
            likes: e.likes,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
        .collect())
}

async fn profile_with_user<C: ConnectionTrait>(
    db: &C,
    profile: Option<user_profile::Model>,
) -> Result<Option<ProfileRecord>, DbErr> {
    let Some(profile) = profile else {
        return Ok(None);
    };
    let Some(owner) = user::Entity::find_by_id(profile.user_id).one(db).await? else {
        return Ok(None);
    };
    Ok(Some(ProfileRecord {
        id: profile.id,
        user_id: profile.user_id,
        username: owner.username,
    }))
}

#[async_trait]
impl EventStore for SeaOrmEventStore {
    async fn find_event(&self, id: i32) -> Result<Option<EventRecord>, DbErr> {
        let Some(model) = event::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(hydrate(&self.db, vec![model]).await?.pop())
    }

    async fn list_events(
        &self,
        scope: EventScope,
        page: PageRequest,
    ) -> Result<Page<EventRecord>, DbErr> {
        let select = match scope {
            EventScope::County(id) => event::Entity::find().filter(event::Column::CountyId.eq(id)),
            EventScope::Profile(id) => {
                event::Entity::find().filter(event::Column::ProfileId.eq(id))
            }
        };

        let total = select
            .clone()
            .paginate(&self.db, page.per_page)
            .num_items()
            .await?;

        let models = select
            .order_by_desc(event::Column::CreatedAt)
            .order_by_desc(event::Column::Id)
            .offset(Some(page.offset()))
            .limit(Some(page.per_page))
            .all(&self.db)
            .await?;

        Ok(Page {
            items: hydrate(&self.db, models).await?,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, DbErr> {
        let Some(owner) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let profile = user_profile::Entity::find()
            .filter(user_profile::Column::UserId.eq(owner.id))
            .one(&self.db)
            .await?;
        Ok(profile.map(|p| ProfileRecord {
            id: p.id,
            user_id: owner.id,
            username: owner.username,
        }))
    }

    async fn find_profile_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Option<ProfileRecord>, DbErr> {
        let profile = user_profile::Entity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        profile_with_user(&self.db, profile).await
    }

    async fn find_county(&self, id: i32) -> Result<Option<county::Model>, DbErr> {
        county::Entity::find_by_id(id).one(&self.db).await
    }

    async fn find_county_by_key(&self, key: &str) -> Result<Option<county::Model>, DbErr> {
        county::Entity::find()
            .filter(county::Column::CountyKey.eq(key))
            .one(&self.db)
            .await
    }

    async fn insert_event(&self, draft: EventDraft) -> Result<i32, DbErr> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        let model = event::ActiveModel {
            title: Set(draft.title),
            content: Set(draft.content),
            event_type: Set(draft.event_type),
            county_id: Set(draft.county_id),
            profile_id: Set(draft.profile_id),
            likes: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_blobs(&txn, model.id, &draft.blobs).await?;
        txn.commit().await?;

        Ok(model.id)
    }

    async fn replace_event(&self, id: i32, revision: EventRevision) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        let Some(model) = event::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        let mut active: event::ActiveModel = model.into();
        active.title = Set(revision.title);
        active.content = Set(revision.content);
        active.event_type = Set(revision.event_type);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&txn).await?;

        blob::Entity::delete_many()
            .filter(blob::Column::EventId.eq(id))
            .exec(&txn)
            .await?;
        insert_blobs(&txn, id, &revision.blobs).await?;

        txn.commit().await?;
        Ok(true)
    }

    async fn delete_event(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        blob::Entity::delete_many()
            .filter(blob::Column::EventId.eq(id))
            .exec(&txn)
            .await?;
        event_like::Entity::delete_many()
            .filter(event_like::Column::EventId.eq(id))
            .exec(&txn)
            .await?;
        let res = event::Entity::delete_by_id(id).exec(&txn).await?;

        if res.rows_affected == 0 {
            return Ok(false);
        }
        txn.commit().await?;
        Ok(true)
    }

    async fn has_liked(&self, event_id: i32, profile_id: i32) -> Result<bool, DbErr> {
        let found = event_like::Entity::find_by_id((event_id, profile_id))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn add_like(
        &self,
        event_id: i32,
        profile_id: i32,
    ) -> Result<Option<LikeWrite>, DbErr> {
        let txn = self.db.begin().await?;

        let result = event_like::Entity::insert(event_like::ActiveModel {
            event_id: Set(event_id),
            profile_id: Set(profile_id),
            created_at: Set(chrono::Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([event_like::Column::EventId, event_like::Column::ProfileId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await;

        let applied = match result {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => {
                // Event deleted after the caller looked it up; the aborted txn rolls back on drop.
                if let Some(SqlErr::ForeignKeyConstraintViolation(detail)) = e.sql_err() {
                    tracing::debug!(event_id, %detail, "like target vanished");
                    return Ok(None);
                }
                return Err(e);
            }
        };

        if applied {
            event::Entity::update_many()
                .col_expr(
                    event::Column::Likes,
                    Expr::col(event::Column::Likes).add(1),
                )
                .filter(event::Column::Id.eq(event_id))
                .exec(&txn)
                .await?;
        } else {
            tracing::debug!(event_id, profile_id, "like already present, counter unchanged");
        }

        let likes = current_likes(&txn, event_id).await?;
        txn.commit().await?;
        Ok(Some(LikeWrite { applied, likes }))
    }

    async fn remove_like(&self, event_id: i32, profile_id: i32) -> Result<LikeWrite, DbErr> {
        let txn = self.db.begin().await?;

        let res = event_like::Entity::delete_many()
            .filter(event_like::Column::EventId.eq(event_id))
            .filter(event_like::Column::ProfileId.eq(profile_id))
            .exec(&txn)
            .await?;
        let applied = res.rows_affected > 0;

        if applied {
            event::Entity::update_many()
                .col_expr(
                    event::Column::Likes,
                    Expr::col(event::Column::Likes).sub(1),
                )
                .filter(event::Column::Id.eq(event_id))
                .filter(event::Column::Likes.gt(0))
                .exec(&txn)
                .await?;
        }

        let likes = current_likes(&txn, event_id).await?;
        txn.commit().await?;
        Ok(LikeWrite { applied, likes })
    }
}
