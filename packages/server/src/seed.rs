use std::path::Path;

use sea_orm::*;
use sea_query::{Index, PostgresQueryBuilder};
use tracing::info;

use crate::entity::{blob, county, event};
use crate::models::county::CountySeed;

/// Read the county directory from a JSON array of `{id, name, state, key}`.
pub fn load_county_seed(path: &Path) -> anyhow::Result<Vec<CountySeed>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Insert counties that are not yet present. Existing rows are left alone.
pub async fn seed_counties(db: &DatabaseConnection, seeds: &[CountySeed]) -> Result<u32, DbErr> {
    let mut inserted = 0u32;
    for seed in seeds {
        let model = county::ActiveModel {
            id: Set(seed.id),
            name: Set(seed.name.clone()),
            state: Set(seed.state.to_uppercase()),
            county_key: Set(seed.key.clone()),
        };

        let result = county::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(county::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new counties", inserted);
    }

    Ok(inserted)
}

/// Ensure required database indexes exist.
///
/// Schema sync only creates single-column constraints, so composite
/// indexes are created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Blob ordering is unique within an event.
    let blob_order = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_blob_event_order")
        .table(blob::Entity)
        .col(blob::Column::EventId)
        .col(blob::Column::PlaceOrder)
        .to_string(PostgresQueryBuilder);

    // County feed: WHERE county_id = ? ORDER BY created_at DESC
    let county_feed = Index::create()
        .if_not_exists()
        .name("idx_event_county_created")
        .table(event::Entity)
        .col(event::Column::CountyId)
        .col(event::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    // Profile feed: WHERE profile_id = ? ORDER BY created_at DESC
    let profile_feed = Index::create()
        .if_not_exists()
        .name("idx_event_profile_created")
        .table(event::Entity)
        .col(event::Column::ProfileId)
        .col(event::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    for (name, stmt) in [
        ("idx_blob_event_order", blob_order),
        ("idx_event_county_created", county_feed),
        ("idx_event_profile_created", profile_feed),
    ] {
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
