use sea_orm::DbErr;

use crate::entity::county;
use crate::repository::EventStore;

/// Zero-padded county keys to try when a numeric id has no direct match.
///
/// Clients send FIPS codes as integers, which loses leading zeros, so `6085`
/// maps to `"06085"` and `123` to `"0123"` then `"00123"`. Ids already five
/// digits or longer, and non-positive ids, have no padded forms.
pub fn county_key_candidates(id: i32) -> Vec<String> {
    if id <= 0 {
        return Vec::new();
    }
    let digits = id.to_string().len();
    [4usize, 5]
        .into_iter()
        .filter(|&width| digits < width)
        .map(|width| format!("{id:0width$}"))
        .collect()
}

/// Look a county up by id, falling back to its zero-padded keys in order.
pub async fn resolve_county(
    store: &dyn EventStore,
    id: i32,
) -> Result<Option<county::Model>, DbErr> {
    if let Some(found) = store.find_county(id).await? {
        return Ok(Some(found));
    }
    for key in county_key_candidates(id) {
        if let Some(found) = store.find_county_by_key(&key).await? {
            tracing::debug!(county_id = id, key = %key, "county resolved by padded key");
            return Ok(Some(found));
        }
    }
    Ok(None)
}
