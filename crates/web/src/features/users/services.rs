use storage::Database;
use storage::dto::user::UpsertUserRequest;
use storage::error::Result;
use storage::models::{LiftRecord, User};
use storage::repository::{LiftRepository, UserRepository};

pub async fn find_user(db: &Database, user_id: &str) -> Result<Option<User>> {
    UserRepository::new(db.pool()).find(user_id).await
}

pub async fn upsert_profile(
    db: &Database,
    user_id: &str,
    req: &UpsertUserRequest,
) -> Result<User> {
    UserRepository::new(db.pool())
        .upsert_profile(user_id, req)
        .await
}

pub async fn search_users(db: &Database, prefix: &str, limit: i64) -> Result<Vec<User>> {
    UserRepository::new(db.pool())
        .search_by_display_name(prefix, limit)
        .await
}

/// Public lift history for a profile page, looked up by display name.
pub async fn lifts_by_display_name(
    db: &Database,
    display_name: &str,
) -> Result<Option<Vec<LiftRecord>>> {
    let Some(user) = UserRepository::new(db.pool())
        .find_by_display_name(display_name)
        .await?
    else {
        return Ok(None);
    };

    let lifts = LiftRepository::new(db.pool())
        .list_for_user(&user.user_id)
        .await?;

    Ok(Some(lifts))
}
