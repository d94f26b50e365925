use tracing::info;
use uuid::Uuid;

use super::model::{ProfileUpdate, User};
use crate::{
    auth::clock::Clock,
    error::{AppError, AppResult},
    store::UserRepo,
};

/// Applies a validated partial profile update to `user_id`'s record.
pub async fn update_profile(
    repo: &dyn UserRepo,
    clock: &dyn Clock,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> AppResult<User> {
    let mut user = repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    update.validate()?.apply(&mut user);
    user.updated_at = clock.now();

    let saved = repo.update(&user).await?.ok_or(AppError::NotFound("User"))?;
    info!(%user_id, "profile updated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::clock::SystemClock, store::MemoryStore, users::model::sample_user};

    #[tokio::test]
    async fn update_keeps_email_and_hash() {
        let store = MemoryStore::new();
        let mut ada = sample_user("Ada", &["Rust"]);
        ada.password_hash = "hash".into();
        UserRepo::insert(&store, &ada).await.unwrap();

        let update = ProfileUpdate {
            name: Some("Ada L.".into()),
            interests: Some(vec!["compilers".into()]),
            ..Default::default()
        };
        let saved = update_profile(&store, &SystemClock, ada.id, &update).await.unwrap();

        assert_eq!(saved.name, "Ada L.");
        assert_eq!(saved.email, ada.email);
        assert_eq!(saved.password_hash, "hash");
        assert_eq!(saved.skills, vec!["Rust"]);
        assert_eq!(saved.interests, vec!["compilers"]);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = update_profile(&store, &SystemClock, Uuid::new_v4(), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
    }
}
