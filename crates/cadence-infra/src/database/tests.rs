#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use cadence_core::domain::{Platform, Post};
    use cadence_core::ports::{
        BaseRepository, IdentityError, PlatformIdentityStore, PostRepository,
    };

    use crate::database::entity::{identity, post};
    use crate::database::postgres_repo::{PostgresIdentityStore, PostgresPostRepository};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn post_model(share_at: Option<DateTime<Utc>>) -> post::Model {
        post::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content: "Hello world".to_owned(),
            share_now: None,
            share_at: share_at.map(Into::into),
            share_start_at: None,
            share_complete_at: None,
            share_on_linkedin: true,
            shared_at_linkedin: None,
            created_at: at(8).into(),
            updated_at: at(8).into(),
        }
    }

    #[tokio::test]
    async fn find_post_by_id() {
        let model = post_model(Some(at(9)));
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let found = result.unwrap();
        assert_eq!(found.id, post_id);
        assert_eq!(found.content, "Hello world");
        assert_eq!(found.share_at, Some(at(9)));
    }

    #[tokio::test]
    async fn find_due_maps_rows_to_domain_posts() {
        let model = post_model(Some(at(9)));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let due = repo.find_due(Platform::Linkedin, at(12)).await.unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, model.id);
        assert!(due[0].requests(Platform::Linkedin));
        assert_eq!(due[0].shared_at(Platform::Linkedin), None);
    }

    #[tokio::test]
    async fn mark_shared_reports_whether_the_marker_was_claimed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PostgresPostRepository::new(db);
        let post_id = Uuid::new_v4();

        let first = repo
            .mark_shared_if_unshared(post_id, Platform::Linkedin, at(12))
            .await
            .unwrap();
        let second = repo
            .mark_shared_if_unshared(post_id, Platform::Linkedin, at(13))
            .await
            .unwrap();

        assert!(first);
        assert!(!second, "a raced attempt must not claim the marker");
    }

    #[tokio::test]
    async fn identity_lookup_returns_the_connected_row() {
        let user_id = Uuid::new_v4();
        let row = identity::Model {
            id: Uuid::new_v4(),
            user_id,
            platform: "linkedin".to_owned(),
            external_urn: "urn:li:person:abc".to_owned(),
            access_token: "token".to_owned(),
            connected_at: at(7).into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let store = PostgresIdentityStore::new(db);

        let found = store
            .connected_identity(user_id, Platform::Linkedin)
            .await
            .unwrap();

        assert_eq!(found.user_id, user_id);
        assert_eq!(found.external_urn, "urn:li:person:abc");
        assert_eq!(found.platform, Platform::Linkedin);
    }

    #[tokio::test]
    async fn identity_lookup_maps_missing_rows_to_not_connected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<identity::Model>::new()])
            .into_connection();
        let store = PostgresIdentityStore::new(db);

        let err = store
            .connected_identity(Uuid::new_v4(), Platform::Linkedin)
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::NotConnected { .. }));
    }
}
