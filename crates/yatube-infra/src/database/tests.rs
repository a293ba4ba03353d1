use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

use yatube_core::domain::Post;
use yatube_core::error::RepoError;
use yatube_core::ports::{FollowRepository, PostFilter, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::{PostgresFollowRepository, PostgresPostRepository};

fn post_model(author_id: Uuid, text: &str) -> post::Model {
    post::Model {
        id: Uuid::new_v4(),
        text: text.to_owned(),
        created_at: chrono::Utc::now().into(),
        author_id,
        group_id: None,
        image: Some("posts/test.gif".to_owned()),
    }
}

#[tokio::test]
async fn test_find_post_by_author() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, "Текст поста");
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post: Post = repo
        .find_by_author(author_id, post_id)
        .await
        .unwrap()
        .expect("post should be found");

    assert_eq!(post.id, post_id);
    assert_eq!(post.text, "Текст поста");
    assert_eq!(post.image.as_deref(), Some("posts/test.gif"));
}

#[tokio::test]
async fn test_list_posts_maps_rows() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            post_model(author_id, "second"),
            post_model(author_id, "first"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo
        .list(&PostFilter::Author(author_id), 0, 10)
        .await
        .unwrap();

    let texts: Vec<&str> = posts.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["second", "first"]);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let ghost = Post::new(Uuid::new_v4(), "text".into(), None, None, chrono::Utc::now());

    let result = repo.update(ghost).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_follow_exists_uses_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([(
            "num_items",
            Into::<Value>::into(1i64),
        )])]])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);

    assert!(repo.exists(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
}
