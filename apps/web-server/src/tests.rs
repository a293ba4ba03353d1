//! HTTP behaviour of the routing table.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};

use yatube_core::domain::{Group, Identity, User};
use yatube_core::ports::{
    FollowRepository, GroupRepository, PostFilter, PostRepository, SystemClock, TokenService,
    UserRepository,
};
use yatube_core::services::PostDraft;
use yatube_infra::{InMemoryCache, InMemoryStore, JwtConfig, JwtTokenService, ManualClock};

use crate::config::AppConfig;
use crate::handlers::configure_routes;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::{AppState, Repositories};

struct Site {
    state: AppState,
    store: InMemoryStore,
    cache_clock: Arc<ManualClock>,
    tokens: Arc<JwtTokenService>,
}

impl Site {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let cache_clock = Arc::new(ManualClock::new(Utc::now()));
        let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));

        let state = AppState::assemble(
            Repositories::in_memory(&store),
            Arc::new(InMemoryCache::with_clock(cache_clock.clone())),
            Arc::new(SystemClock),
            tokens.clone(),
            &AppConfig::default(),
        );

        Self {
            state,
            store,
            cache_clock,
            tokens,
        }
    }

    async fn user(&self, username: &str) -> Identity {
        let user = self
            .store
            .users
            .save(User::new(username, Utc::now()))
            .await
            .unwrap();
        Identity::from(&user)
    }

    async fn group(&self, slug: &str) -> Group {
        self.store
            .groups
            .save(Group::new(format!("Group {slug}"), slug, "Test group"))
            .await
            .unwrap()
    }

    async fn post(&self, author: &Identity, text: &str) -> yatube_core::domain::Post {
        self.state
            .content
            .create_post(author, PostDraft::new(text))
            .await
            .unwrap()
    }

    fn bearer(&self, who: &Identity) -> (header::HeaderName, String) {
        let token = self.tokens.generate_token(who).unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }
}

macro_rules! app {
    ($site:expr) => {
        test::init_service(
            App::new()
                .wrap(NormalizePath::new(TrailingSlash::Always))
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($site.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

macro_rules! body {
    ($app:expr, $req:expr $(,)?) => {
        String::from_utf8(
            test::call_and_read_body(&$app, $req.to_request())
                .await
                .to_vec(),
        )
        .unwrap()
    };
}

#[actix_web::test]
async fn home_page_lists_posts() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    site.post(&ivanov, "Текст поста").await;
    let app = app!(site);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Текст поста"));
    assert!(body.contains(r#"href="/ivanov/""#));
}

#[actix_web::test]
async fn home_page_is_cached_until_ttl_expires() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    site.post(&ivanov, "Post C").await;
    let app = app!(site);

    let first = body!(app, test::TestRequest::get().uri("/"));
    site.post(&ivanov, "Post D").await;
    let second = body!(app, test::TestRequest::get().uri("/"));

    assert_eq!(first, second);
    assert!(!second.contains("Post D"));

    site.cache_clock.advance(TimeDelta::seconds(20));
    let third = body!(app, test::TestRequest::get().uri("/"));
    assert!(third.contains("Post C"));
    assert!(third.contains("Post D"));
}

#[actix_web::test]
async fn home_page_paginates_by_ten() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    for i in 0..16 {
        site.post(&ivanov, &format!("entry-{i:02}")).await;
    }
    let app = app!(site);

    let page_one = body!(app, test::TestRequest::get().uri("/"));
    let page_two = body!(app, test::TestRequest::get().uri("/?page=2"));
    let beyond = body!(app, test::TestRequest::get().uri("/?page=99"));

    assert_eq!(page_one.matches("<article>").count(), 10);
    assert_eq!(page_two.matches("<article>").count(), 6);
    assert!(page_two.contains("Page 2 of 2"));
    assert_eq!(beyond.matches("<article>").count(), 6);
}

#[actix_web::test]
async fn odd_page_parameters_never_fail_the_listing() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    for i in 0..16 {
        site.post(&ivanov, &format!("entry-{i:02}")).await;
    }
    let app = app!(site);

    let repeated = test::call_service(
        &app,
        test::TestRequest::get().uri("/?page=1&page=2").to_request(),
    )
    .await;
    assert_eq!(repeated.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(repeated).await.to_vec()).unwrap();
    assert!(body.contains("Page 2 of 2"));

    for uri in ["/?page=last", "/?page", "/ivanov/?page=1&page=x"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn unknown_group_is_not_found() {
    let site = Site::new();
    let app = app!(site);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/group/unknown-slug/")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Custom 404"));
}

#[actix_web::test]
async fn group_page_shows_only_its_posts() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let cats = site.group("cats").await;
    site.group("empty").await;
    site.state
        .content
        .create_post(&ivanov, PostDraft::new("about cats").with_group(cats.id))
        .await
        .unwrap();
    site.post(&ivanov, "ungrouped").await;
    let app = app!(site);

    let cats_page = body!(app, test::TestRequest::get().uri("/group/cats"));
    let empty = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/empty/").to_request(),
    )
    .await;

    assert!(cats_page.contains("about cats"));
    assert!(!cats_page.contains("ungrouped"));
    assert_eq!(empty.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unmatched_paths_and_bad_ids_are_not_found() {
    let site = Site::new();
    site.user("ivanov").await;
    let app = app!(site);

    for uri in ["/nobody/", "/ivanov/not-a-uuid/", "/a/b/c/d/e/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn anonymous_callers_are_sent_to_login() {
    let site = Site::new();
    site.user("ivanov").await;
    let app = app!(site);

    let cases = [
        ("/new/", "/auth/login/?next=%2Fnew%2F"),
        ("/follow/", "/auth/login/?next=%2Ffollow%2F"),
        ("/ivanov/follow/", "/auth/login/?next=%2Fivanov%2Ffollow%2F"),
    ];
    for (uri, expected) in cases {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&resp), expected);
    }
}

#[actix_web::test]
async fn create_post_redirects_home() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let cats = site.group("cats").await;
    let app = app!(site);
    let group = cats.id.to_string();

    let req = test::TestRequest::post()
        .uri("/new/")
        .insert_header(site.bearer(&ivanov))
        .set_form([
            ("text", "fresh post"),
            ("group", group.as_str()),
            ("image", ""),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let stored = site
        .store
        .posts
        .list(&PostFilter::All, 0, 10)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, "fresh post");
    assert_eq!(stored[0].group_id, Some(cats.id));
    assert_eq!(stored[0].author_id, ivanov.user_id);
}

#[actix_web::test]
async fn invalid_post_form_is_rendered_again() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri("/new/")
        .insert_header(site.bearer(&ivanov))
        .set_form([("text", "   "), ("group", "")]);
    let body = body!(app, req);
    assert!(body.contains("This field is required."));

    let unknown_group = uuid::Uuid::new_v4().to_string();
    let req = test::TestRequest::post()
        .uri("/new/")
        .insert_header(site.bearer(&ivanov))
        .set_form([("text", "text"), ("group", unknown_group.as_str())]);
    let body = body!(app, req);
    assert!(body.contains("Select a valid choice."));

    assert_eq!(site.store.posts.count(&PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn session_cookie_authenticates() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let app = app!(site);
    let token = site.tokens.generate_token(&ivanov).unwrap();

    let req = test::TestRequest::get()
        .uri("/new/")
        .cookie(Cookie::new("session", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn author_edit_replaces_content() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let post = site.post(&ivanov, "before").await;
    let app = app!(site);
    let uri = format!("/ivanov/{}/edit/", post.id);

    let form = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(site.bearer(&ivanov))
            .to_request(),
    )
    .await;
    assert_eq!(form.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(site.bearer(&ivanov))
        .set_form([("text", "after")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/ivanov/{}/", post.id));

    let stored = site.store.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "after");
    assert_eq!(stored.created_at, post.created_at);
}

#[actix_web::test]
async fn non_author_edit_redirects_to_profile() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let petrov = site.user("petrov").await;
    let post = site.post(&ivanov, "original").await;
    let app = app!(site);
    let uri = format!("/ivanov/{}/edit/", post.id);

    let get = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(site.bearer(&petrov))
            .to_request(),
    )
    .await;
    let post_req = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(site.bearer(&petrov))
            .set_form([("text", "hijacked")])
            .to_request(),
    )
    .await;

    for resp in [get, post_req] {
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/ivanov/");
    }
    let stored = site.store.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "original");
}

#[actix_web::test]
async fn edit_of_unknown_author_or_post_is_not_found() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let app = app!(site);

    let unknown_user = format!("/ghost/{}/edit/", uuid::Uuid::new_v4());
    let unknown_post = format!("/ivanov/{}/edit/", uuid::Uuid::new_v4());
    for uri in [unknown_user, unknown_post] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(site.bearer(&ivanov))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn comment_on_detail_page_redirects_back() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let petrov = site.user("petrov").await;
    let post = site.post(&ivanov, "discuss me").await;
    let app = app!(site);
    let uri = format!("/ivanov/{}/", post.id);

    let anonymous = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .set_form([("text", "hi")])
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::FOUND);
    assert!(location(&anonymous).starts_with("/auth/login/?next="));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(site.bearer(&petrov))
            .set_form([("text", "great post")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), uri);

    let page = body!(app, test::TestRequest::get().uri(&uri));
    assert!(page.contains("great post"));
    assert!(page.contains(r#"href="/petrov/""#));
}

#[actix_web::test]
async fn comment_view_redirects_to_itself() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let post = site.post(&ivanov, "discuss me").await;
    let app = app!(site);
    let uri = format!("/ivanov/{}/comment/", post.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(site.bearer(&ivanov))
            .set_form([("text", "self reply")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), uri);

    let page = body!(
        app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(site.bearer(&ivanov)),
    );
    assert!(page.contains("self reply"));

    let blank = body!(
        app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(site.bearer(&ivanov))
            .set_form([("text", "")]),
    );
    assert!(blank.contains("This field is required."));
    assert_eq!(
        site.state
            .comments
            .list_comments(post.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[actix_web::test]
async fn comment_on_missing_post_is_not_found() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let app = app!(site);

    let req = test::TestRequest::post()
        .uri(&format!("/ivanov/{}/comment/", uuid::Uuid::new_v4()))
        .insert_header(site.bearer(&ivanov))
        .set_form([("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn follow_unfollow_and_feed() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let petrov = site.user("petrov").await;
    let app = app!(site);

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/ivanov/follow/")
                .insert_header(site.bearer(&petrov))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/ivanov/");
    }
    assert_eq!(site.store.follows.len().await, 1);

    site.post(&ivanov, "Post B").await;
    let petrov_feed = body!(
        app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(site.bearer(&petrov)),
    );
    let ivanov_feed = body!(
        app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(site.bearer(&ivanov)),
    );
    assert!(petrov_feed.contains("Post B"));
    assert!(!ivanov_feed.contains("Post B"));

    let profile = body!(
        app,
        test::TestRequest::get()
            .uri("/ivanov/")
            .insert_header(site.bearer(&petrov)),
    );
    assert!(profile.contains("/ivanov/unfollow/"));
    assert!(profile.contains("Total posts: 1"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/ivanov/unfollow/")
            .insert_header(site.bearer(&petrov))
            .to_request(),
    )
    .await;
    assert_eq!(location(&resp), "/ivanov/");
    assert!(
        !site
            .store
            .follows
            .exists(petrov.user_id, ivanov.user_id)
            .await
            .unwrap()
    );
}

#[actix_web::test]
async fn self_follow_changes_nothing() {
    let site = Site::new();
    let ivanov = site.user("ivanov").await;
    let app = app!(site);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/ivanov/follow/")
            .insert_header(site.bearer(&ivanov))
            .to_request(),
    )
    .await;

    assert_eq!(location(&resp), "/ivanov/");
    assert!(site.store.follows.is_empty().await);
}

#[actix_web::test]
async fn non_ascii_usernames_are_percent_encoded_in_links() {
    let site = Site::new();
    let ivanov = site.user("иванов").await;
    let petrov = site.user("petrov").await;
    let post = site.post(&ivanov, "Текст поста").await;
    let app = app!(site);
    let encoded = "%D0%B8%D0%B2%D0%B0%D0%BD%D0%BE%D0%B2";

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/{encoded}/follow/"))
            .insert_header(site.bearer(&petrov))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/{encoded}/"));
    assert!(
        site.store
            .follows
            .exists(petrov.user_id, ivanov.user_id)
            .await
            .unwrap()
    );

    let home = body!(app, test::TestRequest::get().uri("/"));
    assert!(home.contains(&format!(r#"href="/{encoded}/{}/""#, post.id)));
    assert!(home.contains(">иванов</a>"));
}

#[actix_web::test]
async fn about_pages_render() {
    let site = Site::new();
    let app = app!(site);

    for uri in ["/about/author/", "/about/tech/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn request_id_is_echoed() {
    let site = Site::new();
    let app = app!(site);

    let req = test::TestRequest::get()
        .uri("/about/tech/")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");

    let req = test::TestRequest::get().uri("/about/tech/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}
