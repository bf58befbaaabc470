use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{Access, Role};
use crate::handlers::{elevated, protected, public};
use crate::middleware::{authenticate, enforce};
use crate::state::AppState;

/// The full HTTP surface. Every route group carries its access requirement
/// as a route layer; identity is resolved once, globally.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        .route("/", get(public::root::welcome))
        .route("/health", get(public::root::health))
        .merge(public_routes())
        .merge(member_routes())
        .merge(course_member_routes())
        .merge(admin_routes())
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use axum::routing::post;
    use public::{contact, course, engage, forum, gallery, portfolio, story};

    Router::new()
        .route("/ceramicstory", get(story::list))
        .route("/ceramicstory/:id_or_slug", get(story::get))
        .route("/gallery/artworks", get(gallery::artworks))
        .route("/gallery/artworks/:id", get(gallery::artwork))
        .route("/gallery/artists", get(gallery::artists))
        .route("/gallery/artists/:id", get(gallery::artist))
        .route("/gallery/categories", get(gallery::categories))
        .route("/engage", get(engage::list))
        .route("/engage/:id_or_slug", get(engage::get))
        .route("/courses", get(course::list))
        .route("/courses/:id", get(course::detail))
        .route("/courses/:id/chapters/:chapter_id", get(course::chapter_preview))
        .route("/forum/posts", get(forum::posts))
        .route("/forum/posts/search", get(forum::search))
        .route("/forum/posts/:id", get(forum::post))
        .route("/forum/posts/:id/comments", get(forum::comments))
        .route("/forum/topics", get(forum::topics))
        .route("/forum/categories", get(forum::categories))
        .route("/portfolio", get(portfolio::list))
        .route("/portfolio/:id", get(portfolio::get))
        .route("/contact", post(contact::submit))
}

fn member_routes() -> Router<AppState> {
    use axum::routing::{delete, post, put};
    use protected::{forum, gallery, note, portfolio, profile};

    Router::new()
        .route("/profile", get(profile::get).put(profile::put))
        .route("/profile/notifications", get(profile::notifications))
        .route("/profile/notifications/:id/read", post(profile::notification_read))
        .route("/profile/favorite-artworks", get(profile::favorite_artworks))
        .route("/profile/saved-posts", get(profile::saved_posts))
        .route("/profile/notes", get(note::list).post(note::create))
        .route("/profile/notes/:id", get(note::get).put(note::put).delete(note::delete))
        .route("/profile/notes/:id/publish", post(note::publish))
        .route("/profile/notes/:id/links", post(note::add_link))
        .route("/profile/notes/:id/links/:link_id", delete(note::remove_link))
        .route(
            "/gallery/artworks/:id/favorite",
            post(gallery::favorite).delete(gallery::unfavorite),
        )
        .route("/gallery/artworks/:id/notes", post(gallery::add_note))
        .route("/forum/posts", post(forum::create_post))
        .route("/forum/posts/:id", put(forum::update_post).delete(forum::delete_post))
        .route("/forum/posts/:id/comments", post(forum::create_comment))
        .route("/forum/posts/:id/like", post(forum::like_post).delete(forum::unlike_post))
        .route("/forum/posts/:id/save", post(forum::save_post).delete(forum::unsave_post))
        .route(
            "/forum/comments/:id",
            put(forum::update_comment).delete(forum::delete_comment),
        )
        .route(
            "/forum/comments/:id/like",
            post(forum::like_comment).delete(forum::unlike_comment),
        )
        .route("/portfolio/works", post(portfolio::create))
        .route("/portfolio/works/:id", put(portfolio::put).delete(portfolio::delete))
        .route("/portfolio/works/:id/kudos", post(portfolio::kudos))
        .route_layer(from_fn_with_state(Access::Authenticated, enforce))
}

fn course_member_routes() -> Router<AppState> {
    use axum::routing::post;
    use protected::course;

    Router::new()
        .route("/courses/:id/enroll", post(course::enroll))
        .route("/courses/:id/chapters/:chapter_id/full", get(course::full_chapter))
        .route("/courses/:id/chapters/:chapter_id/progress", post(course::progress))
        .route("/courses/:id/chapters/:chapter_id/notes", post(course::add_note))
        .route(
            "/courses/:id/chapters/:chapter_id/quizzes/:quiz_id/submit",
            post(course::submit_quiz),
        )
        .route_layer(from_fn_with_state(Access::Role(Role::NormalUser), enforce))
}

fn admin_routes() -> Router<AppState> {
    use axum::routing::{delete, post, put};
    use elevated::{dashboard, moderation, story, user};

    Router::new()
        .route("/admin/users", get(user::list))
        .route("/admin/users/:user_id/role", put(user::set_role))
        .route("/admin/dashboard/student-progress", get(dashboard::student_progress))
        .route("/admin/ceramicstory", post(story::create))
        .route("/admin/ceramicstory/:id", put(story::put).delete(story::delete))
        .route("/admin/forum/posts/:id", delete(moderation::delete_post))
        .route("/admin/forum/posts/:id/pin", post(moderation::pin_post))
        .route("/admin/forum/posts/:id/archive", post(moderation::archive_post))
        .route("/admin/portfolio/works/:id/highlight", post(moderation::highlight_work))
        .route_layer(from_fn_with_state(Access::Role(Role::Admin), enforce))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .allow_credentials(true)
}
