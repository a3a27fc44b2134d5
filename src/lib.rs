pub mod data;
pub mod db;
pub mod entities;
pub mod error;
pub mod jobs;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
#[cfg(not(test))]
use std::num::NonZeroU32;
#[cfg(not(test))]
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
#[cfg(not(test))]
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
#[cfg(not(test))]
use utoipa_swagger_ui::SwaggerUi;

use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CareBridge API",
        version = "0.1.0",
        description = "Donation coordination platform connecting orphanages, donors, and administrators"
    ),
    paths(
        routes::health::health_check,
        routes::issues::create_issue,
        routes::issues::list_issues,
        routes::issues::get_issue,
        routes::issues::update_issue,
        routes::issues::delete_issue,
        routes::donations::create_donation,
        routes::donations::list_donations,
        routes::donations::get_donation,
        routes::donations::update_donation,
        routes::donations::delete_donation,
        routes::orphanages::create_orphanage,
        routes::orphanages::list_orphanages,
        routes::orphanages::get_orphanage,
        routes::orphanages::update_orphanage,
        routes::orphanages::delete_orphanage,
        routes::stories::list_stories,
        routes::stories::get_story,
        routes::stories::get_stats,
        routes::stories::sync_stories
    ),
    components(schemas(
        models::Issue,
        models::Donation,
        models::Orphanage,
        models::SuccessStory,
        models::IssueCategory,
        models::IssueStatus,
        models::Priority,
        models::DonationStatus,
        data::issues::NewIssue,
        data::issues::IssuePatch,
        data::donations::NewDonation,
        data::donations::DonationPatch,
        data::orphanages::NewOrphanage,
        data::orphanages::OrphanagePatch,
        data::success_stories::NewSuccessStory,
        data::success_stories::SuccessStoryPatch,
        jobs::SyncReport,
        jobs::StoryStats
    ))
)]
struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(store: Arc<dyn DocumentStore>) -> Router {
    let api_doc = ApiDoc::openapi();
    let state = AppState { store };

    // --- Define API routes separately ---
    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/issues",
            post(routes::issues::create_issue).get(routes::issues::list_issues),
        )
        .route(
            "/issues/{id}",
            get(routes::issues::get_issue)
                .patch(routes::issues::update_issue)
                .delete(routes::issues::delete_issue),
        )
        .route(
            "/donations",
            post(routes::donations::create_donation).get(routes::donations::list_donations),
        )
        .route(
            "/donations/{id}",
            get(routes::donations::get_donation)
                .patch(routes::donations::update_donation)
                .delete(routes::donations::delete_donation),
        )
        .route(
            "/orphanages",
            post(routes::orphanages::create_orphanage).get(routes::orphanages::list_orphanages),
        )
        .route(
            "/orphanages/{id}",
            get(routes::orphanages::get_orphanage)
                .patch(routes::orphanages::update_orphanage)
                .delete(routes::orphanages::delete_orphanage),
        )
        .route("/success-stories", get(routes::stories::list_stories))
        .route("/success-stories/stats", get(routes::stories::get_stats))
        .route("/success-stories/sync", post(routes::stories::sync_stories))
        .route("/success-stories/{id}", get(routes::stories::get_story))
        .with_state(state);

    // --- Conditionally apply layers and Swagger UI only when NOT running tests ---
    #[cfg(not(test))]
    let (docs_router, rate_limited_api_routes) = {
        let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(std::time::Duration::from_secs(60))
                .burst_size(NonZeroU32::new(30).unwrap().into())
                .finish()
                .unwrap(),
        );
        let rate_limited_api_routes = api_routes.layer(GovernorLayer {
            config: governor_conf,
        });

        (docs_router, rate_limited_api_routes)
    };

    #[cfg(test)]
    let (docs_router, rate_limited_api_routes) = {
        let _ = api_doc;
        (Router::new(), api_routes)
    };

    let mut app = Router::new().merge(rate_limited_api_routes).merge(docs_router);

    #[cfg(not(test))]
    {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}
