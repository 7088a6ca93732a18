pub mod blogs;
pub mod health;
pub mod openapi;
pub mod schemas;
pub mod upload;

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use secrecy::SecretString;
use tokio::sync::Mutex;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use nodal_core::NewBlogPost;
use nodal_media::{ImageStore, MAX_IMAGE_BYTES};
use nodal_store::BlogStore;

use crate::cors::{OriginPolicy, cors_layer};

use self::openapi::ApiDoc;

/// Request bodies may carry a full-size image plus multipart framing, or a
/// bulk-replace payload with inline data URIs.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_BODY_BYTES: usize = (MAX_IMAGE_BYTES as usize) + 6 * 1024 * 1024;

const DEVTOOLS_PATH: &str = "/.well-known/appspecific/com.chrome.devtools.json";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The blog post collection.
    pub store: Arc<dyn BlogStore>,
    /// The active image storage strategy.
    pub images: Arc<dyn ImageStore>,
    /// Posts written when the collection is observed empty.
    pub seed: Arc<Vec<NewBlogPost>>,
    /// Serializes seeding so concurrent first reads insert the seed once.
    pub seed_lock: Arc<Mutex<()>>,
    /// Passcode required by bulk-replace (None disables the check).
    pub passcode: Option<Arc<SecretString>>,
    /// Where uploads are staged before the strategy consumes them.
    pub upload_dir: PathBuf,
    /// Directory served as the static-file fallback.
    pub static_dir: Option<PathBuf>,
    /// Browser origin policy (None leaves CORS headers off).
    pub cors: Option<OriginPolicy>,
}

impl AppState {
    /// State with no seed, no passcode, no static files and no CORS policy.
    pub fn new(store: Arc<dyn BlogStore>, images: Arc<dyn ImageStore>) -> Self {
        Self {
            store,
            images,
            seed: Arc::new(Vec::new()),
            seed_lock: Arc::new(Mutex::new(())),
            passcode: None,
            upload_dir: std::env::temp_dir(),
            static_dir: None,
            cors: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Vec<NewBlogPost>) -> Self {
        self.seed = Arc::new(seed);
        self
    }

    #[must_use]
    pub fn with_passcode(mut self, passcode: Option<&str>) -> Self {
        self.passcode = passcode
            .filter(|p| !p.is_empty())
            .map(|p| Arc::new(SecretString::new(p.to_owned())));
        self
    }

    #[must_use]
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_cors(mut self, policy: OriginPolicy) -> Self {
        self.cors = Some(policy);
        self
    }
}

/// Routes served both at the root and under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/blogs",
            get(blogs::list_blogs).post(blogs::replace_blogs),
        )
        .route("/blogs/", get(blogs::missing_blog_id))
        .route("/blogs/{id}", get(blogs::get_blog))
        .route("/upload-image", post(upload::upload_image))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({
            "error": "Internal server error",
            "details": details,
        })),
    )
        .into_response()
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .route(DEVTOOLS_PATH, get(health::devtools))
        // Swagger UI must be merged before the static fallback.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = state.static_dir.clone() {
        if !dir.exists() {
            tracing::warn!(
                path = %dir.display(),
                "public directory not found, static files will 404 until it exists"
            );
        }
        router = router.fallback_service(ServeDir::new(dir));
    }

    let cors = state.cors.clone();
    let router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(policy) => router.layer(cors_layer(policy)),
        None => router,
    }
}
