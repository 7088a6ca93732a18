#![allow(clippy::needless_for_each)]

use nodal_core::{BlogPost, BlogPostInput};

use super::schemas::{
    ErrorResponse, HealthResponse, ReplaceBlogsRequest, UploadForm, UploadResponse,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Nodal Blog API",
        version = "0.1.0",
        description = "HTTP API for the Nodal blog: list, replace and fetch posts, and upload images. Every route is also served under `/api`.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Blogs", description = "Blog post collection"),
        (name = "Uploads", description = "Image uploads"),
    ),
    paths(
        super::health::health,
        super::blogs::list_blogs,
        super::blogs::replace_blogs,
        super::blogs::get_blog,
        super::upload::upload_image,
    ),
    components(schemas(
        BlogPost,
        BlogPostInput,
        ErrorResponse,
        HealthResponse,
        ReplaceBlogsRequest,
        UploadForm,
        UploadResponse,
    ))
)]
pub struct ApiDoc;
