pub mod error;
pub mod post;
pub mod seed;
pub mod types;

pub use error::ValidationError;
pub use post::{BlogPost, BlogPostInput, NewBlogPost, parse_bulk_payload};
pub use seed::{SEED_AUTHOR, SEED_CONTENT, SEED_TITLE, display_date, seed_posts};
pub use types::BlogId;
