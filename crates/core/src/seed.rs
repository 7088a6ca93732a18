//! Default content written when the blog collection is observed empty.

use chrono::NaiveDate;

use crate::post::NewBlogPost;

pub const SEED_TITLE: &str = "Welcome to Nodal";
pub const SEED_CONTENT: &str = "# Welcome\n\nThis is your first blog post.";
pub const SEED_AUTHOR: &str = "Admin";

/// Format a date the way posts display it, e.g. `October 18, 2026`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// The seed list, dated `today`.
pub fn seed_posts(today: NaiveDate) -> Vec<NewBlogPost> {
    vec![
        NewBlogPost::new(SEED_TITLE, SEED_CONTENT)
            .with_date(display_date(today))
            .with_author_name(SEED_AUTHOR),
    ]
}
