//! Image upload handling for Nodal.
//!
//! An accepted upload part is streamed into a [`StagedImage`] temp file by an
//! [`ImageWriter`], then handed to the configured [`ImageStore`] strategy,
//! which returns the string reference that ends up in blog posts.

pub mod cloudinary;
pub mod disk;
pub mod error;
pub mod inline;
pub mod staging;
pub mod store;

pub use cloudinary::{CloudinaryConfig, CloudinaryImageStore};
pub use disk::DiskImageStore;
pub use error::MediaError;
pub use inline::InlineImageStore;
pub use staging::{ImageWriter, MAX_IMAGE_BYTES, StagedImage, is_image_content_type};
pub use store::{ImageStore, StorageStrategy, StoredImage};
