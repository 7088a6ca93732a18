mod store;

pub use store::MemoryBlogStore;
