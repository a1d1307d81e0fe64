/// Business logic layer for content-api
///
/// - Content service: cached content reads, store-first writes with invalidation
/// - User service: signup, profile reads and updates (never cached)
pub mod content;
pub mod users;

pub use content::ContentService;
pub use users::UserService;
