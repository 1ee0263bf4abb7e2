//! Application-wide constants

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_MIN_AGE: u32 = 18;
pub const DEFAULT_MAX_AGE: u32 = 100;
pub const MAX_PHOTO_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Response header carrying page metadata as JSON. Lowercase, as header
/// names are stored normalized.
pub const PAGINATION_HEADER: &str = "pagination";
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 604800;
