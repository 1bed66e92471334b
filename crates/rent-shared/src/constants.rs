//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 15;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const ACCESS_TOKEN_BYTES: usize = 40;
pub const ADMIN_TOKEN_NAME: &str = "admin-token";
pub const TENANT_USER_TOKEN_NAME: &str = "tenant-user-token";
/// One DNS label; also the width of the tenant id column.
pub const MAX_SLUG_LENGTH: usize = 63;
