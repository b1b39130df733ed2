//! Application constants
//!
//! Wire-level names and sizes shared by the registry and LMS adapters.

// Registry search protocol
pub const SEARCH_PAGE_FIELD: &str = "Page";
pub const SEARCH_LIMIT_FIELD: &str = "Limit";
pub const SEARCH_TOTAL_FIELD: &str = "TotaltAntalPoster";
pub const SEARCH_PAGE_SIZE: u32 = 100;
pub const SEARCH_PROBE_LIMIT: u32 = 1;

// Registry content negotiation
pub const CATALOG_ENDPOINT_PREFIX: &str = "/kataloginformation";
pub const CATALOG_MEDIA_TYPE: &str = "application/vnd.ladok-kataloginformation+json";
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

// LMS OAuth endpoints, relative to the LMS host
pub const LMS_AUTHORIZE_PATH: &str = "/login/oauth2/auth";
pub const LMS_TOKEN_PATH: &str = "/login/oauth2/token";

// User-facing messages
pub const MASQUERADE_NOT_ALLOWED_MESSAGE: &str =
    "You are not allowed to use this app in Masquerade mode (\"acting as\" a different user)";
pub const NO_ACCESS_DATA_MESSAGE: &str = "No access data found in request or cookie.";
pub const REGISTRY_DENIED_MESSAGE: &str = "You must have permissions to write results in Ladok \
                                           to use this function. Contact ladok@kth.se if you \
                                           need help.";
pub const LMS_DENIED_MESSAGE: &str = "Only teachers, examiners and course responsibles are \
                                      allowed to use this app. Contact it-support@kth.se if \
                                      you need help.";

// Default HTTP timeout applied to both upstreams
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
