mod error_policy;
mod requests_logging;

pub use error_policy::enforce_error_policy;
pub use requests_logging::{log_requests, RequestsLoggingLevel};
