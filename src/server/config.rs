use super::{ErrorPolicy, RequestsLoggingLevel};

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub error_policy: ErrorPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            error_policy: ErrorPolicy::Respond,
        }
    }
}
