use tracing_subscriber::EnvFilter;

/// Value of the `component` field on every lifecycle log record.
pub const COMPONENT: &str = "bucket_custom_resource";

pub type LoggingInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// JSON lines on stdout for CloudWatch; `RUST_LOG` overrides the `info` default.
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), LoggingInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_current_span(false)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_installed_subscriber() {
        let _ = init();
        assert!(init().is_err());
    }
}
