/// How the tracing subscriber is set up. JSON output is meant for
/// production log shipping; the compact format is for terminals.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let environment =
            std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let json_format = environment == "production"
            || std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
        Self {
            environment,
            json_format,
        }
    }
}
