pub mod cargo_env {
    pub const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
}

pub mod common {
    pub const DEFAULT_REMOTE_URL: &str = "http://cite.opengeospatial.org/teamengine";
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20 * 60;
    pub const DEFAULT_STORE_DIRECTORY: &str = "suites";
    /// Environment overrides look like `TEAMENGINE_REMOTE__TIMEOUT=30m`.
    pub const ENV_PREFIX: &str = "TEAMENGINE";
    pub const ENV_SEPARATOR: &str = "__";
}
