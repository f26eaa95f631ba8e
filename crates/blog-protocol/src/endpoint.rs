/// HTTP endpoint paths for the blog service.
pub mod endpoints {
    pub const RPC_PREFIX: &str = "/twirp";
    pub const SERVICE_NAME: &str = "blog.BlogService";
    pub const SERVICE_PREFIX: &str = "/twirp/blog.BlogService";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}
