//! 基础设施层：持有网络资源，只暴露能力

pub mod http_client;

pub use http_client::HttpClient;
