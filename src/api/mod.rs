pub mod management_api;

pub use management_api::{ManagementApi, build_http_client};
