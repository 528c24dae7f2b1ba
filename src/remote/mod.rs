//! 외부 백엔드 REST 클라이언트

pub mod backend_client;

pub use backend_client::BackendClient;
