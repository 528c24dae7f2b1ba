//! 계정 (가입, 로그인, 세션, 프로필)

pub mod auth;
pub mod token;

pub use auth::AuthService;
pub use token::{password_digest, TokenSigner};
