/*
 * Responsibility
 * - password: argon2 によるハッシュ化 / 検証
 * - jwt: アクセストークンの署名 / 検証 (HS256, 共有シークレット)
 * - service: signup / login (上記2つを束ねる)
 */
pub mod identity;
pub mod jwt;
pub mod password;
pub mod service;

pub use identity::AuthCtx;
pub use jwt::{AccessTokenClaims, TokenCodec, TokenError};
pub use password::PasswordHasher;
pub use service::{AuthService, IssuedToken};
