//! # adminhub-auth
//!
//! Session and token lifecycle management for the AdminHub admin backend.
//!
//! ## Modules
//!
//! - `jwt`: stateless signing and verification of access/refresh tokens
//! - `session`: the session store, the lifecycle manager, and auditing
//! - `device`: request metadata shaping (IP, user agent, region)
//! - `principal`: the authenticated identity and its resolver seam
//! - `password`: Argon2id hashing for the built-in account directory
//!
//! Tokens are capability pointers: a token with a valid signature is only
//! accepted while its id still resolves to a live entry in the store.

pub mod device;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod session;

pub use device::{DeviceInfo, LocalRegionResolver, RegionResolver, extract_bearer};
pub use jwt::{JwtDecoder, JwtEncoder, TokenClaims, TokenCodec};
pub use password::PasswordHasher;
pub use principal::{AccountDirectory, Principal, PrincipalResolver};
pub use session::{
    MemoryAuditor, SessionAuditor, SessionManager, SessionPolicy, SessionRecord, SessionStore,
    TokenPair, TracingAuditor,
};
