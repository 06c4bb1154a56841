//! User accounts, their member records, and the trust-level capability table.

pub mod domain;
pub mod permissions;
pub mod repository;
pub mod service;

pub use domain::{Member, RegisterAccount, TrustLevel, User, UserId};
pub use permissions::{authorize, AuthorizationError, Capability, PERMISSION_TABLE_VERSION};
pub use repository::AccountRepository;
pub use service::{AccountError, AccountService};
