//! Authentication and authorization: password hashing, session tokens,
//! the `CurrentUser` extractor and the endpoint access policies.

pub mod current_user;
pub mod password;
pub mod policy;
pub mod session;

pub use current_user::CurrentUser;
