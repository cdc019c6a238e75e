pub mod bearer;
pub mod claims;
pub mod clock;
pub mod errors;
pub mod service;

pub use bearer::extract_bearer;
pub use claims::Claims;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use errors::AuthError;
pub use errors::TokenError;
pub use service::TokenService;
