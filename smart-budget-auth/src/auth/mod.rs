//! Authentication and session management
//!
//! Session state lives entirely in an encrypted HTTP-only cookie holding a
//! [`SessionRecord`]. [`SessionCodec`] writes it after a successful login, reads
//! it on every request, and expires it on logout.

pub mod codec;
pub mod extractors;
pub mod session;

pub use codec::SessionCodec;
pub use extractors::{Authenticated, AuthenticationError, OptionalAuth};
pub use session::{SessionError, SessionRecord};
