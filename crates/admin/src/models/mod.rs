//! Session-backed view models for admin.
//!
//! - [`session`] - The signed-in admin and session keys
//! - [`flash`] - One-shot notifications after a form post
//! - [`page`] - Layout data every console page needs

pub mod flash;
pub mod page;
pub mod session;

pub use flash::{Flash, FlashKind};
pub use page::AdminPage;
pub use session::{CurrentAdmin, keys as session_keys};
