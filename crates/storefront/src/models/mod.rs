//! Session-backed view models for the storefront.
//!
//! - [`session`] - What the storefront keeps per browser session
//! - [`flash`] - One-shot notifications shown on the next page render
//! - [`page`] - Layout data every full page needs

pub mod flash;
pub mod page;
pub mod session;

pub use flash::{Flash, FlashKind};
pub use page::PageContext;
pub use session::{CurrentUser, keys};
