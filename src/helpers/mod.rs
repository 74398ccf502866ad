//! Helper functions for page composition
//!
//! URL building and small HTML fragments shared by the navigation and the
//! layout shell.

mod html;
mod url;

pub use html::*;
pub use url::*;
