//! Helper functions for page generation
//!
//! Date formatting, URL building and HTML/XML escaping shared by the
//! static generator and the server.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
