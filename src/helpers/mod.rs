//! Helper functions shared by the pipeline and the templates

mod date;
mod slug;
mod url;

pub use date::*;
pub use slug::*;
pub use url::*;
