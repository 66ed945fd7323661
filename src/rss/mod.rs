//! RSS reader tool for newsletter research.
//!
//! Fetches a feed, parses it with feed-rs and renders the newest entries as
//! plain text, caching responses for a few hours.

mod client;
mod parser;
mod tool;
mod types;
mod util;

pub use self::client::*;
pub use self::parser::*;
pub use self::tool::*;
pub use self::types::*;
pub use self::util::*;
