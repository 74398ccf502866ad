//! Content module - locating, fetching, splitting and rendering content files

pub mod components;
mod frontmatter;
pub mod include;
mod index;
mod item;
pub mod loader;
pub mod locator;
mod markdown;
pub mod paths;
pub mod source;

pub use components::{BlockKind, ComponentTable};
pub use frontmatter::FrontMatter;
pub use index::{FrontmatterIndex, IndexEntry};
pub use item::ContentItem;
pub use locator::{locate, Location};
pub use markdown::{Heading, MarkdownRenderer, RenderTree};
pub use paths::StaticPaths;
pub use source::{ContentSource, LocalSource, RemoteSource};
