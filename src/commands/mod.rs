//! Command implementations behind the CLI

pub mod build;
pub mod clean;
pub mod files;
pub mod frontmatter;
pub mod init;
pub mod list;
