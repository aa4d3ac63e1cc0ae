//! phototag: Tag-Encoded Photo Naming
//!
//! Tags live inside image file names (`beach@sun@2019.jpg`). Adding, removing or
//! reverting tags renames the file on disk, records the new name in a per-image
//! history, and rewrites a versioned JSON snapshot of the catalog.

pub mod activity;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod image;
pub mod logging;
pub mod registry;
pub mod scan;
pub mod store;
