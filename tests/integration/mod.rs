//! Integration tests for the phototag naming engine

mod catalog_lifecycle;
mod config_layering;
mod journal_recovery;
mod registry;
mod test_utils;
