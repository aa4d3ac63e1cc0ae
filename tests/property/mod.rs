//! Property-based tests for the name codec and image transitions

mod codec;
mod transitions;
