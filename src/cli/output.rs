//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CatalogError;

/// Map domain errors to a one-line message, with a hint for the lookup failures.
pub fn map_error(e: &CatalogError) -> String {
    match e {
        CatalogError::NoImageMatches(_) => {
            format!("{}\nHint: run `phototag list` to see tracked images", e)
        }
        CatalogError::AmbiguousImage(_) => {
            format!("{}\nHint: select the image by id (#N) or relative path", e)
        }
        CatalogError::TagNotFound(_) => {
            format!("{}\nHint: tags must include the leading '@'", e)
        }
        _ => e.to_string(),
    }
}
