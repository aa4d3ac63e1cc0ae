//! Name Codec
//!
//! Pure translation between `(base, tags, extension)` and the composed on-disk
//! file name `<base><tag1>...<tagN>.<extension>`.
//!
//! Grammar:
//! - a tag is [`DELIMITER`] followed by one or more characters, none of which is
//!   the delimiter, `.`, a path separator or a control character;
//! - a base is any string without the delimiter or a path separator;
//! - the extension is whatever follows the last `.`, unless that dot is the
//!   first character of the name or the text after it contains the delimiter.

use crate::error::CatalogError;
use unicode_normalization::UnicodeNormalization;

/// Marker that opens every tag segment in a composed name.
pub const DELIMITER: char = '@';

/// A file name split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub base: String,
    pub tags: Vec<String>,
    pub extension: Option<String>,
}

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Check that `tag` is a single, self-delimiting tag segment.
pub fn validate_tag(tag: &str) -> Result<(), CatalogError> {
    let body = tag
        .strip_prefix(DELIMITER)
        .ok_or_else(|| CatalogError::invalid_tag(tag, "must start with '@'"))?;

    if body.is_empty() {
        return Err(CatalogError::invalid_tag(tag, "tag body is empty"));
    }
    if body.contains(DELIMITER) {
        return Err(CatalogError::invalid_tag(tag, "contains more than one '@'"));
    }
    if body.contains('.') {
        return Err(CatalogError::invalid_tag(tag, "must not contain '.'"));
    }
    if body.chars().any(|c| is_path_separator(c) || c.is_control()) {
        return Err(CatalogError::invalid_tag(
            tag,
            "must not contain path separators or control characters",
        ));
    }
    Ok(())
}

/// Check that `base` can be used as the untagged part of a name.
pub fn validate_base(base: &str) -> Result<(), CatalogError> {
    if base.contains(DELIMITER) {
        return Err(CatalogError::invalid_name(base, "base name contains '@'"));
    }
    if base.chars().any(is_path_separator) {
        return Err(CatalogError::invalid_name(base, "base name contains a path separator"));
    }
    Ok(())
}

/// Turn free-form user input into a tag: trims, NFC-normalizes, and adds the
/// delimiter when missing. The result is validated.
pub fn normalize_tag(input: &str) -> Result<String, CatalogError> {
    let trimmed: String = input.trim().nfc().collect();
    let tag = if trimmed.starts_with(DELIMITER) {
        trimmed
    } else {
        format!("{}{}", DELIMITER, trimmed)
    };
    validate_tag(&tag)?;
    Ok(tag)
}

/// Tag equality up to Unicode normalization. Names read back from disk may be
/// decomposed while user input is always NFC.
pub fn same_tag(a: &str, b: &str) -> bool {
    a == b || a.nfc().eq(b.nfc())
}

/// Compose a file name from its parts. Tags are concatenated without any
/// separator since each carries its own leading delimiter.
pub fn compose<S: AsRef<str>>(base: &str, tags: &[S], extension: Option<&str>) -> String {
    let mut name = String::with_capacity(
        base.len() + tags.iter().map(|t| t.as_ref().len()).sum::<usize>() + 8,
    );
    name.push_str(base);
    for tag in tags {
        name.push_str(tag.as_ref());
    }
    if let Some(ext) = extension {
        name.push('.');
        name.push_str(ext);
    }
    name
}

/// Like [`compose`] but validates every part first.
pub fn compose_checked<S: AsRef<str>>(
    base: &str,
    tags: &[S],
    extension: Option<&str>,
) -> Result<String, CatalogError> {
    validate_base(base)?;
    for tag in tags {
        validate_tag(tag.as_ref())?;
    }
    Ok(compose(base, tags, extension))
}

/// Split a name into stem and extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &name[idx + 1..];
            if ext.contains(DELIMITER) {
                (name, None)
            } else {
                (&name[..idx], Some(ext))
            }
        }
        _ => (name, None),
    }
}

/// Parse a composed name back into base, tags and extension.
pub fn parse(name: &str) -> Result<ParsedName, CatalogError> {
    if name.chars().any(is_path_separator) {
        return Err(CatalogError::invalid_name(name, "contains a path separator"));
    }

    let (stem, extension) = split_extension(name);

    let (base, tagged) = match stem.find(DELIMITER) {
        Some(idx) => (&stem[..idx], &stem[idx..]),
        None => (stem, ""),
    };

    let mut tags = Vec::new();
    // Every segment after the first split starts right after a delimiter.
    for body in tagged.split(DELIMITER).skip(1) {
        let tag = format!("{}{}", DELIMITER, body);
        validate_tag(&tag).map_err(|e| match e {
            CatalogError::InvalidTag { reason, .. } => CatalogError::invalid_name(name, &reason),
            other => other,
        })?;
        tags.push(tag);
    }

    Ok(ParsedName {
        base: base.to_string(),
        tags,
        extension: extension.map(str::to_string),
    })
}

/// Tags encoded in `name`, or an empty list when it has none.
pub fn tags_of(name: &str) -> Result<Vec<String>, CatalogError> {
    parse(name).map(|p| p.tags)
}

impl ParsedName {
    /// Recompose this name.
    pub fn compose(&self) -> String {
        compose(&self.base, &self.tags, self.extension.as_deref())
    }

    /// Same base and extension, different tag list.
    pub fn with_tags(&self, tags: &[String]) -> String {
        compose(&self.base, tags, self.extension.as_deref())
    }
}
