use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Expand a CURIE (`prefix:local`) against the prefix table.
///
/// Absolute URIs (anything with `://`) and bare names pass through. An
/// unknown prefix is an error instead of a silently unexpanded value.
pub fn expand_curie(value: &str, prefixes: &BTreeMap<String, String>) -> Result<String> {
    if value.contains("://") {
        return Ok(value.to_string());
    }

    match value.split_once(':') {
        Some((prefix, local)) => prefixes
            .get(prefix)
            .map(|base| format!("{base}{local}"))
            .ok_or_else(|| {
                Error::integrity(format!("unknown prefix '{prefix}' in '{value}'"))
            }),
        None => Ok(value.to_string()),
    }
}

/// Look up the base URI registered for `prefix`.
pub fn prefix_uri<'a>(prefix: &str, prefixes: &'a BTreeMap<String, String>) -> Result<&'a str> {
    prefixes
        .get(prefix)
        .map(String::as_str)
        .ok_or_else(|| Error::integrity(format!("unable to find prefix definition for '{prefix}'")))
}

/// Resolve `reference` against `base` following RFC 3986 section 5.2
/// (without dot-segment removal).
///
/// Works on URI templates too: `{+id}` expressions are carried as opaque
/// path text.
pub fn resolve_reference(base: &str, reference: &str) -> String {
    if reference.is_empty() {
        return strip_fragment(base).to_string();
    }
    if has_scheme(reference) {
        return reference.to_string();
    }

    let (scheme, rest) = match base.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("", base),
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    if let Some(network_path) = reference.strip_prefix("//") {
        return format!("{scheme}://{network_path}");
    }
    if reference.starts_with('/') {
        return format!("{scheme}://{authority}{reference}");
    }
    if reference.starts_with('#') {
        return format!("{}{reference}", strip_fragment(base));
    }
    if reference.starts_with('?') {
        let without_query = strip_fragment(base)
            .split_once('?')
            .map(|(head, _)| head)
            .unwrap_or_else(|| strip_fragment(base));
        return format!("{without_query}{reference}");
    }

    let path_base = strip_fragment(base);
    let path_base = path_base
        .split_once('?')
        .map(|(head, _)| head)
        .unwrap_or(path_base);
    let directory_end = path_base
        .rfind('/')
        .filter(|idx| *idx >= base.len() - rest.len() + authority_end)
        .map(|idx| idx + 1);
    match directory_end {
        Some(end) => format!("{}{reference}", &path_base[..end]),
        None => format!("{path_base}/{reference}"),
    }
}

fn strip_fragment(uri: &str) -> &str {
    uri.split_once('#').map(|(head, _)| head).unwrap_or(uri)
}

fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("schema".to_string(), "https://schema.org/".to_string()),
            ("ex".to_string(), "https://example.org/".to_string()),
        ])
    }

    #[test]
    fn expands_known_prefix() {
        assert_eq!(
            expand_curie("schema:Dataset", &prefixes()).unwrap(),
            "https://schema.org/Dataset"
        );
    }

    #[test]
    fn absolute_uri_passes_through() {
        let uri = "https://schema.org/name";
        assert_eq!(expand_curie(uri, &prefixes()).unwrap(), uri);
    }

    #[test]
    fn unknown_prefix_fails() {
        let err = expand_curie("nope:Thing", &prefixes()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn resolves_fragment_against_template() {
        let base = "https://example.org/id/{+id}";
        assert_eq!(
            resolve_reference(base, "#input-metadata"),
            "https://example.org/id/{+id}#input-metadata"
        );
    }

    #[test]
    fn resolves_relative_path_against_directory() {
        let base = "https://example.org/id/{+id}";
        assert_eq!(
            resolve_reference(base, "other"),
            "https://example.org/id/other"
        );
        assert_eq!(
            resolve_reference(base, "/root"),
            "https://example.org/root"
        );
    }

    #[test]
    fn absolute_reference_wins() {
        assert_eq!(
            resolve_reference("https://example.org/id/{+id}", "urn:x:1"),
            "urn:x:1"
        );
    }
}
