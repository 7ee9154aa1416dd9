//! FULL and BIND projections.
//!
//! FULL is the identity. BIND selects a subset of a map-rooted descriptor
//! by RFC 6901 JSON Pointer paths and rebuilds the minimal enclosing map
//! structure around the selected leaves: non-selected siblings are omitted
//! at every level, not just at the leaves.
//!
//! Pointer-set semantics, in evaluation order:
//! - duplicate pointer strings reject the whole set
//! - every pointer must parse; one bad pointer rejects the set
//! - traversing through a LIST rejects immediately (stricter than
//!   "unmatched")
//! - zero matches yield the empty map, an explicit nothing-selected result
//! - a mix of matched and unmatched pointers fails closed
//! - the empty pointer matches the whole root and subsumes everything
//! - a matched pointer whose token path strictly prefixes another matched
//!   pointer's path subsumes it

use std::collections::HashSet;

use map1_canonical::{ErrorKind, ProtocolError, Value};

/// Which part of a descriptor contributes to canonical bytes.
#[derive(Debug, Clone, Copy)]
pub enum Projection<'a> {
    /// The whole descriptor.
    Full,
    /// The subset selected by these RFC 6901 pointer strings.
    Bind(&'a [&'a str]),
}

/// Applies a projection to a descriptor.
pub fn project(descriptor: &Value, projection: &Projection<'_>) -> Result<Value, ProtocolError> {
    match projection {
        Projection::Full => Ok(descriptor.clone()),
        Projection::Bind(pointers) => bind(descriptor, pointers),
    }
}

/// Decodes one RFC 6901 pointer into reference tokens.
///
/// Escape order is the classic trap: `~1` then `~0` must be decoded in a
/// single pass, otherwise "~01" comes out wrong. This walks character by
/// character so the question never arises.
fn parse_pointer(pointer: &str) -> Result<Vec<String>, ProtocolError> {
    if pointer.is_empty() {
        return Ok(Vec::new()); // whole-document pointer
    }
    if !pointer.starts_with('/') {
        return Err(ProtocolError::new(
            ErrorKind::InvalidShape,
            format!("pointer must start with '/': '{}'", pointer),
        ));
    }

    let mut tokens = Vec::new();
    for raw in pointer[1..].split('/') {
        let mut decoded = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(ch) = chars.next() {
            if ch != '~' {
                decoded.push(ch);
                continue;
            }
            match chars.next() {
                Some('0') => decoded.push('~'),
                Some('1') => decoded.push('/'),
                Some(other) => {
                    return Err(ProtocolError::new(
                        ErrorKind::InvalidShape,
                        format!("bad escape ~{} in pointer", other),
                    ));
                }
                None => {
                    return Err(ProtocolError::new(
                        ErrorKind::InvalidShape,
                        "dangling ~ in pointer",
                    ));
                }
            }
        }
        tokens.push(decoded);
    }
    Ok(tokens)
}

/// Resolves one parsed pointer against the descriptor.
///
/// `Ok(true)` is a full match, `Ok(false)` a miss that never touched a
/// LIST; touching a LIST at any step is a hard rejection.
fn resolve(descriptor: &Value, tokens: &[String]) -> Result<bool, ProtocolError> {
    let mut cur = descriptor;
    for token in tokens {
        match cur {
            Value::List(_) => {
                return Err(ProtocolError::new(
                    ErrorKind::InvalidShape,
                    "BIND cannot traverse a LIST",
                ));
            }
            Value::Map(entries) => match entries.iter().find(|(k, _)| k == token) {
                Some((_, child)) => cur = child,
                None => return Ok(false),
            },
            _ => return Ok(false),
        }
    }
    Ok(true)
}

fn bind(descriptor: &Value, pointers: &[&str]) -> Result<Value, ProtocolError> {
    let root_entries = match descriptor {
        Value::Map(entries) => entries,
        _ => {
            return Err(ProtocolError::new(
                ErrorKind::InvalidShape,
                "BIND root must be a MAP",
            ));
        }
    };

    let mut seen = HashSet::new();
    for pointer in pointers {
        if !seen.insert(*pointer) {
            return Err(ProtocolError::new(
                ErrorKind::InvalidShape,
                format!("duplicate pointer '{}'", pointer),
            ));
        }
    }

    // Parse everything up front so a malformed pointer rejects the set
    // before any traversal happens.
    let parsed: Vec<(&str, Vec<String>)> = pointers
        .iter()
        .map(|&pointer| Ok((pointer, parse_pointer(pointer)?)))
        .collect::<Result<_, ProtocolError>>()?;

    let mut matched: Vec<Vec<String>> = Vec::new();
    let mut any_unmatched = false;
    let mut root_selected = false;

    for (pointer, tokens) in &parsed {
        if pointer.is_empty() {
            // The empty pointer always matches and denotes the root.
            root_selected = true;
            continue;
        }
        if resolve(descriptor, tokens)? {
            matched.push(tokens.clone());
        } else {
            any_unmatched = true;
        }
    }

    if !root_selected && matched.is_empty() {
        // Nothing selected is a result, not an error.
        return Ok(Value::empty_map());
    }
    if any_unmatched {
        // Partial selection is ambiguous; fail closed.
        return Err(ProtocolError::new(
            ErrorKind::InvalidShape,
            "pointer set mixes matched and unmatched pointers",
        ));
    }
    if root_selected {
        return Ok(descriptor.clone());
    }

    // Drop pointers subsumed by a strict prefix among the matched set.
    let effective: Vec<&Vec<String>> = matched
        .iter()
        .filter(|tokens| {
            !matched
                .iter()
                .any(|other| other.len() < tokens.len() && tokens[..other.len()] == other[..])
        })
        .collect();

    build_subtree(root_entries, &effective)
}

/// Rebuilds the minimal map tree hosting the selected paths.
fn build_subtree(
    entries: &[(String, Value)],
    paths: &[&Vec<String>],
) -> Result<Value, ProtocolError> {
    // Group selected paths by their first token, preserving first-seen
    // order; the encoder orders keys canonically later.
    let mut groups: Vec<(String, Vec<Vec<String>>)> = Vec::new();
    for path in paths {
        let Some((first, rest)) = path.split_first() else {
            continue; // root selections were handled by the caller
        };
        match groups.iter_mut().find(|(k, _)| k == first) {
            Some(group) => group.1.push(rest.to_vec()),
            None => groups.push((first.clone(), vec![rest.to_vec()])),
        }
    }

    let mut result: Vec<(String, Value)> = Vec::with_capacity(groups.len());
    for (key, sub_paths) in &groups {
        let (_, child) = entries
            .iter()
            .find(|(k, _)| k == key)
            .ok_or_else(|| ProtocolError::new(ErrorKind::InvalidShape, "selected key vanished"))?;

        if sub_paths.iter().any(|p| p.is_empty()) {
            // The key itself is a selected leaf. Any longer sibling path
            // under it was removed by subsumption, so no conflict remains.
            result.push((key.clone(), child.clone()));
        } else {
            match child {
                Value::Map(child_entries) => {
                    let refs: Vec<&Vec<String>> = sub_paths.iter().collect();
                    result.push((key.clone(), build_subtree(child_entries, &refs)?));
                }
                Value::List(_) => {
                    return Err(ProtocolError::new(
                        ErrorKind::InvalidShape,
                        "BIND cannot traverse a LIST",
                    ));
                }
                _ => {
                    // A pointer needs a sub-map where the descriptor holds
                    // a leaf: structural conflict.
                    return Err(ProtocolError::new(
                        ErrorKind::InvalidShape,
                        "pointer descends into a non-MAP value",
                    ));
                }
            }
        }
    }

    result.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    Ok(Value::Map(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> Value {
        Value::Map(vec![
            (
                "a".into(),
                Value::Map(vec![
                    ("x".into(), Value::String("1".into())),
                    ("y".into(), Value::String("2".into())),
                ]),
            ),
            ("b".into(), Value::String("keep".into())),
        ])
    }

    #[test]
    fn pointer_unescaping() {
        assert_eq!(parse_pointer("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_pointer("/a/b").unwrap(), vec!["a", "b"]);
        assert_eq!(parse_pointer("/~0~1").unwrap(), vec!["~/"]);
        assert_eq!(parse_pointer("/~01").unwrap(), vec!["~1"]);
        assert!(parse_pointer("/a/~2").is_err());
        assert!(parse_pointer("/a~").is_err());
        assert!(parse_pointer("a").is_err());
    }

    #[test]
    fn bind_selects_subtree_and_omits_siblings() {
        let projected = bind(&descriptor(), &["/a/x"]).unwrap();
        assert_eq!(
            projected,
            Value::Map(vec![(
                "a".into(),
                Value::Map(vec![("x".into(), Value::String("1".into()))]),
            )])
        );
    }

    #[test]
    fn prefix_subsumes_descendant() {
        let projected = bind(&descriptor(), &["/a", "/a/x"]).unwrap();
        assert_eq!(
            projected,
            Value::Map(vec![(
                "a".into(),
                Value::Map(vec![
                    ("x".into(), Value::String("1".into())),
                    ("y".into(), Value::String("2".into())),
                ]),
            )])
        );
    }

    #[test]
    fn empty_pointer_selects_everything() {
        let projected = bind(&descriptor(), &["", "/a/x"]).unwrap();
        assert_eq!(projected, descriptor());
    }

    #[test]
    fn no_match_yields_empty_map() {
        assert_eq!(
            bind(&descriptor(), &["/nope"]).unwrap(),
            Value::empty_map()
        );
    }

    #[test]
    fn mixed_match_fails_closed() {
        let err = bind(&descriptor(), &["/b", "/nope"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidShape);
    }

    #[test]
    fn empty_pointer_beats_unmatched_sibling() {
        // "" matches, "/nope" does not: still a mixed set, still closed.
        let err = bind(&descriptor(), &["", "/nope"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidShape);
    }

    #[test]
    fn list_traversal_rejected_even_with_other_valid_pointers() {
        let with_list = Value::Map(vec![
            ("items".into(), Value::List(vec![Value::Integer(1)])),
            ("b".into(), Value::String("keep".into())),
        ]);
        let err = bind(&with_list, &["/b", "/items/0"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidShape);
    }

    #[test]
    fn non_map_root_rejected() {
        let err = bind(&Value::List(vec![]), &["/0"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidShape);
        let err = bind(&Value::Integer(3), &[""]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidShape);
    }

    #[test]
    fn duplicate_pointers_rejected() {
        let err = bind(&descriptor(), &["/b", "/b"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidShape);
    }

    #[test]
    fn full_is_identity_on_any_root() {
        let scalar = Value::Integer(42);
        assert_eq!(project(&scalar, &Projection::Full).unwrap(), scalar);
        assert_eq!(
            project(&descriptor(), &Projection::Full).unwrap(),
            descriptor()
        );
    }
}
