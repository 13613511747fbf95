//! Dot-joined diff paths.
//!
//! A path is the stable identity of a position in the diff tree. It starts at
//! [`ROOT_PATH`] and appends one `.segment` per object key, or `[i]` per
//! array element. Segment characters `.`, `[` and `\` are backslash-escaped
//! so distinct positions never share a path.

/// Path of the compared document as a whole
pub const ROOT_PATH: &str = "$";

/// Append an object key to a parent path
pub fn join(parent: &str, key: &str) -> String {
    let mut out = String::with_capacity(parent.len() + key.len() + 1);
    out.push_str(parent);
    out.push('.');
    for ch in key.chars() {
        if matches!(ch, '.' | '[' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Append an array index using bracket notation
pub fn join_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_plain_keys() {
        let roles = join(ROOT_PATH, "roles");
        assert_eq!(roles, "$.roles");
        assert_eq!(join(&roles, "targets"), "$.roles.targets");
    }

    #[test]
    fn test_join_escapes_dots() {
        assert_eq!(join("$", "a.b"), "$.a\\.b");
        assert_ne!(join("$", "a.b"), join(&join("$", "a"), "b"));
    }
}
