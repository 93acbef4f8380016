//! POSIX path helpers for remote paths.
//!
//! Remote paths are plain strings, always `/`-separated regardless of the
//! local platform, so these helpers never go through `std::path`.

/// Returns `true` for the spellings of "the current working directory".
pub fn is_current_dir(path: &str) -> bool {
    matches!(path, "" | "." | "./")
}

/// Join `rel` onto `base` with POSIX semantics.
///
/// An empty operand yields the other one unchanged and an absolute `rel`
/// replaces `base`. A trailing `/` on `rel` is preserved.
pub fn join(base: &str, rel: &str) -> String {
    if rel.is_empty() {
        return base.to_string();
    }
    if base.is_empty() || rel.starts_with('/') {
        return rel.to_string();
    }
    let mut joined = base.trim_end_matches('/').to_string();
    joined.push('/');
    joined.push_str(rel);
    joined
}

/// Directory form of a path: exactly one trailing `/`.
pub fn as_directory(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        return "/".to_string();
    }
    format!("{trimmed}/")
}

/// Addressing form of a path: no trailing `/`, except for the root itself.
pub fn strip_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Path handed to the gateway when listing `prefix` below the walk `root`.
///
/// The current-directory spellings of `root` all become `"."`; any other
/// root, absolute or relative, is used as given.
pub fn listing_target(root: &str, prefix: &str) -> String {
    let base = if is_current_dir(root) { "." } else { root };
    join(base, prefix)
}

/// Resolve `path` against the absolute directory `cwd`.
///
/// The result is absolute, has `.` and `..` folded away and carries no
/// trailing `/` (except for `/`). `..` never climbs above the root.
pub fn resolve(cwd: &str, path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let start = if path.starts_with('/') { "" } else { cwd };

    for component in start.split('/').chain(path.split('/')) {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }

    format!("/{}", parts.join("/"))
}

/// Every component prefix of `path`, from the top down to the leaf.
///
/// `"a/b/c"` yields `["a", "a/b", "a/b/c"]` and `"/x/y"` yields
/// `["/x", "/x/y"]`. Empty and `.` components are skipped, so the current
/// directory and `/` yield nothing.
pub fn ancestors(path: &str) -> Vec<String> {
    let mut current = if path.starts_with('/') {
        "/".to_string()
    } else {
        String::new()
    };

    let mut prefixes = Vec::new();
    for component in path.split('/').filter(|c| !c.is_empty() && *c != ".") {
        current = join(&current, component);
        prefixes.push(current.clone());
    }
    prefixes
}

/// Parent directory of `path`, or `None` for a bare name or the root.
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = strip_trailing_slash(path);
    if trimmed == "/" {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&trimmed[..idx]),
        None => None,
    }
}

/// Final component of `path`, ignoring any trailing `/`.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
