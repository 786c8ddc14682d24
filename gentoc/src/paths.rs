//! Path helpers for TOC hrefs.
//!
//! Doc links use `/` or `\` depending on who wrote them, so these helpers
//! split on both instead of relying on the platform's `Path` parsing.

use std::env;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// File extensions a method link may point at.
const LINKABLE_EXTENSIONS: &[&str] = &["md", "yml"];

/// Rewrite a doc path as `../../<parent folder>/<file name>`.
///
/// TOC files live two folders below the docs root (`toc/<section>/toc.yml`),
/// so this makes a path to any document usable as an href. Values without a
/// file extension are relative URLs and come back unchanged; the query string
/// and fragment are not considered part of the file name when deciding that.
/// Returns `None` when the parent folder cannot be determined.
pub fn to_toc_relative_path(value: &str) -> Option<String> {
    if extension(split_file_name(path_part(value)).1).is_none() {
        return Some(value.to_string());
    }
    let (parent, file_name) = split_file_name(value);

    let folder = match parent.rsplit(['/', '\\']).find(|s| !s.is_empty()) {
        Some(name) if name != "." && name != ".." => name.to_string(),
        // `./x.md`, `../x.md` or a bare file name: resolve against the working directory
        _ => {
            let resolved = normalize(&env::current_dir().ok()?.join(normalize_file_path(parent)));
            resolved.file_name()?.to_str()?.to_string()
        }
    };

    Some(format!("../../{}/{}", folder, file_name))
}

/// Remove a `#fragment` from a URL or path.
pub fn trim_anchor(value: &str) -> &str {
    value.split('#').next().unwrap_or(value)
}

/// Resolve `value` relative to the folder containing `file`.
pub fn full_path_relative_to_file(value: &str, file: &Path) -> PathBuf {
    let parent = file.parent().unwrap_or_else(|| Path::new(""));
    let joined = parent.join(normalize_file_path(value));
    if joined.is_absolute() {
        normalize(&joined)
    } else {
        match env::current_dir() {
            Ok(cwd) => normalize(&cwd.join(joined)),
            Err(_) => normalize(&joined),
        }
    }
}

/// Use the platform separator throughout.
pub fn normalize_file_path(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect()
}

/// Whether a method link target is usable.
///
/// Links without an extension are external and always valid. `.md` and `.yml`
/// links must exist relative to the document that contains them. Anything
/// else is invalid.
pub fn is_valid_link(link: &str, containing_doc: &Path) -> bool {
    let target = path_part(link);
    let (_, file_name) = split_file_name(target);
    match extension(file_name) {
        None => true,
        Some(ext) if LINKABLE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {
            full_path_relative_to_file(target, containing_doc).is_file()
        }
        Some(_) => false,
    }
}

/// Path from `from_dir` to `to`, with `/` separators.
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from = normalize(from_dir);
    let to = normalize(to);
    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    parts.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().to_string()),
    );
    parts.join("/")
}

/// `value` without its `?query` or `#fragment`.
fn path_part(value: &str) -> &str {
    value.split(['?', '#']).next().unwrap_or(value)
}

/// Split into (everything before the last separator, file name).
fn split_file_name(value: &str) -> (&str, &str) {
    match value.rfind(['/', '\\']) {
        Some(idx) => (&value[..idx], &value[idx + 1..]),
        None => ("", value),
    }
}

/// Extension of a file name: text after the last `.`, if any.
fn extension(file_name: &str) -> Option<&str> {
    let idx = file_name.rfind('.')?;
    let ext = &file_name[idx + 1..];
    (!ext.is_empty()).then_some(ext)
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
