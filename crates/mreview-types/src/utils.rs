/// Lowercased extension of the last path segment, without the dot.
///
/// A name that is only a dot and an extension, like `.png`, counts as having one.
pub fn file_ext(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}
