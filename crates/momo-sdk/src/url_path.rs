//! URL path helpers.

/// Join path segments into an absolute URL path (`["a", "b"]` -> `"/a/b"`).
///
/// Leading and trailing slashes on each segment are dropped and empty
/// segments are skipped, so the result never contains `//`. No segments
/// yields an empty string, which appends cleanly to a base URL.
pub fn url_path_from<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        let trimmed = segment.as_ref().trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        path.push('/');
        path.push_str(trimmed);
    }
    path
}

/// Append `path` to `base`, normalizing the slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_path_from_segments() {
        assert_eq!(url_path_from(["collection", "v1_0"]), "/collection/v1_0");
        assert_eq!(url_path_from(["/collection/", "", "v1_0/"]), "/collection/v1_0");
        assert_eq!(url_path_from(Vec::<String>::new()), "");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://h/x/", "/abc"), "https://h/x/abc");
        assert_eq!(join_url("https://h/x", "abc/apikey"), "https://h/x/abc/apikey");
        assert_eq!(join_url("https://h/x/", ""), "https://h/x");
    }
}
