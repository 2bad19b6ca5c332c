//! Helpers for fully qualified item paths

/// Keep the last `segments` `::`-separated segments of `path`.
///
/// `shorten_path("a::b::c::d", 2)` results in `"c::d"`.
pub fn shorten_path(path: &str, segments: usize) -> &str {
    if segments == 0 {
        return "";
    }

    let mut remaining = segments;
    for (idx, _) in path.rmatch_indices("::") {
        remaining -= 1;
        if remaining == 0 {
            return &path[idx + 2..];
        }
    }
    path
}
