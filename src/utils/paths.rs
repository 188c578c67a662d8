use std::path::Path;

/// Ellipsis used when a directory is shortened from the left.
const LEFT_ELLIPSIS: char = '…';

/// Expands a leading `~` using the current home directory
///
/// Paths without a leading tilde, and paths where the home directory cannot
/// be determined, are returned unchanged.
///
/// # Examples
///
/// ```
/// use histsearch::utils::expand_tilde;
///
/// assert_eq!(expand_tilde("/etc/hosts"), "/etc/hosts");
/// ```
pub fn expand_tilde(path: &str) -> String {
    match dirs::home_dir() {
        Some(home) => expand_tilde_with(path, &home.to_string_lossy()),
        None => path.to_string(),
    }
}

fn expand_tilde_with(path: &str, home: &str) -> String {
    if home.is_empty() {
        return path.to_string();
    }
    if path == "~" {
        return home.to_string();
    }
    match path.strip_prefix("~/") {
        Some(rest) => Path::new(home).join(rest).to_string_lossy().into_owned(),
        None => path.to_string(),
    }
}

/// Formats a path with ~ substitution for the home directory
///
/// Only whole path components are replaced, so `/home/al` does not turn
/// `/home/alice` into `~ice`.
///
/// # Examples
///
/// ```
/// use histsearch::utils::format_path_with_tilde;
///
/// assert_eq!(format_path_with_tilde("/home/alice/src", "/home/alice"), "~/src");
/// assert_eq!(format_path_with_tilde("/opt/bin", "/home/alice"), "/opt/bin");
/// ```
pub fn format_path_with_tilde(path: &str, home: &str) -> String {
    if home.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(home) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{}", rest),
        _ => path.to_string(),
    }
}

/// Fit a directory into `width` columns, keeping its tail.
pub fn shorten_directory(dir: &str, width: usize, home: &str) -> String {
    let dir = format_path_with_tilde(dir, home);
    let len = dir.chars().count();
    if len <= width {
        return dir;
    }
    if width == 0 {
        return String::new();
    }

    let keep = width - 1;
    let mut shortened = String::with_capacity(width * 4);
    shortened.push(LEFT_ELLIPSIS);
    shortened.extend(dir.chars().skip(len - keep));
    shortened
}
