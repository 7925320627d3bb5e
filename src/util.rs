pub const TITLE_ELLIPSIS: &str = "...";

pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TITLE_ELLIPSIS}", &title[..cut]),
        None => title.to_string(),
    }
}

pub fn short_name(path: &str) -> &str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
}
