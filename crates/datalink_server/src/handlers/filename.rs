//! Client filename cleaning applied before uploads reach the core.

/// Longest cleaned filename, in bytes.
const MAX_FILENAME_LEN: usize = 200;

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components, control characters, and leading dots are removed;
/// overly long names are shortened while keeping the extension.
///
/// # Returns
/// `None` when nothing usable remains.
pub(crate) fn clean_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let visible: String = base.chars().filter(|ch| !ch.is_control()).collect();
    let cleaned = visible.trim().trim_start_matches('.').trim_start();
    if cleaned.is_empty() {
        return None;
    }
    Some(shorten(cleaned))
}

fn shorten(name: &str) -> String {
    if name.len() <= MAX_FILENAME_LEN {
        return name.to_string();
    }
    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < 16 => Some(ext),
        _ => None,
    };
    let budget = MAX_FILENAME_LEN - ext.map(|ext| ext.len() + 1).unwrap_or(0);
    let mut cut = budget;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    match ext {
        Some(ext) => format!("{}.{}", &name[..cut], ext),
        None => name[..cut].to_string(),
    }
}
