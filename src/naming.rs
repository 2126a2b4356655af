//! File naming for uploaded assets and composite outputs.

/// Default length budget for stored upload names.
pub const DEFAULT_MAX_LEN: usize = 100;

/// Length cap for each name component of an output file.
pub const OUTPUT_NAME_MAX: usize = 50;

const FALLBACK: &str = "file";

// Room kept for the uniqueness token and separator.
const TOKEN_RESERVE: usize = 20;

/// Reduce `name` to `[A-Za-z0-9_-]`, turning whitespace runs into `-`.
///
/// Other characters are dropped. The result is cut to `max_len` characters and is never
/// empty.
pub fn sanitize_stem(name: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(name.len().min(max_len));
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        // Dropped characters do not end a whitespace run.
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
            in_space = false;
        }
    }

    let truncated: String = out.chars().take(max_len).collect();
    if truncated.is_empty() {
        FALLBACK.to_owned()
    } else {
        truncated
    }
}

/// Storage name for an uploaded file: `"{token}-{stem}{ext}"`.
///
/// The stem is sanitized with [`sanitize_stem`] and shortened so the whole name stays
/// near `max_len`; the extension keeps only ASCII alphanumerics.
pub fn sanitize_filename(file_name: &str, max_len: usize, token: &str) -> String {
    let (stem, ext) = split_extension(file_name);
    let ext: String = ext.chars().filter(char::is_ascii_alphanumeric).collect();
    let ext = if ext.is_empty() {
        String::new()
    } else {
        format!(".{ext}")
    };

    let budget = max_len.saturating_sub(ext.len() + TOKEN_RESERVE);
    let stem = sanitize_stem(stem, budget);
    format!("{token}-{stem}{ext}")
}

/// Name of the composite written for one task: `"{mockup}_{design}_{task_id}.{ext}"`.
///
/// Every character outside `[A-Za-z0-9_-]` in the names becomes `_`; each name is cut
/// to [`OUTPUT_NAME_MAX`] characters.
pub fn output_file_name(mockup_name: &str, design_name: &str, task_id: &str, ext: &str) -> String {
    format!(
        "{}_{}_{task_id}.{ext}",
        output_component(mockup_name),
        output_component(design_name)
    )
}

/// Stem of `file_name` without directories or extension, as used for design names.
pub fn file_stem(file_name: &str) -> &str {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    split_extension(base).0
}

fn output_component(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(OUTPUT_NAME_MAX)
        .collect();
    if s.is_empty() { FALLBACK.to_owned() } else { s }
}

/// Split at the last `.`; a leading dot (`.bashrc`) is part of the stem.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(i) if i > 0 => (&file_name[..i], &file_name[i + 1..]),
        _ => (file_name, ""),
    }
}

#[cfg(test)]
#[path = "../tests/unit/naming.rs"]
mod tests;
