//! Locating and rewriting the size token of a CSS font shorthand such as
//! `"italic bold 16px/2 Arial"`.

const SIZE_UNITS: &[&str] = &[
    "px", "pt", "pc", "in", "cm", "mm", "q", "em", "rem", "ex", "ch", "vw", "vh", "%",
];

/// Byte range and value of the numeric part of a font size token.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSize {
    pub start: usize,
    pub end: usize,
    pub value: f64,
}

/// Finds the first whitespace-separated token of the form `<number><unit>`,
/// optionally followed by `/<line-height>`. Keywords and bare numbers such as
/// font weights (`700`) are skipped.
pub fn locate_size(font: &str) -> Option<FontSize> {
    let bytes = font.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if bytes[start].is_ascii_whitespace() {
            start += 1;
            continue;
        }
        let end = bytes[start..]
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .map_or(bytes.len(), |n| start + n);
        if let Some((len, value)) = size_prefix(&font[start..end]) {
            return Some(FontSize {
                start,
                end: start + len,
                value,
            });
        }
        start = end;
    }
    None
}

fn size_prefix(token: &str) -> Option<(usize, f64)> {
    let size = token.split('/').next().unwrap_or(token);
    let len = size
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b'.')
        .count();
    if len == 0 {
        return None;
    }
    let unit = &size[len..];
    if !SIZE_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit)) {
        return None;
    }
    size[..len].parse::<f64>().ok().map(|value| (len, value))
}

/// Rewrites the size token through `map`, leaving every other byte untouched.
/// Strings without a recognizable size are returned unchanged.
pub fn map_size(font: &str, map: impl FnOnce(f64) -> f64) -> String {
    match locate_size(font) {
        Some(size) => format!(
            "{}{}{}",
            &font[..size.start],
            map(size.value),
            &font[size.end..]
        ),
        None => font.to_string(),
    }
}

/// Splits a font into its size value and the family text that follows the
/// size token (line height stripped). Falls back to `default_size` and
/// `default_family` when either part is missing.
pub fn size_and_family<'a>(
    font: &'a str,
    default_size: f64,
    default_family: &'a str,
) -> (f64, &'a str) {
    let Some(size) = locate_size(font) else {
        return (default_size, default_family);
    };
    let rest = &font[size.end..];
    let rest = match rest.find(char::is_whitespace) {
        Some(idx) => rest[idx..].trim(),
        None => "",
    };
    let family = if rest.is_empty() { default_family } else { rest };
    (size.value, family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_size_after_style_keywords() {
        let size = locate_size("italic bold 16px/2 Arial").unwrap();
        assert_eq!(size.value, 16.0);
        assert_eq!(&"italic bold 16px/2 Arial"[size.start..size.end], "16");
    }

    #[test]
    fn skips_numeric_weights() {
        let size = locate_size("700 12.5pt serif").unwrap();
        assert_eq!(size.value, 12.5);
    }

    #[test]
    fn rewrites_only_the_number() {
        assert_eq!(map_size("10px sans-serif", |s| s * 2.0), "20px sans-serif");
        assert_eq!(
            map_size("italic  small-caps 16px/2  \"Fira Sans\"", |s| s / 4.0),
            "italic  small-caps 4px/2  \"Fira Sans\""
        );
    }

    #[test]
    fn leaves_strings_without_a_size_alone() {
        assert_eq!(map_size("caption", |s| s * 3.0), "caption");
        assert_eq!(map_size("", |s| s * 3.0), "");
    }

    #[test]
    fn splits_family_from_size() {
        assert_eq!(size_and_family("bold 18px/1.2 Sans Mono", 10.0, "Sans"), (18.0, "Sans Mono"));
        assert_eq!(size_and_family("18px", 10.0, "Sans"), (18.0, "Sans"));
        assert_eq!(size_and_family("menu", 10.0, "Sans"), (10.0, "Sans"));
    }
}
