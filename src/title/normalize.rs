use crate::title::Namespace;
use crate::TitleError;

/// Characters the encyclopedia never allows inside a page title
const ILLEGAL_CHARS: &[char] = &['#', '<', '>', '[', ']', '|', '{', '}'];

/// Canonicalizes a raw page title
///
/// # Normalization Steps
///
/// 1. Replace underscores with spaces
/// 2. Trim and collapse runs of whitespace to a single space
/// 3. Reject empty titles and titles with illegal characters
/// 4. If the title has a known namespace prefix (matched case-insensitively),
///    rewrite the prefix to its canonical spelling and trim around the colon
/// 5. Upper-case the first letter of the page name
///
/// Everything after the first letter keeps its case, so `pH` and `PH` stay
/// distinct nodes while `soil science` and `Soil_science` collapse.
///
/// # Examples
///
/// ```
/// use wikifrontier::title::canonicalize;
///
/// assert_eq!(canonicalize("category: crop_rotation").unwrap(), "Category:Crop rotation");
/// assert_eq!(canonicalize("  soil   science ").unwrap(), "Soil science");
/// ```
pub fn canonicalize(raw: &str) -> Result<String, TitleError> {
    let spaced = raw.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return Err(TitleError::Empty);
    }

    if let Some(ch) = collapsed.chars().find(|c| ILLEGAL_CHARS.contains(c)) {
        return Err(TitleError::IllegalCharacter {
            title: collapsed,
            ch,
        });
    }

    if let Some((prefix, rest)) = collapsed.split_once(':') {
        if let Some(namespace) = Namespace::from_prefix(prefix.trim()) {
            let rest = rest.trim();
            if rest.is_empty() {
                return Err(TitleError::Empty);
            }
            return Ok(format!("{}:{}", namespace.prefix(), upper_first(rest)));
        }
    }

    Ok(upper_first(&collapsed))
}

/// Upper-cases the first character, leaving the rest untouched
fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
