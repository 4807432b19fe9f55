//! Inline config mini-language.
//!
//! # Responsibility
//! - Parse one `{key: value; key2: [a, b]; key3: {x: 1, y: 2}}` block into
//!   an ordered key/value map.
//! - Provide typed accessors that never fail the caller.
//! - Render maps, arrays, and numbers back into the same grammar.
//!
//! # Invariants
//! - Separators inside nested `{}`/`[]` are literal value content.
//! - Unbalanced input is not rejected; the scan simply never returns to
//!   depth zero and the trailing pair absorbs the rest.
//! - Keys are unique; a repeated key keeps its first position and the last
//!   value.

/// Ordered mapping from config key to raw, still-unparsed value text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: Vec<(String, String)>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config block. Outer braces are optional.
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::new();
        let mut body = raw.trim();
        if body.is_empty() {
            return map;
        }
        if body.starts_with('{') && body.ends_with('}') && body.len() >= 2 {
            body = &body[1..body.len() - 1];
        }

        let mut key: Option<String> = None;
        let mut value = String::new();
        let mut depth: i32 = 0;

        for ch in body.chars() {
            match ch {
                '{' | '[' => {
                    depth += 1;
                    value.push(ch);
                }
                '}' | ']' => {
                    depth -= 1;
                    value.push(ch);
                }
                ':' if depth == 0 && key.is_none() => {
                    key = Some(value.trim().to_string());
                    value.clear();
                }
                ';' if depth == 0 => {
                    if let Some(done) = key.take() {
                        if !done.is_empty() {
                            map.insert(done, value.trim());
                        }
                    }
                    value.clear();
                }
                _ => value.push(ch),
            }
        }

        if let Some(done) = key {
            if !done.is_empty() {
                map.insert(done, value.trim());
            }
        }

        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts or replaces a pair. Replacement keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`ConfigMap::insert`].
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts only when `value` is non-empty.
    pub fn with_nonempty(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.insert(key, value);
        }
        self
    }

    /// Inserts a bracketed array only when `items` is non-empty.
    pub fn with_array(mut self, key: &str, items: &[String]) -> Self {
        if !items.is_empty() {
            self.insert(key, render_array(items));
        }
        self
    }

    /// Inserts free text, made safe by [`inline_text`], when non-empty.
    pub fn with_text(self, key: &str, value: &str) -> Self {
        self.with_nonempty(key, &inline_text(value))
    }

    /// Raw value or empty string.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Raw value, or `default` when absent or empty.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .map_or(default, |value| parse_int(value, default))
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .map_or(default, |value| parse_float(value, default))
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .map_or(default, |value| parse_bool(value, default))
    }

    pub fn array(&self, key: &str) -> Vec<String> {
        self.get(key).map(parse_array).unwrap_or_default()
    }

    /// `{x: .., y: ..}` pair; missing coordinates keep the default.
    pub fn position(&self, key: &str, default: (f64, f64)) -> (f64, f64) {
        self.get(key)
            .map_or(default, |value| parse_pair(value, ("x", "y"), default))
    }

    /// `{width: .., height: ..}` pair; missing dimensions keep the default.
    pub fn size(&self, key: &str, default: (f64, f64)) -> (f64, f64) {
        self.get(key)
            .map_or(default, |value| parse_pair(value, ("width", "height"), default))
    }

    /// Renders `{k: v; k2: v2}`, or an empty string for an empty map.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let pairs = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>();
        format!("{{{}}}", pairs.join("; "))
    }
}

pub fn parse_int(raw: &str, default: i64) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    trimmed.parse::<i64>().unwrap_or(default)
}

pub fn parse_float(raw: &str, default: f64) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

/// `true`, `1`, and `yes` (any case) are true; empty input yields `default`.
pub fn parse_bool(raw: &str, default: bool) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return default;
    }
    matches!(normalized.as_str(), "true" | "1" | "yes")
}

/// Accepts `[a, b]` or bare `a, b`; items are trimmed and empties dropped.
pub fn parse_array(raw: &str) -> Vec<String> {
    let mut body = raw.trim();
    if body.starts_with('[') && body.ends_with(']') && body.len() >= 2 {
        body = &body[1..body.len() - 1];
    }
    body.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_pair(raw: &str, keys: (&str, &str), default: (f64, f64)) -> (f64, f64) {
    let mut body = raw.trim();
    if body.is_empty() {
        return default;
    }
    if body.starts_with('{') && body.ends_with('}') && body.len() >= 2 {
        body = &body[1..body.len() - 1];
    }

    let (mut first, mut second) = default;
    for part in body.split(',') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key == keys.0 {
            first = parse_float(value, default.0);
        } else if key == keys.1 {
            second = parse_float(value, default.1);
        }
    }
    (first, second)
}

/// Replaces characters that would split or nest a config value.
pub fn inline_text(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            ';' => ',',
            '{' | '[' => '(',
            '}' | ']' => ')',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

/// Renders `[a, b]`; an empty slice renders `[]`.
pub fn render_array(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// Shortest exact decimal for coordinates and sizes (`100`, `7.5`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Two-decimal rendering for money and hours.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Renders a `{first: a, second: b}` pair object.
pub fn render_pair(keys: (&str, &str), values: (f64, f64)) -> String {
    format!(
        "{{{}: {}, {}: {}}}",
        keys.0,
        format_number(values.0),
        keys.1,
        format_number(values.1)
    )
}
