/// Display name to short code for the eight Australian states and territories.
pub const STATE_CODES: [(&str, &str); 8] = [
    ("New South Wales", "NSW"),
    ("Victoria", "VIC"),
    ("Queensland", "QLD"),
    ("South Australia", "SA"),
    ("Western Australia", "WA"),
    ("Tasmania", "TAS"),
    ("Northern Territory", "NT"),
    ("Australian Capital Territory", "ACT"),
];

/// Look up the short code for a display name.
pub fn code_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATE_CODES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

/// Look up the display name for a short code.
pub fn name_for_code(code: &str) -> Option<&'static str> {
    STATE_CODES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code.trim()))
        .map(|&(name, _)| name)
}

/// Normalize a dataset key that may be either a code or a display name.
/// Unknown keys (e.g. a national total row) are returned as-is.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim();
    if let Some(code) = code_for_name(key) {
        return code.to_string();
    }
    match name_for_code(key) {
        Some(_) => key.to_ascii_uppercase(),
        None => key.to_string(),
    }
}
