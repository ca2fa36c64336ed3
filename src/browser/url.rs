/// Schemes that are passed through untouched
const KNOWN_SCHEMES: [&str; 7] = [
    "http://",
    "https://",
    "file://",
    "data:",
    "about:",
    "chrome://",
    "chrome-extension://",
];

/// Turn user input like `courts.example.gov/docket` into a navigable URL
///
/// Local hosts default to http, everything else with a dot to https. Input
/// without a dot or scheme is assumed to be a local file path.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();

    if KNOWN_SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme)) {
        return trimmed.to_string();
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    let looks_like_path = trimmed.starts_with('/') || trimmed.starts_with("./") || trimmed.starts_with("../");
    if !looks_like_path && trimmed.contains('.') && !trimmed.ends_with(".html") && !trimmed.ends_with(".htm") {
        return format!("https://{}", trimmed);
    }

    match std::fs::canonicalize(trimmed) {
        Ok(path) => format!("file://{}", path.display()),
        Err(_) => trimmed.to_string(),
    }
}
