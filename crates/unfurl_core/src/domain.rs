use url::Url;

/// Lowercase host component of `raw_url`.
///
/// Malformed URLs yield the empty string, which can never be a member of a
/// configured allow-list; the caller does not need a separate error path.
pub fn normalized_domain(raw_url: &str) -> String {
    match Url::parse(raw_url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.to_ascii_lowercase())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::normalized_domain;

    #[test]
    fn host_is_lowercased() {
        assert_eq!(normalized_domain("https://BSKY.app/x"), "bsky.app");
    }

    #[test]
    fn port_and_userinfo_are_not_part_of_the_host() {
        assert_eq!(normalized_domain("http://example.com:8080/x"), "example.com");
        assert_eq!(normalized_domain("http://user@example.com/x"), "example.com");
    }

    #[test]
    fn malformed_url_yields_empty_domain() {
        assert_eq!(normalized_domain("http://"), "");
        assert_eq!(normalized_domain("not a url"), "");
    }
}
