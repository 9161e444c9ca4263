use url::Url;

/// Hostname of `link` with a leading `www.` removed.
pub fn extract_domain(link: &str) -> Option<String> {
    let parsed_url = Url::parse(link).ok()?;
    match parsed_url.host_str() {
        Some("") | None => None,
        Some(host) => match host.strip_prefix("www.") {
            Some(h) => Some(h.to_string()),
            None => Some(host.to_string()),
        },
    }
}

pub fn build_official_website_query(name: &str) -> String {
    format!("{} official website", name)
}

pub fn build_board_search_query(name: &str, domain: Option<&str>) -> String {
    match domain {
        Some(domain) => format!("site:{} {} board", domain, name),
        None => format!("{} board", name),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_board_search_query, extract_domain};

    #[test]
    fn extract_domain_valid() {
        let urls = [
            ("https://www.redcross.org/", "redcross.org"),
            ("https://givewell.org/about/people", "givewell.org"),
            ("http://www.example.co.uk/board?x=1", "example.co.uk"),
            ("https://about.www.example.com/", "about.www.example.com"),
        ];

        for (url, expected) in urls {
            assert_eq!(extract_domain(url).as_deref(), Some(expected));
        }
    }

    #[test]
    fn extract_domain_invalid() {
        for url in ["", "#", "/search?q=board", "mailto:someone@example.com"] {
            assert_eq!(extract_domain(url), None, "{}", url);
        }
    }

    #[test]
    fn board_query_with_and_without_site() {
        assert_eq!(build_board_search_query("Acme", None), "Acme board");
        assert_eq!(
            build_board_search_query("Acme", Some("acme.org")),
            "site:acme.org Acme board"
        );
    }
}
