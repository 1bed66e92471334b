//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        match local.chars().count() {
            0 => format!("***{}", domain),
            1 | 2 => format!("{}***{}", local.chars().next().unwrap_or('*'), domain),
            _ => format!("{}***{}", local.chars().take(2).collect::<String>(), domain),
        }
    } else {
        "***".to_string()
    }
}

/// Lowercases a host header value and strips any port and trailing dot.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("admin@houserent.test"), "ad***@houserent.test");
        assert_eq!(mask_email("a@b.c"), "a***@b.c");
        assert_eq!(mask_email("nope"), "***");
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Acme.HouseRent.test:8080"), "acme.houserent.test");
        assert_eq!(normalize_host("acme.houserent.test."), "acme.houserent.test");
        assert_eq!(normalize_host(" localhost "), "localhost");
    }
}
