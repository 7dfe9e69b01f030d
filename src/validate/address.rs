//! Address validation.
//!
//! The accepted shapes are deliberately narrower than `std::net::IpAddr`:
//! IPv4 must be exactly four decimal octets, IPv6 exactly eight colon
//! separated groups (no `::` compression, no embedded IPv4).

/// Returns `true` for a dotted-quad IPv4 address with every octet in 0-255.
pub fn is_valid_ipv4(address: &str) -> bool {
    let parts: Vec<&str> = address.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u16>().map(|n| n <= 255).unwrap_or(false)
        })
}

/// Returns `true` for exactly eight colon-separated groups of 0-4 hex digits.
pub fn is_valid_ipv6(address: &str) -> bool {
    let groups: Vec<&str> = address.split(':').collect();
    groups.len() == 8
        && groups
            .iter()
            .all(|group| group.len() <= 4 && group.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Validates an address literal.
///
/// Anything containing a colon is judged as IPv6, everything else as IPv4.
pub fn is_valid_address(address: &str) -> bool {
    if address.contains(':') {
        is_valid_ipv6(address)
    } else {
        is_valid_ipv4(address)
    }
}

/// Splits an address cell into address and embedded port.
///
/// Handles `a.b.c.d:port` and `[v6]:port`; a bare IPv6 address is returned
/// whole. The address part is trimmed but not validated.
pub fn split_address_port(text: &str) -> (&str, Option<&str>) {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix('[') {
        if let Some((address, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').map(str::trim);
            return (address.trim(), port);
        }
        return (text, None);
    }

    // A single colon after a dotted address is an IPv4 port suffix
    if text.contains('.') && text.matches(':').count() == 1 {
        if let Some((address, port)) = text.split_once(':') {
            return (address.trim(), Some(port.trim()));
        }
    }

    (text, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ipv4() {
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(is_valid_ipv4("104.16.0.1"));
    }

    #[test]
    fn test_invalid_ipv4() {
        for bad in [
            "999.1.2.3",
            "1.2.3",
            "1.2.3.4.5",
            "256.0.0.1",
            "1..2.3",
            "a.b.c.d",
            "1.2.3.4 ",
            "+1.2.3.4",
            "1.2.3.-4",
            "",
            "1.2.3.99999999999999999999",
        ] {
            assert!(!is_valid_ipv4(bad), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_valid_ipv6() {
        assert!(is_valid_ipv6("2001:0db8:85a3:0000:0000:8a2e:0370:7334"));
        assert!(is_valid_ipv6("2606:4700:0:0:0:0:6810:1"));
        assert!(is_valid_ipv6("FFFF:ffff:0:0:0:0:0:1"));
    }

    #[test]
    fn test_invalid_ipv6() {
        for bad in [
            "abcd:efgh:0:0:0:0:0:1",
            "2001:db8::1",
            "2001:0db8:85a3:0000:0000:8a2e:0370",
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334:1",
            "12345:0:0:0:0:0:0:1",
            "::ffff:1.2.3.4",
        ] {
            assert!(!is_valid_ipv6(bad), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_is_valid_address_dispatch() {
        assert!(is_valid_address("192.168.1.1"));
        assert!(is_valid_address("2001:db8:0:0:0:0:0:1"));
        assert!(!is_valid_address("1.2.3.4:443"));
        assert!(!is_valid_address("example.com"));
    }

    #[test]
    fn test_split_address_port() {
        assert_eq!(split_address_port("1.2.3.4"), ("1.2.3.4", None));
        assert_eq!(split_address_port(" 1.2.3.4:2053 "), ("1.2.3.4", Some("2053")));
        assert_eq!(
            split_address_port("[2001:db8:0:0:0:0:0:1]:8443"),
            ("2001:db8:0:0:0:0:0:1", Some("8443"))
        );
        assert_eq!(
            split_address_port("2001:db8:0:0:0:0:0:1"),
            ("2001:db8:0:0:0:0:0:1", None)
        );
        assert_eq!(
            split_address_port("[2001:db8:0:0:0:0:0:1]"),
            ("2001:db8:0:0:0:0:0:1", None)
        );
    }
}
