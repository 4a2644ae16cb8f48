//! Resource identity tokens
//!
//! DNS zones are identified by `"{version}-{zone}-{hostname}"`, GTM domains
//! by their bare name. Both forms must parse back into the lookup key on
//! import.

use uuid::Uuid;

const UUID_LEN: usize = 36;

/// Identity token of a DNS zone.
pub fn zone_identity(version: &str, zone: &str, hostname: &str) -> String {
    format!("{version}-{zone}-{hostname}")
}

/// Identity token of a GTM domain.
pub fn domain_identity(name: &str) -> String {
    name.to_string()
}

/// Zone name from an identity token or a bare zone name.
///
/// A leading UUID version is stripped first, leaving `"{zone}-{zone}"`.
/// Without a UUID the token must still carry some version before the doubled
/// name, `"{version}-{zone}-{zone}"`; the longest such `zone` wins. Anything
/// else is taken as a bare zone name, so `"foo-foo"` parses as itself. A bare
/// name that happens to end in `-{p}-{p}` (e.g. `"foo-bar-bar"`) cannot be
/// told apart from a token and parses as `p`.
pub fn parse_zone_identity(token: &str) -> &str {
    let versioned = match token.get(..UUID_LEN) {
        Some(head)
            if token.as_bytes().get(UUID_LEN) == Some(&b'-') && Uuid::parse_str(head).is_ok() =>
        {
            Some(&token[UUID_LEN + 1..])
        }
        _ => None,
    };
    if let Some(zone) = versioned.and_then(split_doubled) {
        return zone;
    }
    let rest = versioned.unwrap_or(token);
    for (idx, _) in rest.match_indices('-') {
        if let Some(zone) = split_doubled(&rest[idx + 1..]) {
            return zone;
        }
    }
    rest
}

/// `p` when `s` is exactly `"{p}-{p}"`.
fn split_doubled(s: &str) -> Option<&str> {
    if s.len() % 2 == 0 {
        return None;
    }
    let mid = s.len() / 2;
    let (left, right) = (s.get(..mid)?, s.get(mid + 1..)?);
    (s.as_bytes()[mid] == b'-' && !left.is_empty() && left == right).then_some(left)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const VERSION: &str = "ae02357c-693d-4ac4-b33d-8352d9b7c786";

    #[test]
    fn zone_identity_round_trips() {
        for zone in ["river.com", "my-zone.example.net", "a-b-c.org", "x"] {
            let token = zone_identity(VERSION, zone, zone);
            assert_eq!(parse_zone_identity(&token), zone, "token {token}");
        }
    }

    #[test]
    fn non_uuid_versions_still_parse() {
        assert_eq!(parse_zone_identity("7-river.com-river.com"), "river.com");
        assert_eq!(
            parse_zone_identity("v-1-my-zone.net-my-zone.net"),
            "my-zone.net"
        );
    }

    #[test]
    fn doubled_bare_name_is_not_collapsed() {
        assert_eq!(parse_zone_identity("foo-foo"), "foo-foo");
        assert_eq!(parse_zone_identity("a.b-a.b"), "a.b-a.b");
        assert_eq!(
            parse_zone_identity(&zone_identity(VERSION, "foo-foo", "foo-foo")),
            "foo-foo"
        );
    }

    #[test]
    fn bare_zone_names_parse_as_themselves() {
        assert_eq!(parse_zone_identity("river.com"), "river.com");
        assert_eq!(parse_zone_identity("my-zone.example.net"), "my-zone.example.net");
        assert_eq!(parse_zone_identity(""), "");
    }

    #[test]
    fn zone_identity_is_injective_over_realistic_tuples() {
        let versions = [
            VERSION,
            "0b8bd2a1-0c1f-4c52-8c1a-5b1e3c7f9d10",
            "",
        ];
        let names = ["river.com", "lake.com", "my-zone.net", "zone.net", "my"];
        let mut seen = HashSet::new();
        let mut tuples = 0;
        for v in versions {
            for p in names {
                for s in names {
                    tuples += 1;
                    seen.insert(zone_identity(v, p, s));
                }
            }
        }
        assert_eq!(seen.len(), tuples);
    }

    #[test]
    fn domain_identity_is_the_name() {
        assert_eq!(domain_identity("example.akadns.net"), "example.akadns.net");
    }
}
