//! Legacy `/sb/{number}` short links.

/// Canonical scoreboard route for `number`, carrying `query` along.
///
/// `number` arrives decoded and is percent-encoded back into a single path
/// segment. Each key appears once with its last value, in order of first
/// appearance. Pairs are copied verbatim (no re-encoding).
pub fn build_redirect_target<K, V>(number: &str, query: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(query.len());
    for (key, value) in query {
        let (key, value) = (key.as_ref(), value.as_ref());
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    }

    let mut target = String::from("/fullscreen-scoreboard/");
    push_segment(&mut target, number);
    if !pairs.is_empty() {
        let encoded: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        target.push('?');
        target.push_str(&encoded.join("&"));
    }
    target
}

/// Append `segment`, escaping every byte outside the RFC 3986 unreserved set.
fn push_segment(out: &mut String, segment: &str) {
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
}

/// Split a raw query string into pairs without decoding them.
pub fn split_query(raw: &str) -> Vec<(&str, &str)> {
    raw.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| part.split_once('=').unwrap_or((part, "")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_carried_over() {
        assert_eq!(
            build_redirect_target("7", &[("a", "1"), ("b", "2")]),
            "/fullscreen-scoreboard/7?a=1&b=2"
        );
    }

    #[test]
    fn empty_query_has_no_question_mark() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(build_redirect_target("7", &none), "/fullscreen-scoreboard/7");
    }

    #[test]
    fn repeated_keys_keep_last_value_once() {
        assert_eq!(
            build_redirect_target("2", &[("a", "1"), ("b", "2"), ("a", "3")]),
            "/fullscreen-scoreboard/2?a=3&b=2"
        );
    }

    #[test]
    fn number_is_escaped_as_one_segment() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(
            build_redirect_target("\n", &none),
            "/fullscreen-scoreboard/%0A"
        );
        assert_eq!(
            build_redirect_target("a b/ä", &[("x", "1")]),
            "/fullscreen-scoreboard/a%20b%2F%C3%A4?x=1"
        );
        assert_eq!(build_redirect_target("10", &none), "/fullscreen-scoreboard/10");
    }

    #[test]
    fn raw_queries_are_not_decoded() {
        let pairs = split_query("theme=dark&title=Court%203&&flag");
        assert_eq!(
            pairs,
            vec![("theme", "dark"), ("title", "Court%203"), ("flag", "")]
        );
        assert_eq!(
            build_redirect_target("3", &pairs),
            "/fullscreen-scoreboard/3?theme=dark&title=Court%203&flag="
        );
    }
}
