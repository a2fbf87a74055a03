use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

/// Matches `path` against a route template.
///
/// Segments written `:name` or `{name}` capture one non-empty path segment,
/// percent-decoded. Literal segments compare against the raw path, and empty
/// segments are significant: `/health/` does not match `/health`.
/// A trailing `/*` matches any remainder, including nothing.
pub fn match_template(template: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    let mut tpl = segments(template);
    let mut segs = segments(path);

    loop {
        match (tpl.next(), segs.next()) {
            (None, None) => return Some(params),
            (Some("*"), _) => return Some(params),
            (Some(t), Some(s)) => {
                if let Some(name) = param_name(t) {
                    if s.is_empty() {
                        return None;
                    }
                    let value = percent_decode_str(s).decode_utf8().ok()?;
                    params.insert(name.to_string(), value.into_owned());
                } else if t != s {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

fn segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

fn param_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix(':')
        .or_else(|| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_both_param_styles() {
        let params = match_template("/v1/projects/:project_id/metrics", "/v1/projects/p9/metrics")
            .unwrap();
        assert_eq!(params["project_id"], "p9");
        let params = match_template("/v1/{org}/x", "/v1/acme/x").unwrap();
        assert_eq!(params["org"], "acme");
    }

    #[test]
    fn literal_segments_must_match() {
        assert!(match_template("/v1/projects", "/v1/project").is_none());
        assert!(match_template("/v1/projects/:id", "/v1/projects").is_none());
        assert!(match_template("/v1/projects", "/v1/projects/p1").is_none());
    }

    #[test]
    fn trailing_wildcard_takes_the_rest() {
        assert!(match_template("/static/*", "/static/a/b.css").is_some());
        assert!(match_template("/static/*", "/static").is_some());
    }

    #[test]
    fn trailing_slash_is_a_different_path() {
        assert!(match_template("/health", "/health/").is_none());
        assert!(match_template("/v1/projects/:project_id", "/v1/projects/p1/").is_none());
        assert!(match_template("/v1/projects/:project_id", "/v1/projects//").is_none());
    }

    #[test]
    fn captures_are_percent_decoded() {
        let params = match_template("/v1/projects/:project_id", "/v1/projects/my%20proj").unwrap();
        assert_eq!(params["project_id"], "my proj");
        let params = match_template("/v1/projects/:project_id", "/v1/projects/a%2Fb").unwrap();
        assert_eq!(params["project_id"], "a/b");
        assert!(match_template("/v1/projects/:project_id", "/v1/projects/%FF").is_none());
    }
}
