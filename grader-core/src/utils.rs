use crate::constants::BYTES_PER_MIB;

/// Join a base URL and a relative path with exactly one slash between them.
/// Absolute URLs are returned unchanged.
pub fn join_url(base: &str, path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") {
        return p.to_string();
    }
    let base = base.trim();
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    let p = p.trim_start_matches('/');
    format!("{}{}", base, p)
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// CSS selector for the page's `a.nav-link` pointing at `href`.
pub fn nav_link_selector(href: &str) -> String {
    let escaped = href.replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"a.nav-link[href="{escaped}"]"#)
}

/// Size in mebibytes with two decimals, e.g. `2.00`.
pub fn mebibytes(size_bytes: u64) -> String {
    format!("{:.2}", size_bytes as f64 / BYTES_PER_MIB)
}

/// Integral scores print without a fraction, others with at most two decimals.
pub fn format_score(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.fract() == 0.0 {
        return format!("{}", v as i64);
    }
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(join_url("http://localhost:5000", "upload"), "http://localhost:5000/upload");
        assert_eq!(join_url("http://localhost:5000/", "/ai_score"), "http://localhost:5000/ai_score");
        assert_eq!(join_url("/api", "upload"), "/api/upload");
        assert_eq!(join_url("/api", "https://grader.example/upload"), "https://grader.example/upload");
    }

    #[test]
    fn query_params_are_decoded() {
        let search = "?backend=remote&api=http%3A%2F%2Fgrader.local%3A8080&lang=en";
        assert_eq!(get_query_param(search, "backend").as_deref(), Some("remote"));
        assert_eq!(
            get_query_param(search, "api").as_deref(),
            Some("http://grader.local:8080")
        );
        assert_eq!(get_query_param(search, "missing"), None);
        assert_eq!(get_query_param("?note=a+b", "note").as_deref(), Some("a b"));
    }

    #[test]
    fn sizes_render_in_mebibytes() {
        assert_eq!(mebibytes(2 * 1024 * 1024), "2.00");
        assert_eq!(mebibytes(1_572_864), "1.50");
        assert_eq!(mebibytes(0), "0.00");
    }

    #[test]
    fn scores_drop_needless_decimals() {
        assert_eq!(format_score(85.0), "85");
        assert_eq!(format_score(17.5), "17.5");
        assert_eq!(format_score(33.333), "33.33");
        assert_eq!(format_score(f64::NAN), "0");
    }

    #[test]
    fn nav_link_selector_follows_the_configured_page() {
        assert_eq!(
            nav_link_selector("result.html"),
            r#"a.nav-link[href="result.html"]"#
        );
        assert_eq!(
            nav_link_selector("grade/\"x\".html"),
            r#"a.nav-link[href="grade/\"x\".html"]"#
        );
    }
}
