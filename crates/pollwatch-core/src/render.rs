//! Markup rendering for the results content element.
//!
//! Output is a flat HTML fragment with no whitespace between parts, so
//! identical payloads always produce byte-identical markup.

use std::borrow::Cow;

use crate::types::PollResultPayload;

/// Shown when the container carries no poll id. Polling never starts.
pub const MISSING_POLL_ID: &str = "<p>Error: No poll ID found.</p>";

/// Shown when the payload lacks `options` or `results`.
pub const NO_RESULTS: &str = "<p>No results yet.</p>";

/// Render a payload into the results fragment.
///
/// ```text
/// <ul><li><strong>Tabs:</strong> 12 vote(s)</li>...</ul>
/// <p><strong>Total Votes:</strong> 20</p>
/// <p><strong>Unique Voters:</strong> 17</p>
/// ```
///
/// The unique-voters line appears whenever the payload carries the key, even
/// with a `null` value.
pub fn render_results(payload: &PollResultPayload) -> String {
    let Some(rows) = payload.rows() else {
        return NO_RESULTS.to_string();
    };

    let mut html = String::from("<ul>");
    for row in &rows {
        html.push_str(&format!(
            "<li><strong>{}:</strong> {} vote(s)</li>",
            escape_html(row.text),
            row.votes
        ));
    }
    html.push_str("</ul>");

    html.push_str(&format!(
        "<p><strong>Total Votes:</strong> {}</p>",
        payload.total_votes_or_sum()
    ));

    if let Some(ref unique) = payload.unique_voters {
        html.push_str(&format!(
            "<p><strong>Unique Voters:</strong> {}</p>",
            escape_html(&json_text(unique))
        ));
    }

    html
}

/// Display text for a raw JSON value: strings unquoted, everything else
/// as JSON (`null` stays `null`).
fn json_text(value: &serde_json::Value) -> Cow<'_, str> {
    match value {
        serde_json::Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Render the fetch-failure placeholder around an error message.
pub fn render_error(message: &str) -> String {
    format!("<p>Error loading results: {}</p>", escape_html(message))
}

/// Escape the five HTML-significant characters. Borrows when nothing
/// needs escaping.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> PollResultPayload {
        PollResultPayload::from_value(value).expect("decode payload")
    }

    fn sample() -> PollResultPayload {
        payload(json!({
            "options": [
                {"id": "1", "text": "Tabs"},
                {"id": "2", "text": "Spaces"},
                {"id": "3", "text": "Both"},
            ],
            "results": {"1": 12, "2": 8},
            "total_votes": 20,
        }))
    }

    #[test]
    fn renders_full_fragment() {
        assert_eq!(
            render_results(&sample()),
            "<ul>\
             <li><strong>Tabs:</strong> 12 vote(s)</li>\
             <li><strong>Spaces:</strong> 8 vote(s)</li>\
             <li><strong>Both:</strong> 0 vote(s)</li>\
             </ul>\
             <p><strong>Total Votes:</strong> 20</p>"
        );
    }

    #[test]
    fn one_item_per_option() {
        let out = render_results(&sample());
        assert_eq!(out.matches("<li>").count(), 3);
        let tabs = out.find("Tabs").expect("tabs");
        let spaces = out.find("Spaces").expect("spaces");
        let both = out.find("Both").expect("both");
        assert!(tabs < spaces && spaces < both, "option order preserved");
    }

    #[test]
    fn total_votes_line() {
        let p = payload(json!({
            "options": [{"id": "1", "text": "A"}],
            "results": {"1": 42},
            "total_votes": 42,
        }));
        let out = render_results(&p);
        assert!(out.contains("<strong>Total Votes:</strong> 42"), "{out}");
    }

    #[test]
    fn unique_voters_only_when_present() {
        let mut p = sample();
        assert!(!render_results(&p).contains("Unique Voters"));

        p.unique_voters = Some(json!(7));
        let out = render_results(&p);
        assert!(out.ends_with("<p><strong>Unique Voters:</strong> 7</p>"), "{out}");
    }

    #[test]
    fn unique_voters_zero_still_rendered() {
        let mut p = sample();
        p.unique_voters = Some(json!(0));
        assert!(render_results(&p).contains("<strong>Unique Voters:</strong> 0"));
    }

    #[test]
    fn unique_voters_null_key_still_rendered() {
        let p = payload(json!({
            "options": [{"id": "1", "text": "A"}],
            "results": {"1": 3},
            "total_votes": 3,
            "unique_voters": null,
        }));
        assert_eq!(
            render_results(&p),
            "<ul><li><strong>A:</strong> 3 vote(s)</li></ul>\
             <p><strong>Total Votes:</strong> 3</p>\
             <p><strong>Unique Voters:</strong> null</p>"
        );
    }

    #[test]
    fn null_count_renders_zero_for_that_option() {
        let p = payload(json!({
            "poll_id": "3",
            "options": [{"id": "1", "text": "A"}, {"id": "2", "text": "B"}],
            "results": {"1": 3, "2": null},
            "total_votes": 3,
        }));
        let out = render_results(&p);
        assert!(out.contains("<li><strong>A:</strong> 3 vote(s)</li>"), "{out}");
        assert!(out.contains("<li><strong>B:</strong> 0 vote(s)</li>"), "{out}");
    }

    #[test]
    fn overflowing_counts_do_not_panic() {
        let p = payload(json!({
            "options": [{"id": "1", "text": "A"}],
            "results": {"1": u64::MAX, "2": 1},
        }));
        let out = render_results(&p);
        assert!(
            out.contains(&format!("<strong>Total Votes:</strong> {}", u64::MAX)),
            "{out}"
        );
    }

    #[test]
    fn missing_options_is_placeholder() {
        let p = payload(json!({"results": {"1": 3}, "total_votes": 3}));
        assert_eq!(render_results(&p), NO_RESULTS);
    }

    #[test]
    fn missing_results_is_placeholder() {
        let p = payload(json!({"options": [{"id": "1", "text": "A"}]}));
        assert_eq!(render_results(&p), NO_RESULTS);
        assert_eq!(render_results(&PollResultPayload::default()), NO_RESULTS);
    }

    #[test]
    fn empty_options_renders_empty_list() {
        let p = payload(json!({"options": [], "results": {}, "total_votes": 0}));
        assert_eq!(
            render_results(&p),
            "<ul></ul><p><strong>Total Votes:</strong> 0</p>"
        );
    }

    #[test]
    fn identical_payloads_render_identically() {
        // HashMap iteration order must not leak into the output.
        let a = render_results(&sample());
        let b = render_results(&sample());
        assert_eq!(a, b);
    }

    #[test]
    fn option_text_is_escaped() {
        let p = payload(json!({
            "options": [{"id": "1", "text": "<script>alert('x')</script>"}],
            "results": {"1": 1},
            "total_votes": 1,
        }));
        let out = render_results(&p);
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn error_placeholder_wraps_message() {
        assert_eq!(
            render_error("connection refused"),
            "<p>Error loading results: connection refused</p>"
        );
        assert_eq!(
            render_error("bad <body>"),
            "<p>Error loading results: bad &lt;body&gt;</p>"
        );
    }

    #[test]
    fn escape_borrows_clean_input() {
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"q\""), "&quot;q&quot;");
    }
}
