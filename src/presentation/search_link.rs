/// Web search link for a predicted label, e.g. `...search?q=Pad%20thai`.
pub fn search_url_for(base_url: &str, label: &str) -> String {
    format!(
        "{}?q={}",
        base_url.trim_end_matches(['?', '/']),
        urlencoding::encode(label.trim())
    )
}
