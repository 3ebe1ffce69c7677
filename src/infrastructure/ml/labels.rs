use anyhow::Context;
use std::path::Path;

/// Reads the category names that pair with the model's output indices.
///
/// Accepts either one label per line or the `id,name` CSV label maps that
/// ship with the AIY food models.
pub fn load_labels(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read labels from {}", path.display()))?;
    let labels = parse_labels(&text);
    if labels.is_empty() {
        anyhow::bail!("label file {} contains no labels", path.display());
    }
    Ok(labels)
}

pub fn parse_labels(text: &str) -> Vec<String> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();

    let is_csv = lines
        .peek()
        .map(|first| first.eq_ignore_ascii_case("id,name"))
        .unwrap_or(false);
    if is_csv {
        lines.next();
        return lines
            .map(|line| match line.split_once(',') {
                Some((_, name)) => name.trim().to_string(),
                None => line.to_string(),
            })
            .collect();
    }

    lines.map(str::to_string).collect()
}
