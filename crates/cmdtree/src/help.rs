/// One help row: the flag as it is typed on the left, its description on
/// the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDoc {
    pub left: String,
    pub right: Option<String>,
}

impl FlagDoc {
    pub fn new(left: impl Into<String>, right: Option<String>) -> Self {
        Self {
            left: left.into(),
            right,
        }
    }
}

/// Render rows as a two-column table, indented by four spaces, with the left
/// column padded to the widest entry.
pub fn render_docs(docs: &[FlagDoc]) -> String {
    let width = docs.iter().map(|d| d.left.len()).max().unwrap_or(0);
    let mut out = String::new();
    for doc in docs {
        match doc.right.as_deref().map(str::trim) {
            Some(right) if !right.is_empty() => {
                out.push_str(&format!("    {:width$}  {}\n", doc.left, right, width = width));
            }
            _ => out.push_str(&format!("    {}\n", doc.left)),
        }
    }
    out
}
