use std::ops::Range;

/// Replacement of a byte range of the original region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl Edit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}

/// Splices edits into `source`. Bytes outside every edit are copied unchanged.
///
/// Edits are applied in source order; an edit overlapping an earlier one is dropped.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    if edits.is_empty() {
        return source.to_string();
    }
    edits.sort_by_key(|edit| edit.range.start);

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        if edit.range.start < last || edit.range.end > source.len() {
            continue;
        }
        out.push_str(&source[last..edit.range.start]);
        out.push_str(&edit.replacement);
        last = edit.range.end;
    }
    out.push_str(&source[last..]);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_apply_edits_in_source_order() {
        let source = "let a = 'x', b = 'y';";
        let edits = vec![Edit::new(17..20, "t('b')"), Edit::new(8..11, "t('a')")];
        assert_eq!(apply_edits(source, edits), "let a = t('a'), b = t('b');");
    }

    #[test]
    fn test_apply_edits_drops_overlaps() {
        let source = "0123456789";
        let edits = vec![Edit::new(2..6, "X"), Edit::new(4..8, "Y")];
        assert_eq!(apply_edits(source, edits), "01X6789");
    }

    #[test]
    fn test_apply_no_edits() {
        assert_eq!(apply_edits("unchanged", Vec::new()), "unchanged");
    }
}
