//! Span edits over the original source text.
//!
//! Stages collect `(start, end, text)` replacements while walking the AST and
//! splice them into the source afterwards, so untouched code keeps its exact
//! formatting.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

impl Edit {
    pub fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Edit {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn remove(start: u32, end: u32) -> Self {
        Self::replace(start, end, "")
    }

    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }
}

/// Apply `edits` to `source`. An edit starting inside a range that an
/// earlier (wider) edit already replaced is dropped.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in edits {
        let (start, end) = (edit.start as usize, edit.end as usize);
        if start < cursor || end > source.len() {
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.text);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_in_source_order() {
        let src = "let a = b + c;";
        let out = apply_edits(
            src,
            vec![Edit::replace(12, 13, "C"), Edit::replace(8, 9, "B")],
        );
        assert_eq!(out, "let a = B + C;");
    }

    #[test]
    fn test_nested_edit_is_dropped() {
        let src = "import { a } from 'x';\nrun();";
        let out = apply_edits(
            src,
            vec![Edit::replace(9, 10, "zzz"), Edit::remove(0, 22)],
        );
        assert_eq!(out, "\nrun();");
    }

    #[test]
    fn test_insert_after_replacement() {
        let out = apply_edits("f()", vec![Edit::insert(3, ";"), Edit::replace(0, 1, "g")]);
        assert_eq!(out, "g();");
    }
}
