/// Source patch engine
///
/// Generated and modified material is represented as offset-based edits
/// against the original module source, plus synthetic declarations appended
/// at the end. Applying a patch set is a pure text operation; the external
/// build pipeline decides what to do with the result.

use crate::error::{Result, TransformError};

/// One textual edit: replace `length` bytes at `offset` with `replacement`.
/// An insertion is an edit with `length == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub offset: usize,
    pub length: usize,
    pub replacement: String,
}

/// All edits for one module.
#[derive(Debug, Default)]
pub struct PatchSet {
    edits: Vec<SourceEdit>,
    appended: Vec<String>,
}

impl PatchSet {
    pub fn new() -> Self {
        PatchSet::default()
    }

    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.push(SourceEdit {
            offset,
            length: 0,
            replacement: text.into(),
        });
    }

    pub fn replace(&mut self, offset: usize, length: usize, text: impl Into<String>) {
        self.edits.push(SourceEdit {
            offset,
            length,
            replacement: text.into(),
        });
    }

    /// Append a synthetic declaration after the end of the module source.
    pub fn append(&mut self, declaration: impl Into<String>) {
        self.appended.push(declaration.into());
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.appended.is_empty()
    }

    pub fn edits(&self) -> &[SourceEdit] {
        &self.edits
    }

    /// Apply all edits to `source`. Edits must stay inside the source, land
    /// on character boundaries, and not overlap; insertions at the same
    /// offset keep their recording order. `module` is only used to tag the
    /// error. Offsets come from the external Program Model, so a malformed
    /// model must report, not panic.
    pub fn apply(&self, module: &str, source: &str) -> Result<String> {
        let mut ordered: Vec<(usize, &SourceEdit)> = self.edits.iter().enumerate().collect();
        // Stable by offset; recording order breaks ties.
        ordered.sort_by_key(|(index, e)| (e.offset, *index));

        let mut end_of_previous = 0usize;
        for (_, edit) in &ordered {
            let end = edit.offset.saturating_add(edit.length);
            if end > source.len()
                || !source.is_char_boundary(edit.offset)
                || !source.is_char_boundary(end)
            {
                return Err(TransformError::EditOutOfBounds {
                    module: module.to_string(),
                    offset: edit.offset,
                });
            }
            if edit.offset < end_of_previous {
                return Err(TransformError::EditOverlap {
                    module: module.to_string(),
                    offset: edit.offset,
                });
            }
            end_of_previous = end;
        }

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0usize;
        for (_, edit) in &ordered {
            out.push_str(&source[cursor..edit.offset]);
            out.push_str(&edit.replacement);
            cursor = edit.offset + edit.length;
        }
        out.push_str(&source[cursor..]);

        for declaration in &self.appended {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(declaration);
        }
        Ok(out)
    }
}
