//! Output file collection.
//!
//! Paths are the primary key: helper files synthesized during body
//! emission upsert by path, so repeated emits never duplicate. The map
//! preserves first-insertion order and materializes to a flat list on
//! finalize.

use indexmap::IndexMap;

/// One generated output file: a pack-root-relative path and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

/// Path-keyed builder for the output file set.
#[derive(Debug, Default)]
pub struct FileSet {
    files: IndexMap<String, String>,
}

impl FileSet {
    pub fn new() -> Self {
        Self {
            files: IndexMap::new(),
        }
    }

    /// Insert or replace the file at `path`.
    pub fn upsert(&mut self, path: impl Into<String>, contents: String) {
        self.files.insert(path.into(), contents);
    }

    /// True when a file at `path` has already been emitted.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Materialize to a list, preserving first-insertion order.
    pub fn into_files(self) -> Vec<GeneratedFile> {
        self.files
            .into_iter()
            .map(|(path, contents)| GeneratedFile { path, contents })
            .collect()
    }
}

/// Render mcfunction lines: newline-joined, with exactly one trailing
/// newline when non-empty.
pub(crate) fn render_function(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Command buffer for one file being emitted, carrying the temporary
/// counter for that emission context.
#[derive(Debug, Default)]
pub(crate) struct EmitBuf {
    lines: Vec<String>,
    tmp: usize,
}

impl EmitBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Allocate a fresh temporary score name.
    pub fn fresh_tmp(&mut self) -> String {
        let name = format!("__tmp{}", self.tmp);
        self.tmp += 1;
        name
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Remove and return all lines from `mark` onward. Used to wrap a
    /// just-emitted body in guard prefixes.
    pub fn drain_from(&mut self, mark: usize) -> Vec<String> {
        self.lines.split_off(mark)
    }

    pub fn render(&self) -> String {
        render_function(&self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_by_path() {
        let mut files = FileSet::new();
        files.upsert("a.txt", "one".to_string());
        files.upsert("a.txt", "two".to_string());
        let files = files.into_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].contents, "two");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut files = FileSet::new();
        files.upsert("b", String::new());
        files.upsert("a", String::new());
        files.upsert("b", "again".to_string());
        let paths: Vec<String> = files.into_files().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["b", "a"]);
    }

    #[test]
    fn test_render_function_trailing_newline() {
        assert_eq!(render_function(&[]), "");
        assert_eq!(
            render_function(&["say hi".to_string(), "say bye".to_string()]),
            "say hi\nsay bye\n"
        );
    }

    #[test]
    fn test_fresh_tmp_sequence() {
        let mut buf = EmitBuf::new();
        assert_eq!(buf.fresh_tmp(), "__tmp0");
        assert_eq!(buf.fresh_tmp(), "__tmp1");
    }

    #[test]
    fn test_drain_from() {
        let mut buf = EmitBuf::new();
        buf.push("a");
        let mark = buf.len();
        buf.push("b");
        buf.push("c");
        assert_eq!(buf.drain_from(mark), vec!["b", "c"]);
        assert_eq!(buf.render(), "a\n");
    }
}
