//! The code emission boundary.

/// An append-only builder for generated code.
///
/// Emitters receive literal text and nesting markers; they never interpret
/// what they are given.
pub trait CodeEmitter {
    /// Appends a literal fragment.
    fn text(&mut self, fragment: &str);

    /// Opens a nested fragment holding a child expression's code.
    fn begin_nested(&mut self) {}

    /// Closes the innermost nested fragment.
    fn end_nested(&mut self) {}
}

#[derive(Debug)]
enum Fragment {
    Text(String),
    Nested(Vec<Fragment>),
}

/// A [`CodeEmitter`] that keeps the fragment tree and flattens it on demand.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    root: Vec<Fragment>,
    /// Open nested fragments, innermost last.
    open: Vec<Vec<Fragment>>,
}

impl CodeBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Vec<Fragment> {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    /// Flattens the buffer into source text.
    ///
    /// Nested fragments still open are closed implicitly.
    #[must_use]
    pub fn finish(mut self) -> String {
        while let Some(nested) = self.open.pop() {
            self.current().push(Fragment::Nested(nested));
        }
        let mut out = String::new();
        flatten(&self.root, &mut out);
        out
    }
}

fn flatten(fragments: &[Fragment], out: &mut String) {
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Nested(children) => flatten(children, out),
        }
    }
}

impl CodeEmitter for CodeBuffer {
    fn text(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        let current = self.current();
        if let Some(Fragment::Text(last)) = current.last_mut() {
            last.push_str(fragment);
        } else {
            current.push(Fragment::Text(fragment.to_string()));
        }
    }

    fn begin_nested(&mut self) {
        self.open.push(Vec::new());
    }

    fn end_nested(&mut self) {
        if let Some(nested) = self.open.pop() {
            self.current().push(Fragment::Nested(nested));
        }
    }
}

impl CodeEmitter for String {
    fn text(&mut self, fragment: &str) {
        self.push_str(fragment);
    }
}
