//! Accumulating output buffer
//!
//! Conversions append to one buffer instead of replacing it, so several
//! blocks can be converted one after another and copied together.

/// Batch emitted by a convert-all over a pattern without blocks
pub const NO_BLOCKS_WARNING: &str = "<!-- Warning: no input blocks -->\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    content: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a previously persisted buffer
    pub fn from_saved(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Appends the output of a single-block conversion
    ///
    /// Blank fragments are ignored. The fragment itself is appended as is.
    pub fn append_fragment(&mut self, fragment: &str) {
        if fragment.trim().is_empty() {
            return;
        }
        self.push_separated(fragment);
    }

    /// Appends the concatenated output of a convert-all
    ///
    /// # Example
    ///
    /// ```
    /// use blockpress_core::output::OutputBuffer;
    ///
    /// let mut buffer = OutputBuffer::new();
    /// buffer.append_batch(&["<p>a</p>\n".to_string(), "<p>b</p>\n".to_string()]);
    /// buffer.append_batch(&[]);
    /// assert_eq!(
    ///     buffer.as_str(),
    ///     "<p>a</p>\n<p>b</p>\n<!-- Warning: no input blocks -->"
    /// );
    /// ```
    pub fn append_batch(&mut self, fragments: &[String]) {
        let batch = if fragments.is_empty() {
            NO_BLOCKS_WARNING.to_string()
        } else {
            fragments.concat()
        };

        if batch.trim().is_empty() {
            return;
        }
        self.push_separated(batch.trim_end());
    }

    fn push_separated(&mut self, text: &str) {
        if !self.content.trim().is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(text);
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
