//! Differential writer for rendered pages.
//!
//! Hosts re-render after every event. The DiffRenderer serializes the tree,
//! compares it with the previous frame and only writes when something
//! changed.

use std::io::{self, Write};

use super::html::to_html;
use super::markup::Element;

/// Writes a frame only when its serialized form differs from the last one.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous: Option<String>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a frame to `out`.
    ///
    /// Returns true if the frame changed and was written.
    pub fn render(&mut self, root: &Element, out: &mut impl Write) -> io::Result<bool> {
        let html = to_html(root);
        if self.previous.as_deref() == Some(html.as_str()) {
            return Ok(false);
        }

        out.write_all(html.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;

        self.previous = Some(html);
        Ok(true)
    }

    /// Invalidate the previous frame.
    ///
    /// Next render always writes.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}
