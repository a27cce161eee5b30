//! Node size measurement.
//!
//! Layout only runs once every real node has a size. Synchronous measurers implement
//! [`NodeMeasurer`]; asynchronous ones (e.g. waiting on images) hand sizes over through
//! [`size_channel`], and [`crate::Tree::position_tree_when_measured`] awaits the report.

use crate::error::{Error, Result};
use crate::geom::{Size, size};
use crate::node::{NodeContent, NodeId};
use futures::channel::oneshot;
use rustc_hash::FxHashMap;
use unicode_width::UnicodeWidthStr;

pub type SizeMap = FxHashMap<NodeId, Size>;

/// Text keys a node renders; other keys are carried as data only.
pub const TEXT_FIELDS: [&str; 4] = ["name", "title", "desc", "contact"];

pub trait NodeMeasurer {
    /// Returns `None` while the node cannot be measured yet.
    fn measure(&self, content: &NodeContent) -> Option<Size>;
}

/// Text-metric measurer: every rendered text field is laid out as its own block of lines.
#[derive(Debug, Clone)]
pub struct DeterministicNodeMeasurer {
    pub font_size: f64,
    pub char_width_factor: f64,
    pub line_height_factor: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    /// Size used for nodes with an image. Without it such nodes stay unmeasured.
    pub image_size: Option<Size>,
}

impl Default for DeterministicNodeMeasurer {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            char_width_factor: 0.6,
            line_height_factor: 1.2,
            padding_x: 10.0,
            padding_y: 6.0,
            image_size: None,
        }
    }
}

impl DeterministicNodeMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<String> {
        text.replace("<br/>", "\n")
            .replace("<br />", "\n")
            .replace("<br>", "\n")
            .split('\n')
            .map(|s| s.to_string())
            .collect()
    }

    /// Drops markup tags, keeping their text.
    fn strip_tags(html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        out
    }

    /// Inner HTML replaces both text and image; otherwise only the rendered text fields count.
    fn content_lines(content: &NodeContent) -> Vec<String> {
        if let Some(html) = content.inner_html.as_deref() {
            return Self::normalized_text_lines(html)
                .iter()
                .map(|line| Self::strip_tags(line))
                .collect();
        }
        content
            .text
            .iter()
            .filter(|(key, _)| TEXT_FIELDS.contains(&key.as_str()))
            .flat_map(|(_, v)| Self::normalized_text_lines(v.as_str()))
            .collect()
    }
}

impl NodeMeasurer for DeterministicNodeMeasurer {
    fn measure(&self, content: &NodeContent) -> Option<Size> {
        let lines = Self::content_lines(content);
        let font_size = self.font_size.max(1.0);
        let max_cols = lines.iter().map(|l| l.width()).max().unwrap_or(0);

        let mut width = max_cols as f64 * font_size * self.char_width_factor;
        let mut height = lines.len() as f64 * font_size * self.line_height_factor;
        if content.inner_html.is_none() && content.image.is_some() {
            let image = self.image_size?;
            width = width.max(image.width);
            height += image.height;
        }
        Some(size(width + self.padding_x * 2.0, height + self.padding_y * 2.0))
    }
}

/// Sending half held by the measurement collaborator.
#[derive(Debug)]
pub struct SizeReporter {
    tx: oneshot::Sender<SizeMap>,
}

impl SizeReporter {
    /// Delivers the measured sizes. Returns `false` if the waiting side is gone.
    pub fn report(self, sizes: SizeMap) -> bool {
        self.tx.send(sizes).is_ok()
    }
}

/// Receiving half, awaited before a layout pass.
#[derive(Debug)]
pub struct SizeReport {
    rx: oneshot::Receiver<SizeMap>,
}

impl SizeReport {
    pub async fn wait(self) -> Result<SizeMap> {
        self.rx.await.map_err(|_| Error::MeasurementCancelled)
    }
}

pub fn size_channel() -> (SizeReporter, SizeReport) {
    let (tx, rx) = oneshot::channel();
    (SizeReporter { tx }, SizeReport { rx })
}
