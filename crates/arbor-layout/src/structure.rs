//! Nested chart input: a configuration patch plus the root node structure.

use crate::config::{ChartConfigPatch, ConnectorStylePatch};
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    #[serde(default)]
    pub chart: ChartConfigPatch,
    pub node_structure: NodeSpec,
}

impl ChartDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A text field is either a bare string or an object carrying the value plus an optional link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Rich {
        val: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl TextValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Rich { val, .. } => val,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSpec {
    pub text: IndexMap<String, TextValue>,
    pub image: Option<String>,
    #[serde(rename = "innerHTML")]
    pub inner_html: Option<String>,
    #[serde(rename = "HTMLclass")]
    pub html_class: Option<String>,
    #[serde(rename = "HTMLid")]
    pub html_id: Option<String>,
    pub link: Option<LinkSpec>,
    pub collapsed: bool,
    pub collapsable: Option<bool>,
    pub pseudo: bool,
    pub children_drop_level: usize,
    pub stack_children: bool,
    pub connectors: Option<ConnectorStylePatch>,
    pub draw_line_through: Option<bool>,
    /// Pre-measured width; together with `height` it marks the node as measured.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub children: Option<Vec<NodeSpec>>,
}

impl NodeSpec {
    /// A measured node without content.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn named(name: &str) -> Self {
        let mut spec = Self::default();
        spec.text
            .insert("name".to_string(), TextValue::Plain(name.to_string()));
        spec
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    pub(crate) fn has_grand_children(&self) -> bool {
        self.children
            .as_ref()
            .is_some_and(|children| children.iter().any(|c| c.children.is_some()))
    }
}
