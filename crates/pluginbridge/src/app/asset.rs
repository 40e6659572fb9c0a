//! Container markup wrapping embedded assets.

use crate::domain::model::{EmbeddedAssetData, HostId, Markup};

const ELEMENT_ID_PREFIX: &str = "asset-";

/// The `<div>` the editor receives for an embedded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetContainer {
    article_scoped_id: String,
    external_id: Option<String>,
    classes: Vec<String>,
    inner_html: String,
}

impl AssetContainer {
    /// Build the container for `article_scoped_id`, taking the external id and classes from
    /// `data` and using `markup` as the inner content.
    pub fn build(article_scoped_id: &HostId, data: &EmbeddedAssetData, markup: &str) -> Self {
        let mut classes: Vec<String> = Vec::new();
        if let Some(asset_class) = data.asset_class.as_deref() {
            for token in asset_class.split_whitespace() {
                if !classes.iter().any(|existing| existing == token) {
                    classes.push(token.to_owned());
                }
            }
        }

        Self {
            article_scoped_id: article_scoped_id.to_string(),
            external_id: data.external_id().map(HostId::to_string),
            classes,
            inner_html: markup.to_owned(),
        }
    }

    /// DOM id of the container, `asset-<article scoped id>`.
    pub fn element_id(&self) -> String {
        format!("{ELEMENT_ID_PREFIX}{}", self.article_scoped_id)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }
}

impl Markup for AssetContainer {
    fn outer_html(&self) -> String {
        let mut html = format!(
            "<div id=\"{}\" data-internal-id=\"{}\"",
            escape_attribute(&self.element_id()),
            escape_attribute(&self.article_scoped_id)
        );
        if let Some(external_id) = &self.external_id {
            html.push_str(&format!(
                " data-external-id=\"{}\"",
                escape_attribute(external_id)
            ));
        }
        if !self.classes.is_empty() {
            html.push_str(&format!(
                " class=\"{}\"",
                escape_attribute(&self.classes.join(" "))
            ));
        }
        html.push('>');
        html.push_str(&self.inner_html);
        html.push_str("</div>");
        html
    }
}

/// DOM id the editor uses for the asset with `article_scoped_id`.
pub fn element_id_for(article_scoped_id: &HostId) -> String {
    format!("{ELEMENT_ID_PREFIX}{article_scoped_id}")
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn renders_minimal_container() {
        let container = AssetContainer::build(&HostId::from(42u64), &EmbeddedAssetData::default(), "<img src=\"a.png\">");
        assert_eq!(container.element_id(), "asset-42");
        assert_snapshot!(
            container.outer_html(),
            @r#"<div id="asset-42" data-internal-id="42"><img src="a.png"></div>"#
        );
    }

    #[test]
    fn renders_external_id_and_classes() {
        let data = EmbeddedAssetData::new("image")
            .with_external_id("ext-9")
            .with_class("a  b");
        let container = AssetContainer::build(&"7".into(), &data, "<p>x</p>");
        assert_eq!(container.classes(), ["a", "b"]);
        assert_snapshot!(
            container.outer_html(),
            @r#"<div id="asset-7" data-internal-id="7" data-external-id="ext-9" class="a b"><p>x</p></div>"#
        );
    }

    #[test]
    fn duplicate_and_blank_class_tokens_are_dropped() {
        let data = EmbeddedAssetData::new("image").with_class(" wide wide\tlead ");
        let container = AssetContainer::build(&"1".into(), &data, "");
        assert_eq!(container.classes(), ["wide", "lead"]);

        let blank = EmbeddedAssetData::new("image").with_class("   ");
        assert!(AssetContainer::build(&"1".into(), &blank, "").classes().is_empty());
    }

    #[test]
    fn attribute_values_are_escaped() {
        let data = EmbeddedAssetData::new("image").with_external_id("a\"b<c>&");
        let html = AssetContainer::build(&"1".into(), &data, "").outer_html();
        assert!(html.contains("data-external-id=\"a&quot;b&lt;c&gt;&amp;\""));
    }

    #[test]
    fn numeric_ids_render_without_quotes() {
        let data = EmbeddedAssetData::new(3u64).with_external_id(880u64);
        let container = AssetContainer::build(&HostId::from(15u64), &data, "");
        assert_eq!(container.element_id(), element_id_for(&HostId::from(15u64)));
        assert_snapshot!(
            container.outer_html(),
            @r#"<div id="asset-15" data-internal-id="15" data-external-id="880"></div>"#
        );
    }
}
