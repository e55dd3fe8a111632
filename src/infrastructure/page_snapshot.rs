// Page snapshot - Reads the samples and site root embedded in the dashboard page
use crate::domain::sample::EmbeddedSample;
use anyhow::Context;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

const RESULT_CLASS: &str = "js-test-result";

static START_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").expect("valid tag regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute regex")
});

/// What the rendered speed-tester page carries for the charts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSnapshot {
    /// `data-site-root` of the `<html>` element
    pub site_root: Option<String>,
    /// `.js-test-result` elements in document order (newest first)
    pub samples: Vec<EmbeddedSample>,
}

impl PageSnapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page snapshot {}", path.display()))?;
        let snapshot = Self::parse(&html);

        tracing::debug!(
            "Page snapshot {} has {} embedded results",
            path.display(),
            snapshot.samples.len()
        );
        Ok(snapshot)
    }

    pub fn parse(html: &str) -> Self {
        let mut snapshot = PageSnapshot::default();

        for tag in START_TAG.captures_iter(html) {
            let name = &tag[1];
            let attrs = attributes(&tag[2]);

            if name.eq_ignore_ascii_case("html") {
                if let Some(root) = attrs.get("data-site-root") {
                    snapshot.site_root = Some(root.clone());
                }
                continue;
            }

            let is_result = attrs
                .get("class")
                .is_some_and(|class| class.split_whitespace().any(|c| c == RESULT_CLASS));
            if is_result {
                snapshot.samples.push(EmbeddedSample::new(
                    attrs.get("data-date").cloned().unwrap_or_default(),
                    attrs.get("data-download").cloned().unwrap_or_default(),
                ));
            }
        }

        snapshot
    }
}

fn attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|c| {
            let value = c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .map_or("", |m| m.as_str());
            (c[1].to_ascii_lowercase(), unescape(value))
        })
        .collect()
}

/// Decode the character references the page template emits in attribute values
fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';').and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
