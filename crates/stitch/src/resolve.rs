//! Resolving component and custom-tag outlets.
//!
//! Components may contain further `<pogon_component>` outlets, so resolution
//! runs in passes. Each pass:
//!
//! 1. merges every `<pogon_component>` currently in the document, in document order;
//! 2. for each registered custom tag, in registration order, resolves every
//!    matching element in document order through its handler;
//! 3. records how many component outlets step 1 found.
//!
//! Passes repeat while the last one found at least one component outlet. The
//! stop condition looks only at component outlets: a pass that finds none
//! ends resolution even when its custom tags introduced new outlets. Fragment
//! authors rely on custom tags getting at most one pass after the components
//! settle, so this is kept as is.
//!
//! Everything is sequential. One outlet is fully loaded and merged before the
//! next is looked at, which makes the output deterministic for a given set of
//! files and handlers.

use std::path::Path;

use serde_json::Value;
use stitch_dom::Document;
use tracing::debug;

use crate::error::ComposeError;
use crate::markup::{COMPONENT_NAME_ATTR, COMPONENT_TAG};
use crate::merge::merge;
use crate::source::Fragments;
use crate::tags::{Attributes, TagRegistry};

/// Counts gathered while resolving a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Passes run, including the final one that found no component outlets.
    pub passes: usize,
    /// Component outlets merged.
    pub components: usize,
    /// Custom-tag elements merged.
    pub custom_tags: usize,
}

/// Resolves outlets in `doc` until a pass finds no component outlets.
///
/// Relative names are joined to `dir`. `max_passes` bounds the number of
/// passes (`0` means unbounded) so a component that includes itself fails with
/// [`ComposeError::PassLimitExceeded`] instead of looping forever.
pub async fn resolve_outlets(
    doc: &Document,
    options: &Value,
    dir: &Path,
    fragments: Fragments<'_>,
    tags: &TagRegistry,
    max_passes: usize,
) -> Result<ResolveStats, ComposeError> {
    let mut stats = ResolveStats::default();

    loop {
        if max_passes > 0 && stats.passes >= max_passes {
            return Err(ComposeError::PassLimitExceeded { limit: max_passes });
        }
        stats.passes += 1;

        let outlets = doc.elements_by_tag(COMPONENT_TAG);
        for outlet in &outlets {
            let name = outlet
                .attr(COMPONENT_NAME_ATTR)
                .ok_or(ComposeError::MissingComponentName)?;
            let component = fragments.load(&dir.join(name), options).await?;
            merge(doc, outlet, &component);
        }
        stats.components += outlets.len();

        let mut custom_tags = 0;
        for (tag, handler) in tags.snapshot() {
            for element in doc.elements_by_tag(&tag) {
                let attributes: Attributes = element.attributes().into_iter().collect();
                let inner_html = element.inner_html().map_err(|err| ComposeError::Parse {
                    path: dir.to_path_buf(),
                    message: format!("could not read the contents of <{tag}>: {err}"),
                })?;

                let expansion = handler
                    .expand(options, &attributes, &inner_html)
                    .await
                    .map_err(|err| ComposeError::handler(tag.as_str(), err))?;

                let component = fragments
                    .load(&dir.join(&expansion.component), &expansion.options)
                    .await?;
                merge(doc, &element, &component);
                custom_tags += 1;
            }
        }
        stats.custom_tags += custom_tags;

        debug!(
            pass = stats.passes,
            components = outlets.len(),
            custom_tags,
            "outlet resolution pass"
        );

        if outlets.is_empty() {
            return Ok(stats);
        }
    }
}
