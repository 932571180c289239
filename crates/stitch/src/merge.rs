//! Splicing one document into another.

use stitch_dom::{Document, Node};

/// Merges `source` into `target` at `outlet`.
///
/// 1. If both heads contain a `<title>`, the target's titles are removed so
///    the source title wins. A title present on only one side is kept.
/// 2. The source head's children are appended to the target head.
/// 3. The source body's children replace `outlet`, in order.
///
/// Nodes are moved, so `source` is left with an empty head and body.
pub fn merge(target: &Document, outlet: &Node, source: &Document) {
    if let (Some(target_head), Some(source_head)) = (target.head(), source.head()) {
        let target_titles = target_head.descendants_by_tag("title");
        if !target_titles.is_empty() && !source_head.descendants_by_tag("title").is_empty() {
            for title in target_titles {
                title.detach();
            }
        }
        target_head.append_children(source_head.take_children());
    }

    if let Some(source_body) = source.body() {
        outlet.insert_after(source_body.take_children());
    }
    outlet.detach();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(doc: &Document) -> Vec<String> {
        doc.head()
            .unwrap()
            .descendants_by_tag("title")
            .iter()
            .map(|t| t.text_content())
            .collect()
    }

    fn template() -> Document {
        Document::parse(
            "<html><head><title>Template</title><meta charset=\"utf-8\"></head>\
             <body><header>top</header><slot-here></slot-here><footer>bottom</footer></body></html>",
        )
    }

    fn outlet(doc: &Document) -> Node {
        doc.elements_by_tag("slot-here").remove(0)
    }

    #[test]
    fn test_source_title_wins() {
        let target = template();
        let source = Document::parse("<head><title>Page</title></head><body><p>x</p></body>");
        merge(&target, &outlet(&target), &source);
        assert_eq!(title_of(&target), vec!["Page"]);
    }

    #[test]
    fn test_template_title_kept_when_source_has_none() {
        let target = template();
        let source = Document::parse("<head><link rel=\"stylesheet\" href=\"a.css\"></head><p>x</p>");
        merge(&target, &outlet(&target), &source);
        assert_eq!(title_of(&target), vec!["Template"]);
    }

    #[test]
    fn test_source_title_used_when_template_has_none() {
        let target = Document::parse("<head></head><body><slot-here></slot-here></body>");
        let source = Document::parse("<head><title>Only</title></head>");
        merge(&target, &outlet(&target), &source);
        assert_eq!(title_of(&target), vec!["Only"]);
    }

    #[test]
    fn test_head_content_appended_after_target() {
        let target = template();
        let source = Document::parse("<head><link rel=\"icon\" href=\"i.png\"></head>");
        merge(&target, &outlet(&target), &source);
        assert_eq!(
            target.head().unwrap().inner_html().unwrap(),
            "<title>Template</title><meta charset=\"utf-8\"><link rel=\"icon\" href=\"i.png\">"
        );
    }

    #[test]
    fn test_body_replaces_outlet_in_place() {
        let target = template();
        let source = Document::parse("<body><p>one</p><p>two</p></body>");
        merge(&target, &outlet(&target), &source);

        assert!(target.elements_by_tag("slot-here").is_empty());
        assert_eq!(
            target.body().unwrap().inner_html().unwrap(),
            "<header>top</header><p>one</p><p>two</p><footer>bottom</footer>"
        );
        assert!(source.body().unwrap().children().is_empty());
    }

    #[test]
    fn test_empty_source_just_removes_outlet() {
        let target = template();
        let source = Document::parse("");
        merge(&target, &outlet(&target), &source);
        assert_eq!(
            target.body().unwrap().inner_html().unwrap(),
            "<header>top</header><footer>bottom</footer>"
        );
    }
}
