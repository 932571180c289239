//! Default-selection markers on form controls.
//!
//! Templates often know the value a control should start with but not which
//! of several controls carries it. Authors mark every candidate with the
//! expected value and let the composer pick:
//!
//! ```html
//! <input type="radio" name="size" value="s" pogon-checked="{{ size }}">
//! <input type="radio" name="size" value="m" pogon-checked="{{ size }}">
//! <option value="fr" pogon-selected="{{ lang }}">French</option>
//! ```
//!
//! The marker is always removed. The state attribute is added to the controls
//! whose `value` equals the marker and left alone everywhere else.

use stitch_dom::Document;

use crate::markup::{CHECKED_MARKER, SELECTED_MARKER};

struct FormDefault {
    tag: &'static str,
    marker: &'static str,
    state: &'static str,
}

const FORM_DEFAULTS: &[FormDefault] = &[
    FormDefault {
        tag: "input",
        marker: CHECKED_MARKER,
        state: "checked",
    },
    FormDefault {
        tag: "option",
        marker: SELECTED_MARKER,
        state: "selected",
    },
];

/// Converts `pogon-checked` and `pogon-selected` markers into `checked` and
/// `selected` attributes.
pub fn normalize_form_defaults(doc: &Document) {
    for rule in FORM_DEFAULTS {
        for element in doc.elements_by_tag(rule.tag) {
            let Some(expected) = element.remove_attr(rule.marker) else {
                continue;
            };
            if element.attr("value").as_deref() == Some(expected.as_str()) {
                element.set_attr(rule.state, rule.state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALUES: [&str; 4] = ["one", "two", "three", "four"];

    fn inputs(marker: &str) -> String {
        VALUES
            .iter()
            .map(|v| format!("<input type=\"radio\" name=\"n\" value=\"{v}\" pogon-checked=\"{marker}\">"))
            .collect()
    }

    #[test]
    fn test_checks_matching_input_only() {
        let doc = Document::parse(&inputs("three"));
        normalize_form_defaults(&doc);

        let tags = doc.elements_by_tag("input");
        assert_eq!(tags.len(), 4);
        for input in tags {
            assert!(!input.has_attr(CHECKED_MARKER));
            let checked = input.attr("checked");
            if input.attr("value").as_deref() == Some("three") {
                assert_eq!(checked.as_deref(), Some("checked"));
            } else {
                assert_eq!(checked, None);
            }
        }
    }

    #[test]
    fn test_selects_matching_option_only() {
        let options: String = VALUES
            .iter()
            .map(|v| format!("<option value=\"{v}\" pogon-selected=\"three\">{v}</option>"))
            .collect();
        let doc = Document::parse(&format!("<select name=\"s\">{options}</select>"));
        normalize_form_defaults(&doc);

        let tags = doc.elements_by_tag("option");
        assert_eq!(tags.len(), 4);
        for option in tags {
            assert!(!option.has_attr(SELECTED_MARKER));
            let selected = option.attr("selected");
            if option.attr("value").as_deref() == Some("three") {
                assert_eq!(selected.as_deref(), Some("selected"));
            } else {
                assert_eq!(selected, None);
            }
        }
    }

    #[test]
    fn test_existing_state_is_not_cleared() {
        let doc = Document::parse("<input value=\"a\" checked pogon-checked=\"b\">");
        normalize_form_defaults(&doc);
        let input = doc.elements_by_tag("input").remove(0);
        assert!(input.has_attr("checked"));
        assert!(!input.has_attr(CHECKED_MARKER));
    }

    #[test]
    fn test_marker_on_other_elements_is_ignored() {
        let doc = Document::parse("<textarea pogon-checked=\"x\">x</textarea>");
        normalize_form_defaults(&doc);
        let textarea = doc.elements_by_tag("textarea").remove(0);
        assert_eq!(textarea.attr(CHECKED_MARKER).as_deref(), Some("x"));
    }

    #[test]
    fn test_input_without_value_is_never_checked() {
        let doc = Document::parse("<input type=\"checkbox\" pogon-checked=\"on\">");
        normalize_form_defaults(&doc);
        let input = doc.elements_by_tag("input").remove(0);
        assert_eq!(input.attr("checked"), None);
        assert!(!input.has_attr(CHECKED_MARKER));
    }

    proptest! {
        #[test]
        fn prop_exactly_matching_inputs_checked(
            values in prop::collection::vec("[a-z]{1,4}", 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let marker = pick.get(&values).clone();
            let markup: String = values
                .iter()
                .map(|v| format!("<input value=\"{v}\" pogon-checked=\"{marker}\">"))
                .collect();
            let doc = Document::parse(&markup);
            normalize_form_defaults(&doc);

            let tags = doc.elements_by_tag("input");
            prop_assert_eq!(tags.len(), values.len());
            for (input, value) in tags.iter().zip(&values) {
                prop_assert!(!input.has_attr(CHECKED_MARKER));
                prop_assert_eq!(input.has_attr("checked"), *value == marker);
            }
        }
    }
}
