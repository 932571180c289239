//! Markup conventions recognized in content, template, and component files.
//!
//! These names are part of the file format: authors write them by hand, so
//! they never change.

/// Placeholder in a page template where the content page body is inserted.
pub const OUTLET_TAG: &str = "pogon_outlet";

/// Placeholder replaced by the component file named in its `name` attribute.
pub const COMPONENT_TAG: &str = "pogon_component";

/// Attribute on `<pogon_component>` naming the component file.
pub const COMPONENT_NAME_ATTR: &str = "name";

/// Attribute on a content page's `<html>` element naming an alternate template.
pub const TEMPLATE_ATTR: &str = "pogon-template";

/// Marker on `<input>`: check the input when its `value` equals the marker.
pub const CHECKED_MARKER: &str = "pogon-checked";

/// Marker on `<option>`: select the option when its `value` equals the marker.
pub const SELECTED_MARKER: &str = "pogon-selected";

/// Template file used when a content page does not name one.
pub const DEFAULT_TEMPLATE: &str = "template.html";
