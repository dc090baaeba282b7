//! Rendering representation maps into provider configuration text

use crate::representation::{Field, RepType, RepresentationMap, RepresentationMode, Value};
use std::fmt::Write;

/// Renders `resource "<type>" "<name>" { ... }`
pub fn generate_resource_from_representation_map(
    resource_type: &str,
    resource_name: &str,
    rep_type: RepType,
    mode: RepresentationMode,
    representations: &RepresentationMap,
) -> String {
    generate_block("resource", resource_type, resource_name, rep_type, mode, representations)
}

/// Renders `data "<type>" "<name>" { ... }`
pub fn generate_data_source_from_representation_map(
    data_source_type: &str,
    data_source_name: &str,
    rep_type: RepType,
    mode: RepresentationMode,
    representations: &RepresentationMap,
) -> String {
    generate_block("data", data_source_type, data_source_name, rep_type, mode, representations)
}

/// Renders a `variable "<name>" { default = "<value>" }` declaration
pub fn variable_str(name: &str, value: &str) -> String {
    format!("variable \"{}\" {{ default = {} }}\n", name, quote(value))
}

fn generate_block(
    keyword: &str,
    type_name: &str,
    name: &str,
    rep_type: RepType,
    mode: RepresentationMode,
    representations: &RepresentationMap,
) -> String {
    let mut out = format!("\n{} \"{}\" \"{}\" {{\n", keyword, type_name, name);
    render_body(&mut out, representations, rep_type, mode, 1);
    out.push_str("}\n");
    out
}

fn is_selected(field_type: RepType, selection: RepType) -> bool {
    selection == RepType::Optional || field_type == RepType::Required
}

fn render_body(
    out: &mut String,
    representations: &RepresentationMap,
    selection: RepType,
    mode: RepresentationMode,
    depth: usize,
) {
    let indent = "\t".repeat(depth);
    for (name, field) in representations.iter() {
        match field {
            Field::Leaf(rep) => {
                if is_selected(rep.rep_type, selection) {
                    let _ = writeln!(out, "{}{} = {}", indent, name, render_value(rep.value(mode)));
                }
            }
            Field::Group(group) => {
                if is_selected(group.rep_type, selection) {
                    render_nested(out, name, &group.group, selection, mode, depth);
                }
            }
            Field::Groups(groups) => {
                for group in groups {
                    if is_selected(group.rep_type, selection) {
                        render_nested(out, name, &group.group, selection, mode, depth);
                    }
                }
            }
        }
    }
}

fn render_nested(
    out: &mut String,
    name: &str,
    group: &RepresentationMap,
    selection: RepType,
    mode: RepresentationMode,
    depth: usize,
) {
    let indent = "\t".repeat(depth);
    let _ = writeln!(out, "{}{} {{", indent, name);
    render_body(out, group, selection, mode, depth + 1);
    let _ = writeln!(out, "{}}}", indent);
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Str(s) => quote(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::List(items) => format!(
            "[{}]",
            items.iter().map(|s| quote(s)).collect::<Vec<_>>().join(", ")
        ),
        Value::Map(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(k, v)| format!("{} = {}", quote(k), quote(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Raw(expr) => expr.clone(),
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Quotes a string literal. Characters inside `${ ... }` interpolations are
/// left alone so nested expressions keep their own quoting; braces inside
/// string literals of those expressions do not count towards nesting.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut depth = 0usize;
    let mut in_literal = false;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if in_literal {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_literal = false,
                _ => {}
            }
            continue;
        }
        if c == '$' && chars.peek() == Some(&'{') {
            depth += 1;
            out.push(c);
            if let Some(brace) = chars.next() {
                out.push(brace);
            }
            continue;
        }
        if depth > 0 {
            match c {
                '"' => in_literal = true,
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::{Representation, RepresentationGroup};

    fn filter() -> RepresentationMap {
        RepresentationMap::new()
            .required("name", "id")
            .required("values", Value::list(["${oci_core_vcn.test_vcn.id}"]))
    }

    fn vcn() -> RepresentationMap {
        RepresentationMap::new()
            .required("cidr_block", "10.0.0.0/16")
            .required("compartment_id", "${var.compartment_id}")
            .optional_with_update("display_name", "displayName", "displayName2")
            .optional("dns_label", "dnslabel")
            .optional_with_update(
                "freeform_tags",
                Value::map([("Department", "Finance")]),
                Value::map([("Department", "Accounting")]),
            )
            .optional("is_ipv6enabled", false)
    }

    #[test]
    fn required_only_skips_optional_fields() {
        let config = generate_resource_from_representation_map(
            "oci_core_vcn",
            "test_vcn",
            RepType::Required,
            RepresentationMode::Create,
            &vcn(),
        );
        assert_eq!(
            config,
            "\nresource \"oci_core_vcn\" \"test_vcn\" {\n\tcidr_block = \"10.0.0.0/16\"\n\tcompartment_id = \"${var.compartment_id}\"\n}\n"
        );
    }

    #[test]
    fn optional_update_uses_update_values() {
        let config = generate_resource_from_representation_map(
            "oci_core_vcn",
            "test_vcn",
            RepType::Optional,
            RepresentationMode::Update,
            &vcn(),
        );
        assert!(config.contains("\tdisplay_name = \"displayName2\"\n"));
        assert!(config.contains("\tdns_label = \"dnslabel\"\n"));
        assert!(config.contains("\tfreeform_tags = {\"Department\" = \"Accounting\"}\n"));
        assert!(config.contains("\tis_ipv6enabled = false\n"));
    }

    #[test]
    fn fields_render_in_lexical_order() {
        let config = generate_resource_from_representation_map(
            "oci_core_vcn",
            "test_vcn",
            RepType::Optional,
            RepresentationMode::Create,
            &vcn(),
        );
        let cidr = config.find("cidr_block").unwrap();
        let compartment = config.find("compartment_id").unwrap();
        let display = config.find("display_name").unwrap();
        assert!(cidr < compartment && compartment < display);
    }

    #[test]
    fn data_source_renders_nested_filter_block() {
        let rep = RepresentationMap::new()
            .required("compartment_id", "${var.compartment_id}")
            .optional("state", "AVAILABLE")
            .group("filter", RepresentationGroup::required(filter()));
        let config = generate_data_source_from_representation_map(
            "oci_core_vcns",
            "test_vcns",
            RepType::Required,
            RepresentationMode::Create,
            &rep,
        );
        assert_eq!(
            config,
            "\ndata \"oci_core_vcns\" \"test_vcns\" {\n\tcompartment_id = \"${var.compartment_id}\"\n\tfilter {\n\t\tname = \"id\"\n\t\tvalues = [\"${oci_core_vcn.test_vcn.id}\"]\n\t}\n}\n"
        );
    }

    #[test]
    fn optional_group_is_dropped_in_required_selection() {
        let rep = RepresentationMap::new()
            .required("name", "bucket")
            .group(
                "retention_rules",
                RepresentationGroup::optional(
                    RepresentationMap::new().required("display_name", "rule"),
                ),
            );
        let required = generate_resource_from_representation_map(
            "oci_objectstorage_bucket",
            "test_bucket",
            RepType::Required,
            RepresentationMode::Create,
            &rep,
        );
        assert!(!required.contains("retention_rules"));

        let optional = generate_resource_from_representation_map(
            "oci_objectstorage_bucket",
            "test_bucket",
            RepType::Optional,
            RepresentationMode::Create,
            &rep,
        );
        assert!(optional.contains("\tretention_rules {\n\t\tdisplay_name = \"rule\"\n\t}\n"));
    }

    #[test]
    fn repeated_groups_render_one_block_each() {
        let rule = |dest: &str| {
            RepresentationGroup::optional(RepresentationMap::new().required("destination", dest))
        };
        let rep = RepresentationMap::new()
            .groups("route_rules", vec![rule("0.0.0.0/0"), rule("10.0.0.0/8")]);
        let config = generate_resource_from_representation_map(
            "oci_core_route_table",
            "test_route_table",
            RepType::Optional,
            RepresentationMode::Create,
            &rep,
        );
        assert_eq!(config.matches("route_rules {").count(), 2);
        assert!(config.find("0.0.0.0/0").unwrap() < config.find("10.0.0.0/8").unwrap());
    }

    #[test]
    fn values_render_by_kind() {
        assert_eq!(render_value(&Value::from(2)), "2");
        assert_eq!(render_value(&Value::from(0.5)), "0.5");
        assert_eq!(render_value(&Value::from(true)), "true");
        assert_eq!(render_value(&Value::raw("var.region")), "var.region");
        assert_eq!(render_value(&Value::list(["a", "b"])), "[\"a\", \"b\"]");
    }

    #[test]
    fn quoting_escapes_outside_interpolations_only() {
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(
            quote("${map(\"${oci_identity_tag.tag1.name}\", \"value\")}"),
            "\"${map(\"${oci_identity_tag.tag1.name}\", \"value\")}\""
        );
    }

    #[test]
    fn quoting_ignores_braces_inside_nested_literals() {
        assert_eq!(
            quote("${format(\"%s}\", var.x)}"),
            "\"${format(\"%s}\", var.x)}\""
        );
        assert_eq!(
            quote("${format(\"\\\"}\", var.x)} \"tail\""),
            "\"${format(\"\\\"}\", var.x)} \\\"tail\\\"\""
        );
    }

    #[test]
    fn update_mode_on_field_without_update_uses_create() {
        let rep = RepresentationMap::new()
            .field("cidr_block", Representation::required("10.0.0.0/16"));
        let config = generate_resource_from_representation_map(
            "oci_core_vcn",
            "test_vcn",
            RepType::Required,
            RepresentationMode::Update,
            &rep,
        );
        assert!(config.contains("cidr_block = \"10.0.0.0/16\""));
    }

    #[test]
    fn variable_declaration() {
        assert_eq!(
            variable_str("compartment_id", "ocid1.compartment.oc1..aaaa"),
            "variable \"compartment_id\" { default = \"ocid1.compartment.oc1..aaaa\" }\n"
        );
    }
}
