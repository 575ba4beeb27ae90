// Namespace-aware lookups over a parsed XML document
use roxmltree::{Document, Node, ParsingOptions};

use crate::seat_map_parser::ProcessingError;

// Well-formedness and namespace errors surface here; internal DTD entities are allowed
pub fn parse(xml: &str) -> Result<Document<'_>, ProcessingError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    Document::parse_with_options(xml, options)
        .map_err(|e| ProcessingError::XmlParseError(e.to_string()))
}

pub fn is_named(node: Node<'_, '_>, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

pub fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

// Depth first, document order, the node itself excluded
pub fn find_all<'a, 'input: 'a, 'q>(
    node: Node<'a, 'input>,
    namespace: &'q str,
    name: &'q str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'q
where
    'a: 'q,
{
    node.descendants()
        .skip(1)
        .filter(move |d| is_named(*d, namespace, name))
}

pub fn find<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    find_all(node, namespace, name).next()
}

// Only unprefixed attributes match; `x:Code` never stands in for `Code`
pub fn child_attr<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: &str,
    name: &str,
    attr: &str,
) -> Option<&'a str> {
    find(node, namespace, name).and_then(|child| child.attribute(attr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const NS: &str = "urn:test";

    #[test]
    fn test_parse_resolves_default_and_prefixed_namespaces() {
        let xml = r#"<?xml version="1.0"?>
            <env:Envelope xmlns:env="urn:env">
              <env:Body>
                <Root xmlns="urn:test" Version="2.0">
                  <Leaf Code="A &amp; B"/>
                </Root>
              </env:Body>
            </env:Envelope>"#;

        let doc = parse(xml).unwrap();
        let root = doc.root_element();
        assert!(is_named(root, "urn:env", "Envelope"));

        let inner = find(root, NS, "Root").unwrap();
        assert_eq!(inner.attribute("Version"), Some("2.0"));
        assert_eq!(child_attr(inner, NS, "Leaf", "Code"), Some("A & B"));
    }

    #[test]
    fn test_find_ignores_other_namespaces() {
        let xml = r#"<Root xmlns="urn:test" xmlns:o="urn:other">
              <o:Leaf Code="other"/>
              <Leaf Code="mine"/>
            </Root>"#;

        let doc = parse(xml).unwrap();
        let root = doc.root_element();
        assert_eq!(child_attr(root, NS, "Leaf", "Code"), Some("mine"));
        assert_eq!(child_attr(root, "urn:other", "Leaf", "Code"), Some("other"));
        assert!(find(root, "urn:missing", "Leaf").is_none());
    }

    #[test]
    fn test_descendants_are_in_document_order_and_exclude_self() {
        let xml = r#"<A xmlns="urn:test" id="0">
              <A id="1"><A id="2"/></A>
              <B><A id="3"/></B>
              <A id="4"/>
            </A>"#;

        let doc = parse(xml).unwrap();
        let root = doc.root_element();
        let ids: Vec<_> = find_all(root, NS, "A")
            .filter_map(|e| e.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        let direct: Vec<_> = element_children(root)
            .map(|e| e.tag_name().name())
            .collect();
        assert_eq!(direct, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_empty_element_is_still_found() {
        let doc = parse(r#"<R xmlns="urn:test"><Service></Service></R>"#).unwrap();
        let service = find(doc.root_element(), NS, "Service").unwrap();
        assert_eq!(element_children(service).count(), 0);
    }

    #[test]
    fn test_missing_attribute_is_none() {
        let doc = parse(r#"<R xmlns="urn:test"><Leaf/></R>"#).unwrap();
        let root = doc.root_element();
        assert_eq!(child_attr(root, NS, "Leaf", "Code"), None);
        assert_eq!(child_attr(root, NS, "Nope", "Code"), None);
    }

    #[test]
    fn test_prefixed_attribute_does_not_match_local_name() {
        let xml = r#"<R xmlns="urn:test" xmlns:x="urn:x">
              <Leaf x:Code="prefixed"/>
              <Other x:Code="prefixed" Code="plain"/>
            </R>"#;

        let doc = parse(xml).unwrap();
        let root = doc.root_element();
        assert_eq!(child_attr(root, NS, "Leaf", "Code"), None);
        assert_eq!(child_attr(root, NS, "Other", "Code"), Some("plain"));
    }

    #[test]
    fn test_internal_dtd_entity_is_expanded() {
        let xml = r#"<!DOCTYPE R [<!ENTITY e "v">]><R xmlns="urn:test"><Leaf a="&e;"/></R>"#;

        let doc = parse(xml).unwrap();
        assert_eq!(child_attr(doc.root_element(), NS, "Leaf", "a"), Some("v"));
    }

    #[test]
    fn test_deeply_nested_document() {
        let depth = 60_000;
        let xml = format!(
            r#"<R xmlns="urn:test">{}<Leaf Code="deep"/>{}</R>"#,
            "<x>".repeat(depth),
            "</x>".repeat(depth)
        );

        let doc = parse(&xml).unwrap();
        assert_eq!(child_attr(doc.root_element(), NS, "Leaf", "Code"), Some("deep"));
        drop(doc);
    }

    #[test_case("<a><b></a></b>"; "#1 mismatched tags")]
    #[test_case("<a><b/>"; "#2 unclosed element")]
    #[test_case("   "; "#3 empty document")]
    #[test_case("<a/><b/>"; "#4 two roots")]
    #[test_case("junk<R/>"; "#5 text before root")]
    #[test_case("<R/>junk"; "#6 text after root")]
    #[test_case(r#"<p:R xmlns="urn:a"/>"#; "#7 undeclared prefix")]
    #[test_case("<R>&undefined;</R>"; "#8 undefined entity")]
    #[test_case(r#"<R a="<"/>"#; "#9 raw lt in attribute")]
    fn test_malformed_documents_fail(xml: &str) {
        let result = parse(xml);
        assert!(
            matches!(result, Err(ProcessingError::XmlParseError(_))),
            "{xml:?} should not parse"
        );
    }
}
