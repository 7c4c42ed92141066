// ABOUTME: Integration tests for document loading, XML handling and the HtmlPage wrapper.
// ABOUTME: Tests byte decoding, XML serialization rules and page-level helpers end to end.

use pagedom::{Document, DocumentBuilder, DocumentKind, HtmlPage, ParseOptions};
use pretty_assertions::assert_eq;

mod loading_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bytes_uses_meta_charset() {
        let mut bytes = b"<html><head><meta charset=\"iso-8859-1\"></head><body><p>caf".to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(b"</p></body></html>");
        let doc = DocumentBuilder::new().parse_bytes(&bytes, None).unwrap();
        assert_eq!(doc.select("p").unwrap().text(), "café");
    }

    #[test]
    fn test_parse_bytes_explicit_charset() {
        let bytes: &[u8] = &[b'<', b'a', b'>', 0xe9, b'<', b'/', b'a', b'>'];
        let doc = DocumentBuilder::new()
            .kind(DocumentKind::Xml)
            .parse_bytes(bytes, Some("latin1"))
            .unwrap();
        assert_eq!(doc.select("a").unwrap().text(), "é");
    }

    #[test]
    fn test_whitespace_policy_applies_when_parsing() {
        let markup = "<ul>\n  <li>a</li>\n</ul>";
        let doc = DocumentBuilder::new()
            .preserve_whitespace(false)
            .parse(markup)
            .unwrap();
        assert_eq!(doc.select("ul").unwrap().to_string(), "<ul><li>a</li></ul>");

        let doc = DocumentBuilder::new()
            .preserve_whitespace(false)
            .parse_bytes(markup.as_bytes(), Some("utf-8"))
            .unwrap();
        assert_eq!(doc.select("ul").unwrap().to_string(), "<ul><li>a</li></ul>");

        let kept = DocumentBuilder::new().parse(markup).unwrap();
        assert_eq!(kept.select("ul").unwrap().to_string(), markup);
    }

    #[test]
    fn test_builder_options_round_trip_through_serde() {
        let opts: ParseOptions = serde_json::from_str(r#"{"kind":"xml"}"#).unwrap();
        let doc = DocumentBuilder::new().options(opts).build();
        assert_eq!(doc.kind(), DocumentKind::Xml);
        assert!(doc.options().preserve_whitespace);
    }
}

mod xml_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_xml_edit_and_render() {
        let doc = Document::parse_xml(
            r#"<?xml version="1.0"?><catalog><book id="b1"><title>A</title></book></catalog>"#,
        )
        .unwrap();
        let books = doc.select("book").unwrap();
        books.set_attr("lang", "en").append("<note/>").unwrap();
        books.after(r#"<book id="b2"/>"#).unwrap();
        assert_eq!(
            doc.html(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<catalog><book id=\"b1\" lang=\"en\"><title>A</title><note/></book><book id=\"b2\"/></catalog>"
        );
    }

    #[test]
    fn test_xml_preserves_name_case() {
        let doc = Document::parse_xml("<Root><camelCase attrName=\"v\"/></Root>").unwrap();
        let el = doc.select("camelCase").unwrap();
        assert_eq!(el.attr("attrName").as_deref(), Some("v"));
        assert!(doc.select("camelcase").unwrap().is_empty());
    }

    #[test]
    fn test_xml_parse_error() {
        let err = Document::parse_xml("<a><b></a>").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().starts_with("pagedom: parse_xml: parse error"));
    }
}

mod page_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_helpers_compose() {
        let page = HtmlPage::parse(
            "<html><head><title>Old</title></head><body><div id=\"content\"></div></body></html>",
        );
        page.set_title("New title")
            .set_meta("author", "me")
            .set_base_href("/root/");
        page.set_html_by_id("content", "<p>hello</p>").unwrap();
        page.filter("p").unwrap().add_class("lead");

        assert_eq!(page.title().as_deref(), Some("New title"));
        assert_eq!(page.meta("author").as_deref(), Some("me"));
        assert_eq!(
            page.render(),
            r#"<html><head><base href="/root/"><title>New title</title><meta name="author" content="me"></head><body><div id="content"><p class="lead">hello</p></div></body></html>"#
        );
    }

    #[test]
    fn test_body_content_from_another_page() {
        let a = HtmlPage::parse("<p>from a</p>");
        let b = HtmlPage::new();
        let body = pagedom::Selection::from(b.body());
        body.append(&a.filter("p").unwrap()).unwrap();
        assert_eq!(b.body().inner_html(), "<p>from a</p>");
        assert_eq!(a.body().inner_html(), "<p>from a</p>");
    }
}
