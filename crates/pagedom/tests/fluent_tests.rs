// ABOUTME: Integration tests for the fluent selection API.
// ABOUTME: Tests fan-out insertion, cross-document adoption, round trips and the class/style/wrap properties.

use pagedom::{Document, DocumentBuilder, Selection};
use pretty_assertions::assert_eq;

fn body_html(doc: &Document) -> String {
    doc.select_first("body").unwrap().unwrap().inner_html()
}

mod fan_out_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_after_many_destinations_yields_independent_copies() {
        let doc = Document::parse_html(
            r#"<span class="src">s</span><div id="d1"></div><div id="d2"></div><div id="d3"></div>"#,
        );
        let src = doc.select(".src").unwrap();
        let inserted = src.insert_after(&doc.select("div").unwrap()).unwrap();
        assert_eq!(inserted.len(), 3);
        assert_eq!(
            body_html(&doc),
            r#"<div id="d1"></div><span class="src">s</span><div id="d2"></div><span class="src">s</span><div id="d3"></div><span class="src">s</span>"#
        );

        // Mutating one copy leaves the others alone.
        inserted.eq(1).set_text("changed").add_class("mine");
        let texts: Vec<String> = doc
            .select(".src")
            .unwrap()
            .iter()
            .map(|n| n.text())
            .collect();
        assert_eq!(texts, vec!["s", "changed", "s"]);
        assert_eq!(doc.select(".mine").unwrap().len(), 1);
    }

    #[test]
    fn test_foreign_selection_is_imported_per_destination() {
        let src_doc = Document::parse_html("<b>x</b>");
        let dst = Document::parse_html("<p></p><p></p>");
        let b = src_doc.select("b").unwrap();
        dst.select("p").unwrap().append(&b).unwrap();

        assert_eq!(body_html(&dst), "<p><b>x</b></p><p><b>x</b></p>");
        // Source document keeps its node.
        assert_eq!(body_html(&src_doc), "<b>x</b>");
        for node in dst.select("b").unwrap().iter() {
            assert!(node.document().same_document(&dst));
        }
    }

    #[test]
    fn test_fragment_selection_moves_into_document() {
        let frag = Selection::from_html("<li>new</li>");
        let doc = Document::parse_html("<ul><li>old</li></ul>");
        frag.append_to(&doc.select("ul").unwrap()).unwrap();
        assert_eq!(body_html(&doc), "<ul><li>old</li><li>new</li></ul>");
    }

    #[test]
    fn test_import_drops_whitespace_when_destination_does() {
        let dst = DocumentBuilder::new()
            .preserve_whitespace(false)
            .parse("<div></div>")
            .unwrap();
        dst.select("div")
            .unwrap()
            .append("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>")
            .unwrap();
        assert_eq!(body_html(&dst), "<div><ul><li>a</li><li>b</li></ul></div>");
    }

    #[test]
    fn test_whitespace_only_content_is_dropped_when_destination_does() {
        let dst = DocumentBuilder::new()
            .preserve_whitespace(false)
            .parse("<div><p>a</p></div>")
            .unwrap();
        let div = dst.select("div").unwrap();
        div.append("  ").unwrap();
        div.append(&Selection::from_html("<b>x</b> \n")).unwrap();
        assert_eq!(body_html(&dst), "<div><p>a</p><b>x</b></div>");
        assert_eq!(div.get(0).unwrap().children().len(), 2);
    }

    #[test]
    fn test_table_rows_append_into_tbody() {
        let doc = Document::parse_html("<table><tbody><tr><td>1</td></tr></tbody></table>");
        let tbody = doc.select("tbody").unwrap();
        tbody.append("<tr><td>2</td></tr>").unwrap();
        doc.select("tr").unwrap().append("<td>x</td>").unwrap();
        assert_eq!(
            body_html(&doc),
            "<table><tbody><tr><td>1</td><td>x</td></tr><tr><td>2</td><td>x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_mixed_documents_in_one_selection() {
        let a = Document::parse_html("<p>a</p>");
        let b = Document::parse_html("<p>b</p>");
        let both = a.select("p").unwrap().add(&b.select("p").unwrap());
        both.append("<i>!</i>").unwrap();
        assert_eq!(body_html(&a), "<p>a<i>!</i></p>");
        assert_eq!(body_html(&b), "<p>b<i>!</i></p>");
    }
}

mod round_trip_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_round_trips_through_markup() {
        let doc = Document::parse_html(
            r#"<div id="x" data-a="1" class="c d"><p>one &amp; <b title="q&quot;">two</b></p><br><!--c--></div>"#,
        );
        let sel = doc.select("#x").unwrap();
        let markup = sel.to_string();

        let reparsed = Selection::from_html(&markup);
        assert_eq!(reparsed.to_string(), markup);
        let node = reparsed.get(0).unwrap();
        assert_eq!(node.tag_name().as_deref(), Some("div"));
        let names: Vec<String> = node.attrs().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["id", "data-a", "class"]);
    }

    #[test]
    fn test_xml_selection_round_trips() {
        let doc = Document::parse_xml(r#"<feed><entry n="1"><t>a &lt; b</t><e/></entry></feed>"#)
            .unwrap();
        let markup = doc.select("entry").unwrap().to_string();
        let reparsed = Selection::from_xml(&markup).unwrap();
        assert_eq!(reparsed.to_string(), markup);
        assert_eq!(markup, r#"<entry n="1"><t>a &lt; b</t><e/></entry>"#);
    }
}

mod property_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_toggle_is_its_own_inverse() {
        for original in [
            r#"<p class="a b">x</p>"#,
            "<p>x</p>",
            r#"<p class="z">x</p>"#,
            r#"<p class="">x</p>"#,
            r#"<p class="a  b">x</p>"#,
            r#"<p class="b a z">x</p>"#,
        ] {
            let doc = Document::parse_html(original);
            let p = doc.select("p").unwrap();
            let before = p.to_string();
            p.toggle_class("z");
            assert_ne!(p.to_string(), before);
            p.toggle_class("z");
            assert_eq!(p.to_string(), before);
        }
    }

    #[test]
    fn test_style_set_then_clear_removes_key() {
        let doc = Document::parse_html(r#"<p style="margin: 0">x</p>"#);
        let p = doc.select("p").unwrap();
        p.set_css("color", "red");
        assert_eq!(p.attr("style").as_deref(), Some("margin: 0; color: red;"));
        p.set_css("color", "");
        assert_eq!(p.attr("style").as_deref(), Some("margin: 0;"));
        assert_eq!(p.css("color"), None);
    }

    #[test]
    fn test_wrap_then_unwrap_restores_parent() {
        let doc = Document::parse_html(r#"<div id="host"><b>x</b><i>y</i></div>"#);
        let before = body_html(&doc);
        let b = doc.select("b").unwrap();
        b.wrap("<section><span></span></section>").unwrap();
        assert_eq!(
            body_html(&doc),
            r#"<div id="host"><section><span><b>x</b></span></section><i>y</i></div>"#
        );

        // Single-root wrapper: one unwrap per level.
        for _ in 0..2 {
            let unwrapped = b.unwrap();
            assert!(unwrapped.is_ok(), "unwrap failed: {:?}", unwrapped.err());
        }
        assert_eq!(body_html(&doc), before);
        assert_eq!(b.parent().attr("id").as_deref(), Some("host"));
    }

    #[test]
    fn test_wrap_inner_then_unwrap_inner_restores() {
        let doc = Document::parse_html("<p>a<b>b</b></p>");
        let before = body_html(&doc);
        doc.select("p").unwrap().wrap_inner("<em></em>").unwrap();
        doc.select("em").unwrap().unwrap_inner().unwrap();
        assert_eq!(body_html(&doc), before);
    }
}

mod error_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_parent_for_sibling_insertion_on_root() {
        let doc = Document::parse_html("<p>x</p>");
        let root = Selection::from(doc.root());
        assert!(root.after("<p>y</p>").unwrap_err().is_no_parent());
        assert!(root.replace_with("<p>y</p>").unwrap_err().is_no_parent());
    }

    #[test]
    fn test_no_document_for_empty_selection() {
        let err = Selection::new().document().unwrap_err();
        assert!(err.is_no_document());
        assert_eq!(err.to_string(), "pagedom: document: document not obtainable");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse_html("<p>x</p>");
        assert!(doc.select("p[").unwrap_err().is_selector());
        assert!(doc.select("p").unwrap().find("::").unwrap_err().is_selector());
    }

    #[test]
    fn test_empty_selection_mutators_are_noops() {
        let empty = Selection::new();
        assert!(empty.append("<p></p>").is_ok());
        assert!(empty.wrap_all("<p></p>").is_ok());
        assert!(empty.unwrap().is_ok());
        assert!(empty.insert_after(&empty).unwrap().is_empty());
    }
}
