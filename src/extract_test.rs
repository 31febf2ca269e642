/// Tests for extract module
#[cfg(test)]
mod tests {
    use crate::error::ParserError;
    use crate::extract::*;
    use regex::Regex;
    use scraper::ElementRef;

    const PAGE: &str = r#"
        <html><body>
          <section id="numerical-index">
            <table><tbody>
              <tr><td><abbr title="Standards Track, Final">SF</abbr></td><td><a href="/pep-0001/">1</a></td></tr>
              <tr><td><abbr title="Informational">I</abbr></td><td><a class="x reference" href="/pep-0002/">2</a></td></tr>
            </tbody></table>
          </section>
          <dl>
            <dt>Author:</dt><dd>Someone</dd>
            <dt>Status:</dt>
            <dd><abbr>Final</abbr></dd>
          </dl>
        </body></html>"#;

    #[test]
    fn test_find_tag_by_id() {
        let doc = parse_document(PAGE);
        let section = find_tag(&doc.root_element(), &Query::tag("section").id("numerical-index")).unwrap();
        assert_eq!(section.tag_name(), "section");
    }

    #[test]
    fn test_find_tag_returns_first_in_document_order() {
        let doc = parse_document(PAGE);
        let abbr = find_tag(&doc.root_element(), &Query::tag("abbr")).unwrap();
        assert_eq!(abbr.text_content(), "SF");
    }

    #[test]
    fn test_find_tag_missing_is_an_error_with_criteria() {
        let doc = parse_document(PAGE);
        let err = find_tag(&doc.root_element(), &Query::tag("section").id("what-s-new")).unwrap_err();
        match err {
            ParserError::TagNotFound { criteria } => {
                assert_eq!(criteria, "<section id=\"what-s-new\">");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_class_filter_matches_one_of_many_classes() {
        let doc = parse_document(PAGE);
        let link = find_tag(&doc.root_element(), &Query::tag("a").class("reference")).unwrap();
        assert_eq!(link.attribute("href"), Some("/pep-0002/"));
    }

    #[test]
    fn test_attr_regex_filter() {
        let doc = parse_document(PAGE);
        let query = Query::tag("a").attr_matches("href", Regex::new(r"^/pep-\d{4}").unwrap());
        let links = doc.root_element().find_all(&query, None);
        assert_eq!(links.len(), 2);

        let strict = Query::tag("a").attr_matches("href", Regex::new(r"^/pep-9\d{3}").unwrap());
        assert!(find_tag(&doc.root_element(), &strict).is_err());
    }

    #[test]
    fn test_custom_filter_and_sibling_lookup() {
        let doc = parse_document(PAGE);
        let dt_query = Query::tag("dt").filter("text == \"Status:\"", |n: &ElementRef| n.text_content() == "Status:");
        let dt = find_tag(&doc.root_element(), &dt_query).unwrap();
        let dd = find_next_sibling_tag(&dt, &Query::tag("dd")).unwrap();
        assert_eq!(dd.text_content(), "Final");
    }

    #[test]
    fn test_custom_filter_description_in_error() {
        let doc = parse_document(PAGE);
        let query = Query::tag("dt").filter("text == \"Type:\"", |n: &ElementRef| n.text_content() == "Type:");
        let err = find_tag(&doc.root_element(), &query).unwrap_err();
        assert!(err.to_string().contains("[text == \"Type:\"]"));
    }

    #[test]
    fn test_find_all_respects_limit() {
        let doc = parse_document(PAGE);
        let rows = doc.root_element().find_all(&Query::tag("tr"), Some(1));
        assert_eq!(rows.len(), 1);
        let rows = doc.root_element().find_all(&Query::tag("tr"), Some(10));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_fn_predicate() {
        let doc = parse_document(PAGE);
        let pred = FnPredicate::new("dd with abbr", |n: &ElementRef| {
            n.tag_name() == "dd" && n.find_first(&Query::tag("abbr")).is_some()
        });
        let dd = find_tag(&doc.root_element(), &pred).unwrap();
        assert_eq!(dd.text_content(), "Final");
    }

    #[test]
    fn test_next_sibling_skips_text_nodes() {
        let doc = parse_document("<ul><li>a</li>\n  text  \n<li>b</li></ul>");
        let first = find_tag(&doc.root_element(), &Query::tag("li")).unwrap();
        let next = first.next_element_sibling().unwrap();
        assert_eq!(next.text_content(), "b");
        assert!(next.next_element_sibling().is_none());
    }

    #[test]
    fn test_resolve_href_against_base() {
        let doc = parse_document(PAGE);
        let base = url::Url::parse("https://peps.python.org/").unwrap();
        let link = find_tag(&doc.root_element(), &Query::tag("a")).unwrap();
        assert_eq!(resolve_href(&link, &base).unwrap().as_str(), "https://peps.python.org/pep-0001/");
    }

    #[test]
    fn test_resolve_href_missing_attribute() {
        let doc = parse_document("<p><a name=\"top\">top</a></p>");
        let base = url::Url::parse("https://docs.python.org/3/").unwrap();
        let link = find_tag(&doc.root_element(), &Query::tag("a").attr("name", "top")).unwrap();
        let err = resolve_href(&link, &base).unwrap_err();
        assert!(matches!(err, ParserError::MissingAttribute { .. }));
        assert_eq!(err.to_string(), "<a> has no href attribute");
    }
}
