//! HTML document assembly
//!
//! Converts each generated markdown report into an HTML fragment, wraps it
//! in a per-blade section, and assembles all sections into one fixed
//! UTF-8 document skeleton.

use pulldown_cmark::{html, Parser};

/// Fixed document title.
pub const DOCUMENT_TITLE: &str = "Turbine Inspection Reports";

/// Convert markdown-flavored report text to an HTML fragment.
///
/// Lightweight markup such as `**bold**` becomes the corresponding HTML
/// emphasis tag. The report text is rendered as-is, with no validation
/// of its structure.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Wrap one report fragment in its blade section: a heading carrying the
/// blade identifier followed by the report container.
pub fn render_section(blade_id: &str, report_html: &str) -> String {
    format!("<h2>Report for {}</h2>\n<div>{}</div>", blade_id, report_html)
}

/// Assemble all sections, in iteration order, into the final document.
pub fn render_document(sections: &[String]) -> String {
    format!(
        "<html>\n  <head>\n    <meta charset='UTF-8'>\n    <title>{}</title>\n  </head>\n  <body>\n{}\n  </body>\n</html>",
        DOCUMENT_TITLE,
        sections.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_markdown_becomes_strong_tag() {
        let html = markdown_to_html("The blade shows **severe erosion** near the tip.");
        assert!(html.contains("<strong>severe erosion</strong>"));
    }

    #[test]
    fn test_markdown_headings_and_lists() {
        let html = markdown_to_html("## Findings\n\n- crack at root\n- delamination\n");
        assert!(html.contains("<h2>Findings</h2>"));
        assert!(html.contains("<li>crack at root</li>"));
    }

    #[test]
    fn test_section_wraps_heading_and_container() {
        let section = render_section("Turbine-2_A", "<p>ok</p>");
        assert_eq!(section, "<h2>Report for Turbine-2_A</h2>\n<div><p>ok</p></div>");
    }

    #[test]
    fn test_document_skeleton_and_section_order() {
        let sections = vec![
            render_section("Turbine-2_A", "<p>first</p>"),
            render_section("Turbine-6_A", "<p>second</p>"),
        ];
        let document = render_document(&sections);

        assert!(document.starts_with("<html>"));
        assert!(document.contains("<meta charset='UTF-8'>"));
        assert!(document.contains("<title>Turbine Inspection Reports</title>"));
        assert!(document.trim_end().ends_with("</html>"));

        let first = document.find("Report for Turbine-2_A").unwrap();
        let second = document.find("Report for Turbine-6_A").unwrap();
        assert!(first < second);
        assert_eq!(document.matches("<h2>Report for ").count(), 2);
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        let document = render_document(&[]);
        assert_eq!(document.matches("<h2>").count(), 0);
        assert!(document.contains("<body>"));
    }
}
