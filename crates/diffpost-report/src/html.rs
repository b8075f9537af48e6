use diffpost_core::{LineChange, LineKind};
use diffpost_git::blame::UNKNOWN_AUTHOR;

use crate::report::{ChangeReport, SectionBody};

/// Escapes text for inclusion in HTML content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders one line change as colored spans, or `None` for context lines.
pub fn render_line(line: &LineChange) -> Option<String> {
    let author = escape(line.author.as_deref().unwrap_or(UNKNOWN_AUTHOR));
    let text = escape(&line.text);
    match line.kind {
        LineKind::Added => {
            let number = line.new_line.unwrap_or(0);
            Some(format!(
                "<span style=\"color: green;\">\u{1f7e2} Line {number} Added by {author}:</span> \
                 <span style=\"color: black;\">{text}</span>"
            ))
        }
        LineKind::Removed => {
            let number = line.old_line.unwrap_or(0);
            Some(format!(
                "<span style=\"color: red;\">\u{1f534} Line {number} Deleted by {author}:</span> \
                 <span style=\"color: black;\">{text}</span>"
            ))
        }
        LineKind::Context => None,
    }
}

/// Renders the full email body.
pub fn render_body(report: &ChangeReport) -> String {
    let mut body = String::new();
    body.push_str("<html><body>\n");
    body.push_str("<p><b>Pull Request Detected</b></p>\n");
    body.push_str(&format!("<p><b>Title:</b> {}</p>\n", escape(&report.title)));
    body.push_str(&format!(
        "<p><b>Base Branch:</b> {}</p>\n",
        escape(&report.base_branch)
    ));
    body.push_str(&format!(
        "<p><b>Commit Message:</b> {}</p>\n",
        escape(&report.commit_message)
    ));
    match &report.link {
        Some(link) => body.push_str(&format!(
            "<p><b>Link:</b> <a href=\"{0}\">{0}</a></p>\n",
            escape(link)
        )),
        None => body.push_str("<p><b>Link:</b> PR link not found</p>\n"),
    }
    body.push_str("<hr>\n");
    body.push_str("<b>Changed Files:</b><ul>\n");
    for section in &report.sections {
        body.push_str("<li><b>");
        body.push_str(&escape(&section.path));
        body.push_str("</b><br>");
        match &section.body {
            SectionBody::Annotated(lines) => {
                let rendered: Vec<String> = lines.iter().filter_map(render_line).collect();
                body.push_str(&rendered.join("<br>"));
            }
            SectionBody::Failed(message) => body.push_str(&escape(message)),
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ul>\n");
    body.push_str("<p>Best regards,<br>Your CI Bot</p>\n");
    body.push_str(&format!(
        "<p style=\"color: gray;\">Generated at {}</p>\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    body.push_str("</body></html>\n");
    body
}
