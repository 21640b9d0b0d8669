//! Shared page shell: head, navigation bar and build footer

use crate::table::escape_html;

/// Pages that share the layout; decides the title and the highlighted nav link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Upload,
    Analyse,
    About,
    Error,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Upload => "Upload",
            Page::Analyse => "Analyse",
            Page::About => "About",
            Page::Error => "Error",
        }
    }
}

const NAV_LINKS: [(Page, &str); 4] = [
    (Page::Home, "/"),
    (Page::Upload, "/upload"),
    (Page::Analyse, "/analyse"),
    (Page::About, "/about"),
];

fn nav(active: Page) -> String {
    NAV_LINKS
        .iter()
        .map(|(target, href)| {
            let class = if *target == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, href, class, target.title())
        })
        .collect::<Vec<_>>()
        .join("\n            ")
}

/// Wrap `body` (already escaped HTML) in the full page
pub fn page(active: Page, body: &str) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let build_profile = env!("BUILD_PROFILE");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>csvscope - {title}</title>
    <link rel="stylesheet" href="/static/csvscope.css">
</head>
<body>
    <header>
        <span class="brand">csvscope</span>
        <nav>
            {nav}
        </nav>
    </header>
    <main class="container">
{body}
    </main>
    <footer>
        <span class="build-info">v{version} ({git_hash}) &middot; {build_profile} &middot; built {build_timestamp}</span>
    </footer>
</body>
</html>
"#,
        title = active.title(),
        nav = nav(active),
        body = body,
        version = version,
        git_hash = git_hash,
        build_profile = build_profile,
        build_timestamp = build_timestamp,
    )
}

/// Alert paragraph for an in-band message, or nothing
pub fn message_html(message: Option<&str>) -> String {
    match message {
        Some(text) => format!(
            r#"<p class="alert alert-info">{}</p>
"#,
            escape_html(text)
        ),
        None => String::new(),
    }
}

/// `<ul>` of file names, or nothing for an empty list
pub fn file_list_html(files: &[String]) -> String {
    if files.is_empty() {
        return String::new();
    }
    let items: String = files
        .iter()
        .map(|f| format!("    <li>{}</li>\n", escape_html(f)))
        .collect();
    format!("<ul class=\"file-list\">\n{}</ul>\n", items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_marks_active_link() {
        let html = page(Page::Analyse, "<p>hi</p>");
        assert!(html.contains(r#"<a href="/analyse" class="active">Analyse</a>"#));
        assert!(html.contains(r#"<a href="/upload">Upload</a>"#));
        assert!(html.contains("<title>csvscope - Analyse</title>"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn test_error_page_has_no_active_link() {
        let html = page(Page::Error, "");
        assert!(!html.contains("class=\"active\""));
    }

    #[test]
    fn test_footer_carries_build_stamp() {
        let html = page(Page::Home, "");
        assert!(!env!("GIT_HASH").is_empty());
        assert!(html.contains(&format!("({})", env!("GIT_HASH"))));
        assert!(html.contains(env!("BUILD_PROFILE")));
        assert!(chrono::DateTime::parse_from_rfc3339(env!("BUILD_TIMESTAMP")).is_ok());
    }

    #[test]
    fn test_message_escaped() {
        assert_eq!(message_html(None), "");
        assert!(message_html(Some("a < b")).contains("a &lt; b"));
    }

    #[test]
    fn test_file_list() {
        assert_eq!(file_list_html(&[]), "");
        let html = file_list_html(&["a.csv".to_string(), "<b>.csv".to_string()]);
        assert!(html.contains("<li>a.csv</li>"));
        assert!(html.contains("<li>&lt;b&gt;.csv</li>"));
    }
}
