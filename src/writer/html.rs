// src/writer/html.rs

//! Hand-emitted HTML pages for the output tree
//!
//! The pages are deliberately plain: installer tools only care about the
//! anchors, and everything else is just enough markup for a human to
//! browse. All dynamic text goes through [`escape`].

use crate::config::Config;
use crate::index::{ReleaseGroup, Snapshot};
use crate::package::Package;
use std::fmt::Write;

/// Escape text for use in HTML bodies and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn page_header(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n",
        escape(title),
    );
}

fn page_footer(out: &mut String, generated: Option<&str>) {
    if let Some(stamp) = generated {
        let _ = write!(out, "<p>Generated on {}.</p>\n", escape(stamp));
    }
    out.push_str("</body>\n</html>\n");
}

/// The landing page: title, optional logo, one row per package with its
/// latest version
pub fn render_root_index(snapshot: &Snapshot, config: &Config, generated: Option<&str>) -> String {
    let mut out = String::new();
    page_header(&mut out, &config.title);

    if let Some(logo) = &config.logo {
        let width = config
            .logo_width
            .map(|w| format!(" width=\"{w}\""))
            .unwrap_or_default();
        let _ = write!(out, "<img src=\"{}\"{} alt=\"\">\n", escape(logo), width);
    }
    let _ = write!(out, "<h1>{}</h1>\n", escape(&config.title));

    out.push_str("<table>\n");
    for group in snapshot.groups() {
        let version = group.latest_version().unwrap_or("");
        let _ = write!(
            out,
            "<tr><td><a href=\"simple/{name}/\">{name}</a></td><td>{version}</td></tr>\n",
            name = escape(group.name()),
            version = escape(version),
        );
    }
    out.push_str("</table>\n");

    page_footer(&mut out, generated);
    out
}

/// The `simple/` listing consumed by installer tools: one anchor per name
pub fn render_simple_index(snapshot: &Snapshot, generated: Option<&str>) -> String {
    let mut out = String::new();
    page_header(&mut out, "Simple index");
    for group in snapshot.groups() {
        let _ = write!(
            out,
            "<a href=\"{name}/\">{name}</a><br>\n",
            name = escape(group.name()),
        );
    }
    page_footer(&mut out, generated);
    out
}

/// The `simple/{name}/` listing: one anchor per file, oldest first, with
/// the hash fragment and a `data-requires-python` attribute when present
pub fn render_package_detail(
    group: &ReleaseGroup,
    config: &Config,
    generated: Option<&str>,
) -> String {
    let mut out = String::new();
    page_header(&mut out, group.name());
    let _ = write!(out, "<h1>{}</h1>\n", escape(group.name()));
    for package in group.files() {
        let requires_python = package
            .requires_python()
            .map(|rp| format!(" data-requires-python=\"{}\"", escape(rp)))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<a href=\"{url}\"{requires_python}>{filename}</a><br>\n",
            url = escape(&package.url(&config.packages_url)),
            filename = escape(package.filename()),
        );
    }
    page_footer(&mut out, generated);
    out
}

/// One changelog page, newest uploads first
///
/// Navigation anchors appear only when there is more than one page, so a
/// single-page changelog contains nothing but distribution links.
pub fn render_changelog_page(
    entries: &[&Package],
    page: usize,
    total_pages: usize,
    config: &Config,
    generated: Option<&str>,
) -> String {
    let mut out = String::new();
    page_header(&mut out, &format!("{} changelog", config.title));
    let _ = write!(out, "<h1>{} changelog</h1>\n", escape(&config.title));

    if total_pages > 1 {
        out.push_str("<p>");
        for n in 1..=total_pages {
            if n == page {
                let _ = write!(out, "{n} ");
            } else {
                let _ = write!(out, "<a href=\"page{n}.html\">{n}</a> ");
            }
        }
        out.push_str("</p>\n");
    }

    out.push_str("<ul>\n");
    for package in entries {
        let mut detail = String::new();
        if let Some(time) = package.upload_time() {
            let _ = write!(detail, " added {}", escape(&time));
        }
        if let Some(user) = package.uploaded_by() {
            let _ = write!(detail, " by {}", escape(user));
        }
        let _ = write!(
            out,
            "<li><a href=\"{url}\">{filename}</a>{detail}</li>\n",
            url = escape(&package.url(&config.packages_url)),
            filename = escape(package.filename()),
        );
    }
    out.push_str("</ul>\n");

    page_footer(&mut out, generated);
    out
}
