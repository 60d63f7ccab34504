//! Sitemap and robots.txt.

use quick_xml::escape::escape;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One sitemap URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    /// Absolute URL
    pub loc: String,
    /// `YYYY-MM-DD`
    pub lastmod: Option<String>,
}

pub fn sitemap_xml(urls: &[UrlEntry]) -> String {
    let mut xml = String::with_capacity(128 + urls.len() * 96);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in urls {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape(entry.loc.as_str()));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str("    <lastmod>");
            xml.push_str(lastmod);
            xml.push_str("</lastmod>\n");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn robots_txt(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {site_url}/sitemap.xml\n")
}
