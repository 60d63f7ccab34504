//! RSS 2.0 feed of published writing.

use chrono::{NaiveDate, NaiveTime};
use rss::validation::{Validate, ValidationError};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};

use folio_content::{Entry, Writing};

use crate::site::SiteConfig;

pub const FEED_TITLE: &str = "Kayode's Blog";
pub const FEED_DESCRIPTION: &str = "A blog about anything and everything I find interesting.";

/// Render the feed. `writing` is expected newest first.
pub fn build_feed(
    site: &SiteConfig,
    writing: &[&Entry<Writing>],
) -> Result<String, ValidationError> {
    let items: Vec<rss::Item> = writing
        .iter()
        .map(|entry| {
            let link = site.absolute(&format!("/writing/{}", entry.slug));
            ItemBuilder::default()
                .title(entry.data.title.clone())
                .link(Some(link.clone()))
                .guid(GuidBuilder::default().permalink(true).value(link).build())
                .description(entry.data.description.clone())
                .pub_date(rfc2822(entry.data.publish_date))
                .build()
        })
        .collect();

    let channel = ChannelBuilder::default()
        .title(FEED_TITLE)
        .link(site.url.clone())
        .description(FEED_DESCRIPTION)
        .language(site.language.clone())
        .items(items)
        .build();

    channel.validate()?;

    Ok(channel.to_string())
}

fn rfc2822(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::Collection;
    use std::path::PathBuf;

    fn post(slug: &str, date: (i32, u32, u32)) -> Entry<Writing> {
        Entry {
            slug: slug.to_string(),
            collection: Collection::Writing,
            data: Writing {
                title: format!("Post {slug}"),
                description: format!("About {slug}"),
                publish_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                updated_date: None,
                tags: None,
                draft: false,
            },
            body: String::new(),
            path: PathBuf::from(format!("{slug}.md")),
        }
    }

    #[test]
    fn feed_carries_channel_and_items() {
        let june = post("june", (2024, 6, 1));
        let january = post("january", (2024, 1, 1));
        let site = SiteConfig::default();

        let xml = build_feed(&site, &[&june, &january]).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();

        assert_eq!(channel.title(), "Kayode's Blog");
        assert_eq!(
            channel.description(),
            "A blog about anything and everything I find interesting."
        );
        let links: Vec<_> = channel.items().iter().filter_map(|i| i.link()).collect();
        assert_eq!(
            links,
            vec![
                "https://kayode0x.com/writing/june",
                "https://kayode0x.com/writing/january"
            ]
        );
        assert_eq!(
            channel.items()[0].pub_date(),
            Some("Sat, 1 Jun 2024 00:00:00 +0000")
        );
        assert_eq!(channel.items()[1].description(), Some("About january"));
    }

    #[test]
    fn rejects_relative_site_url() {
        let site = SiteConfig {
            url: "not a url".to_string(),
            ..SiteConfig::default()
        };

        assert!(build_feed(&site, &[&post("june", (2024, 6, 1))]).is_err());
    }

    #[test]
    fn empty_feed_is_valid() {
        let xml = build_feed(&SiteConfig::default(), &[]).unwrap();
        assert!(xml.contains("<channel>"));
    }
}
