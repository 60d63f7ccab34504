//! Site identity, navigation and static page metadata.

use serde::Serialize;

/// Site identity, read from the environment with fallbacks.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SiteConfig {
    /// Production URL without trailing slash
    pub url: String,
    pub language: String,
    pub title: String,
    pub description: String,
    pub author: Author,
    pub social: Social,
    pub nav: Vec<NavLink>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Author {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    /// Empty hides it
    pub location: String,
}

/// Social profile URLs. Empty entries are hidden.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Social {
    pub github: String,
    pub linkedin: String,
    pub instagram: String,
    pub twitter: String,
}

impl Social {
    /// Configured profiles as `(label, url)`, in display order.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("GitHub", self.github.as_str()),
            ("LinkedIn", self.linkedin.as_str()),
            ("Instagram", self.instagram.as_str()),
            ("Twitter", self.twitter.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl SiteConfig {
    /// Read from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());

        Self {
            url: get("SITE_URL", "https://kayode0x.com")
                .trim_end_matches('/')
                .to_string(),
            language: get("SITE_LANGUAGE", "en"),
            title: get("SITE_TITLE", "Kayode O. - Software Engineer"),
            description: get(
                "SITE_DESCRIPTION",
                "Software engineer focused on backend development, mobile apps, and automotive technology.",
            ),
            author: Author {
                name: get("SITE_AUTHOR_NAME", "Kayode O."),
                title: get("SITE_AUTHOR_TITLE", "Software Engineer"),
                bio: get(
                    "SITE_AUTHOR_BIO",
                    "Software Engineer specializing in building scalable backend systems and mobile applications. I build what I wish existed, including car projects + lessons learned along the way.",
                ),
                email: get("SITE_AUTHOR_EMAIL", "hello@kayode0x.com"),
                location: get("SITE_AUTHOR_LOCATION", ""),
            },
            social: Social {
                github: get("SOCIAL_GITHUB", ""),
                linkedin: get("SOCIAL_LINKEDIN", ""),
                instagram: get("SOCIAL_INSTAGRAM", ""),
                twitter: get("SOCIAL_TWITTER", ""),
            },
            nav: [
                ("Projects", "/projects"),
                ("Writing", "/writing"),
                ("Rants", "/rants"),
                ("Notes", "/notes"),
                ("About", "/about"),
                ("Contact", "/contact"),
            ]
            .into_iter()
            .map(|(label, href)| NavLink {
                label: label.to_string(),
                href: href.to_string(),
            })
            .collect(),
        }
    }

    /// Absolute URL for a site path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Metadata for a static page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PageMeta {
    pub title: &'static str,
    pub description: &'static str,
    /// Displayed as the h1; defaults to the title
    pub heading: Option<&'static str>,
    pub intro: Option<&'static str>,
}

impl PageMeta {
    pub fn heading(&self) -> &'static str {
        self.heading.unwrap_or(self.title)
    }
}

/// The static pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Home,
    Projects,
    Writing,
    Rants,
    Notes,
    Uses,
    About,
    Contact,
}

impl StaticPage {
    pub fn meta(self) -> PageMeta {
        match self {
            StaticPage::Home => PageMeta {
                title: "Home",
                description: "I'm a software engineer who loves building things I want. From backend systems to mobile apps, and car projects. Big on shipping ideas, tweaking cars, and watching / playing football (soccer).",
                heading: None,
                intro: None,
            },
            StaticPage::Projects => PageMeta {
                title: "Projects",
                description: "Things I've built around software, car projects, and experiments, along with the problems, decisions, and results.",
                heading: Some("Projects"),
                intro: Some("A collection of things I've worked on, from software systems to car projects. I break down the problems, constraints, decisions, and outcomes. Basically how ideas turn into real builds."),
            },
            StaticPage::Writing => PageMeta {
                title: "Writing",
                description: "Longer-form thoughts and lessons from building software, working on cars, and figuring things out.",
                heading: Some("Writing"),
                intro: Some("Deeper write-ups from things I'm building or learning on software architecture, product ideas, car projects, and anything else that feels worth documenting."),
            },
            StaticPage::Rants => PageMeta {
                title: "Rants",
                description: "Unfiltered opinions on tech, cars, building products, and whatever else is on my mind.",
                heading: Some("Rants"),
                intro: Some("This is where I'm more raw. Thoughts on engineering, cars, product building, and random industry takes mostly based on my own experiences and perspective."),
            },
            StaticPage::Notes => PageMeta {
                title: "Notes",
                description: "Short thoughts, ideas, and observations from day-to-day life.",
                heading: Some("Notes"),
                intro: Some("Quick notes and lightweight thoughts on software, cars, and building things. Stuff that doesn't need a full article but still feels useful or interesting."),
            },
            StaticPage::Uses => PageMeta {
                title: "Uses",
                description: "The tools, tech, and setup I use, both for development and hands-on projects.",
                heading: Some("Uses"),
                intro: Some("A rundown of the tools, software, hardware, and environment I use day to day, from coding to car work. I keep this updated as my workflow changes."),
            },
            StaticPage::About => PageMeta {
                title: "About",
                description: "Who I am, what I build, and what I care about.",
                heading: Some("About"),
                intro: None,
            },
            StaticPage::Contact => PageMeta {
                title: "Contact",
                description: "Reach out if you want to collaborate, talk tech, or build something together.",
                heading: Some("Let's Talk"),
                intro: None,
            },
        }
    }

    /// Site path, with a trailing slash.
    pub fn path(self) -> &'static str {
        match self {
            StaticPage::Home => "/",
            StaticPage::Projects => "/projects/",
            StaticPage::Writing => "/writing/",
            StaticPage::Rants => "/rants/",
            StaticPage::Notes => "/notes/",
            StaticPage::Uses => "/uses/",
            StaticPage::About => "/about/",
            StaticPage::Contact => "/contact/",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_when_unset() {
        let site = SiteConfig::default();

        assert_eq!(site.url, "https://kayode0x.com");
        assert_eq!(site.language, "en");
        assert_eq!(site.nav.len(), 6);
        assert_eq!(site.nav[0].href, "/projects");
        assert!(site.social.links().is_empty());
    }

    #[test]
    fn environment_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("SITE_URL", "https://example.dev///"),
            ("SOCIAL_GITHUB", "https://github.com/someone"),
        ]
        .into_iter()
        .collect();

        let site = SiteConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(site.url, "https://example.dev");
        assert_eq!(site.absolute("/writing/a/"), "https://example.dev/writing/a/");
        assert_eq!(
            site.social.links(),
            vec![("GitHub", "https://github.com/someone")]
        );
    }

    #[test]
    fn heading_falls_back_to_title() {
        assert_eq!(StaticPage::Home.meta().heading(), "Home");
        assert_eq!(StaticPage::Contact.meta().heading(), "Let's Talk");
    }
}
