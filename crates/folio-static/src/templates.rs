//! Template engine for rendering site pages.

use std::fmt::Write;

use minijinja::{context, AutoEscape, Environment, ErrorKind, Output, State, Value};
use serde::Serialize;

use crate::site::SiteConfig;

/// SEO metadata for one page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Seo {
    /// Full `<title>` text
    pub title: String,
    pub description: String,
    pub canonical: String,
    /// Absolute preview image URL
    pub image: Option<String>,
    /// `website` or `article`
    pub kind: &'static str,
    /// ISO date for articles
    pub published: Option<String>,
    /// Serialized JSON-LD, already safe for a script element
    pub json_ld: Option<String>,
}

/// An item in a listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListItem {
    pub title: String,
    pub url: String,
    /// Human readable date
    pub date: Option<String>,
    pub description: String,
    /// Small labels shown next to the title
    pub meta: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_formatter(html_formatter);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Render `template` with the shared layout values plus `page`.
    pub fn render(
        &self,
        template: &str,
        site: &SiteConfig,
        seo: &Seo,
        current: &str,
        page: Value,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            site => site,
            socials => site.social.links(),
            seo => seo,
            current => current,
            ..page
        })
    }
}

/// Escapes like the default formatter but leaves `/` alone so URLs stay readable.
fn html_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), minijinja::Error> {
    if !matches!(state.auto_escape(), AutoEscape::Html)
        || value.is_safe()
        || value.is_none()
        || value.is_undefined()
    {
        return minijinja::escape_formatter(out, state, value);
    }

    let text = value.to_string();
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    out.write_str(&escaped)
        .map_err(|_| minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output"))
}

const TEMPLATES: [(&str, &str); 9] = [
    ("base.html", BASE_TEMPLATE),
    ("home.html", HOME_TEMPLATE),
    ("listing.html", LISTING_TEMPLATE),
    ("article.html", ARTICLE_TEMPLATE),
    ("project.html", PROJECT_TEMPLATE),
    ("rant.html", RANT_TEMPLATE),
    ("uses.html", USES_TEMPLATE),
    ("about.html", ABOUT_TEMPLATE),
    ("contact.html", CONTACT_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ site.language }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ seo.title }}</title>
  <meta name="description" content="{{ seo.description }}">
  <meta name="author" content="{{ site.author.name }}">
  <link rel="canonical" href="{{ seo.canonical }}">
  <meta property="og:type" content="{{ seo.kind }}">
  <meta property="og:site_name" content="{{ site.title }}">
  <meta property="og:title" content="{{ seo.title }}">
  <meta property="og:description" content="{{ seo.description }}">
  <meta property="og:url" content="{{ seo.canonical }}">
  <meta property="og:locale" content="{{ site.language }}">
  {% if seo.image %}<meta property="og:image" content="{{ seo.image }}">
  <meta property="og:image:width" content="1200">
  <meta property="og:image:height" content="630">
  {% endif %}{% if seo.published %}<meta property="article:published_time" content="{{ seo.published }}">
  {% endif %}<meta name="twitter:card" content="{% if seo.image %}summary_large_image{% else %}summary{% endif %}">
  <meta name="twitter:title" content="{{ seo.title }}">
  <meta name="twitter:description" content="{{ seo.description }}">
  {% if seo.image %}<meta name="twitter:image" content="{{ seo.image }}">
  {% endif %}<link rel="alternate" type="application/rss+xml" title="{{ site.title }}" href="/rss.xml">
  <link rel="icon" type="image/png" href="/favicon-192x192.png">
  <link rel="stylesheet" href="/assets/main.css">
  {% if seo.json_ld %}<script type="application/ld+json">{{ seo.json_ld | safe }}</script>
  {% endif %}
</head>
<body>
  <header class="site-header">
    <a href="/" class="logo">{{ site.author.name }}</a>
    <nav class="nav">
    {% for link in site.nav %}
      <a href="{{ link.href }}/"{% if current is startingwith(link.href ~ "/") %} class="active"{% endif %}>{{ link.label }}</a>
    {% endfor %}
    </nav>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">
    <span>{{ site.author.name }}</span>
    {% for link in socials %}<a href="{{ link[1] }}" rel="me">{{ link[0] }}</a>
    {% endfor %}<a href="/rss.xml">RSS</a>
  </footer>
</body>
</html>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="hero">
  <h1>{{ site.author.name }}</h1>
  <p class="subtitle">{{ site.author.title }}</p>
  <p>{{ meta.description }}</p>
</section>

{% if projects %}
<section>
  <h2>Featured projects</h2>
  <ul class="list">
  {% for item in projects %}
    <li><a href="{{ item.url }}">{{ item.title }}</a>{% for m in item.meta %} <span class="tag">{{ m }}</span>{% endfor %}
      <p>{{ item.description }}</p></li>
  {% endfor %}
  </ul>
</section>
{% endif %}

{% if writing %}
<section>
  <h2>Recent writing</h2>
  <ul class="list">
  {% for item in writing %}
    <li><a href="{{ item.url }}">{{ item.title }}</a> <time>{{ item.date }}</time>
      <p>{{ item.description }}</p></li>
  {% endfor %}
  </ul>
  <a href="/writing/" class="more">All writing</a>
</section>
{% endif %}
{% endblock %}"##;

const LISTING_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="page-header">
  <h1>{{ heading }}</h1>
  {% if meta.intro %}<p class="intro">{{ meta.intro }}</p>{% endif %}
</header>

{% if items %}
<ul class="list">
{% for item in items %}
  <li>
    <a href="{{ item.url }}">{{ item.title }}</a>
    {% if item.date %}<time>{{ item.date }}</time>{% endif %}
    {% for m in item.meta %}<span class="tag">{{ m }}</span>{% endfor %}
    {% if item.description %}<p>{{ item.description }}</p>{% endif %}
  </li>
{% endfor %}
</ul>
{% else %}
<p class="empty">Nothing here yet.</p>
{% endif %}
{% endblock %}"##;

const ARTICLE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="article">
  <header>
    <h1>{{ title }}</h1>
    <p class="dateline"><time>{{ date }}</time>{% if updated %} · Updated <time>{{ updated }}</time>{% endif %}</p>
    {% if tags %}<p class="tags">{% for tag in tags %}<span class="tag">{{ tag }}</span>{% endfor %}</p>{% endif %}
  </header>

  {% if toc | length > 1 %}
  <aside class="toc">
    <h2>On this page</h2>
    <ul>
    {% for entry in toc %}
      <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
    {% endfor %}
    </ul>
  </aside>
  {% endif %}

  <div class="content">
    {{ content | safe }}
  </div>
</article>
{% endblock %}"##;

const PROJECT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="project">
  <header>
    <h1>{{ project.title }}</h1>
    <p class="dateline">{{ project.role }} · {{ project.year }}{% if project.duration %} · {{ project.duration }}{% endif %}{% if project.teamSize %} · Team of {{ project.teamSize }}{% endif %} · <span class="status">{{ project.status }}</span></p>
    <p class="summary">{{ project.outcomeSummary }}</p>
  </header>

  <h2>Overview</h2>
  <p>{{ project.overview }}</p>

  <h2>Problem</h2>
  <p>{{ project.problem }}</p>

  <h2>Constraints</h2>
  <ul>{% for c in project.constraints %}<li>{{ c }}</li>{% endfor %}</ul>

  <h2>Approach</h2>
  <p>{{ project.approach }}</p>

  <h2>Key decisions</h2>
  {% for d in project.keyDecisions %}
  <section class="decision">
    <h3>{{ d.decision }}</h3>
    <p>{{ d.reasoning }}</p>
    {% if d.alternatives %}<p class="alternatives">Considered: {{ d.alternatives | join(", ") }}</p>{% endif %}
  </section>
  {% endfor %}

  <h2>Stack</h2>
  <p class="tags">{% for t in project.techStack %}<span class="tag">{{ t }}</span>{% endfor %}</p>

  <h2>Impact</h2>
  {% if project.impact.metrics %}
  <dl class="metrics">
  {% for m in project.impact.metrics %}<dt>{{ m.label }}</dt><dd>{{ m.value }}</dd>{% endfor %}
  </dl>
  {% endif %}
  <p>{{ project.impact.qualitative }}</p>

  <h2>Learnings</h2>
  <ul>{% for l in project.learnings %}<li>{{ l }}</li>{% endfor %}</ul>

  {% if content %}<div class="content">{{ content | safe }}</div>{% endif %}

  {% if related %}
  <h2>Related</h2>
  <ul>{% for r in related %}<li><a href="{{ r.url }}">{{ r.title }}</a></li>{% endfor %}</ul>
  {% endif %}
</article>
{% endblock %}"##;

const RANT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="rant">
  <header>
    <h1>{{ rant.title }}</h1>
    <p class="dateline"><time>{{ date }}</time></p>
  </header>

  <h2>Context</h2>
  <p>{{ rant.context }}</p>

  <h2>The rant</h2>
  <p>{{ rant.rant }}</p>

  <h2>Why</h2>
  <p>{{ rant.reasoning }}</p>

  {% if content %}<div class="content">{{ content | safe }}</div>{% endif %}

  {% if related %}
  <h2>Related</h2>
  <ul>{% for r in related %}<li><a href="{{ r.url }}">{{ r.title }}</a></li>{% endfor %}</ul>
  {% endif %}
</article>
{% endblock %}"##;

const USES_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="page-header">
  <h1>{{ heading }}</h1>
  {% if meta.intro %}<p class="intro">{{ meta.intro }}</p>{% endif %}
</header>

{% for group in categories %}
<section class="uses">
  <h2>{{ group.category | title }}</h2>
  <ul>
  {% for item in group.items %}
    <li>{% if item.url %}<a href="{{ item.url }}">{{ item.name }}</a>{% else %}<strong>{{ item.name }}</strong>{% endif %}
      <p>{{ item.description }}</p></li>
  {% endfor %}
  </ul>
</section>
{% endfor %}
{% endblock %}"##;

const ABOUT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="page-header">
  <h1>{{ heading }}</h1>
</header>
<p>{{ site.author.bio }}</p>
{% if site.author.location %}<p class="location">Based in {{ site.author.location }}</p>{% endif %}
<p><a href="/uses/">What I use</a></p>
{% endblock %}"##;

const CONTACT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="page-header">
  <h1>{{ heading }}</h1>
  <p class="intro">{{ meta.description }}</p>
</header>
<p><a href="mailto:{{ site.author.email }}">{{ site.author.email }}</a></p>
{% if socials %}
<ul class="socials">
{% for link in socials %}<li><a href="{{ link[1] }}" rel="me">{{ link[0] }}</a></li>{% endfor %}
</ul>
{% endif %}
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn seo(image: Option<&str>) -> Seo {
        Seo {
            title: "Shipping | Kayode O.".to_string(),
            description: "On <finishing> things".to_string(),
            canonical: "https://kayode0x.com/writing/shipping/".to_string(),
            image: image.map(str::to_string),
            kind: "article",
            published: Some("2024-03-05".to_string()),
            json_ld: None,
        }
    }

    #[test]
    fn renders_seo_metadata() {
        let engine = TemplateEngine::new().unwrap();
        let site = SiteConfig::default();
        let seo = seo(Some("https://kayode0x.com/og/shipping.png"));

        let html = engine
            .render(
                "article.html",
                &site,
                &seo,
                "/writing/shipping/",
                context! { title => "Shipping", date => "March 5, 2024", toc => Vec::<u8>::new(), content => "<p>Body</p>" },
            )
            .unwrap();

        assert!(html.contains("<title>Shipping | Kayode O.</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://kayode0x.com/writing/shipping/">"#));
        assert!(html.contains(r#"<meta property="og:image" content="https://kayode0x.com/og/shipping.png">"#));
        assert!(html.contains("summary_large_image"));
        assert!(html.contains("On &lt;finishing&gt; things"));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn marks_active_navigation() {
        let engine = TemplateEngine::new().unwrap();
        let site = SiteConfig::default();

        let html = engine
            .render(
                "article.html",
                &site,
                &seo(None),
                "/writing/shipping/",
                context! { title => "Shipping", date => "", toc => Vec::<u8>::new(), content => "" },
            )
            .unwrap();

        assert!(html.contains(r#"<a href="/writing/" class="active">Writing</a>"#));
        assert!(html.contains(r#"<a href="/rants/">Rants</a>"#));
        assert!(html.contains(r#"content="summary""#));
        assert!(!html.contains("og:image\""));
    }

    #[test]
    fn renders_empty_listing() {
        let engine = TemplateEngine::new().unwrap();
        let site = SiteConfig::default();

        let html = engine
            .render(
                "listing.html",
                &site,
                &seo(None),
                "/notes/",
                context! { heading => "Notes", meta => context! { intro => "Short ones." }, items => Vec::<ListItem>::new() },
            )
            .unwrap();

        assert!(html.contains("<h1>Notes</h1>"));
        assert!(html.contains("Nothing here yet."));
    }
}
