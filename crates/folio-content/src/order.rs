//! Orderings shared by listings, the feed and image targets.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::schema::{Note, Project, Rant, Uses, Writing};
use crate::store::Entry;

/// Collections whose entries carry a date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Writing {
    fn date(&self) -> NaiveDate {
        self.publish_date
    }
}

impl Dated for Rant {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Note {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Sort dated entries newest first.
///
/// The sort is stable: entries sharing a date keep their incoming order.
pub fn sort_newest_first<T: Dated>(entries: &mut [&Entry<T>]) {
    entries.sort_by(|a, b| b.data.date().cmp(&a.data.date()));
}

/// Projects by `order` ascending (unordered last), then `year` descending.
pub fn sort_projects(entries: &mut [&Entry<Project>]) {
    entries.sort_by(|a, b| {
        let by_order = match (a.data.order, b.data.order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_order.then_with(|| b.data.year.cmp(&a.data.year))
    });
}

/// Uses categories by `order` ascending.
pub fn sort_uses(entries: &mut [&Entry<Uses>]) {
    entries.sort_by_key(|e| e.data.order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn entry<T>(slug: &str, data: T) -> Entry<T> {
        Entry {
            slug: slug.to_string(),
            collection: Collection::Writing,
            data,
            body: String::new(),
            path: PathBuf::from(format!("{slug}.md")),
        }
    }

    fn note(y: i32, m: u32, d: u32) -> Note {
        Note {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            title: format!("{y}-{m}-{d}"),
            description: String::new(),
        }
    }

    #[test]
    fn newer_dates_come_first() {
        let january = entry("january", note(2024, 1, 1));
        let june = entry("june", note(2024, 6, 1));
        let mut entries = vec![&january, &june];

        sort_newest_first(&mut entries);

        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["june", "january"]);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let a = entry("a", note(2024, 3, 1));
        let b = entry("b", note(2024, 3, 1));
        let c = entry("c", note(2024, 4, 1));
        let mut entries = vec![&a, &b, &c];

        sort_newest_first(&mut entries);

        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }

    #[test]
    fn projects_sort_by_order_then_year() {
        let yaml = |order: &str, year: i32| {
            format!(
                "title: t\nrole: r\nyear: {year}\noutcomeSummary: o\noverview: o\nproblem: p\nconstraints: []\napproach: a\nkeyDecisions: []\ntechStack: []\nimpact: {{qualitative: q}}\nlearnings: []\n{order}"
            )
        };
        let project = |order: &str, year: i32| -> Project {
            serde_yaml::from_str(&yaml(order, year)).unwrap()
        };
        let unordered_new = entry("unordered-new", project("", 2024));
        let unordered_old = entry("unordered-old", project("", 2020));
        let second = entry("second", project("order: 2\n", 2019));
        let first = entry("first", project("order: 1\n", 2018));
        let mut entries = vec![&unordered_old, &second, &unordered_new, &first];

        sort_projects(&mut entries);

        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "unordered-new", "unordered-old"]);
    }
}
