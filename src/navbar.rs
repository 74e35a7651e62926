//! Rendering the navigation fragment: one dated button per page, newest
//! first, with the index page itself left out.

use crate::page::Page;

const INDEX_FILE_NAME: &str = "index.html";

/// Produces the HTML fragment of navigation buttons for the given pages. The
/// caller is expected to pass pages already sorted newest-first (see
/// [`crate::page::sort_pages`]); buttons are emitted in exactly that order,
/// with no deduplication and no pagination. Each button links to the page's
/// output file and is labeled with the page's formatted date.
pub fn buttons(pages: &[Page]) -> String {
    let mut fragment = String::new();
    for page in pages {
        if page.output_name == INDEX_FILE_NAME {
            continue;
        }
        fragment.push_str(&format!(
            r#"<a href="{}" class="button">{}</a>"#,
            page.output_name,
            page.formatted_date(),
        ));
    }
    fragment
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::page::sort_pages;
    use chrono::{DateTime, Local, LocalResult, NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> DateTime<Local> {
        match Local.from_local_datetime(&NaiveDate::from_ymd(y, m, d).and_hms(0, 0, 0)) {
            LocalResult::Single(stamp) | LocalResult::Ambiguous(stamp, _) => stamp,
            LocalResult::None => panic!("nonexistent local midnight"),
        }
    }

    fn stub(output_name: &str, stamp: DateTime<Local>) -> Page {
        Page {
            title: output_name.trim_end_matches(".html").to_owned(),
            output_name: output_name.to_owned(),
            content: String::new(),
            modification_date: stamp,
        }
    }

    #[test]
    fn test_buttons_descending() {
        let mut pages = vec![
            stub("2023-01-01-hello.html", date(2023, 1, 1)),
            stub("2023-06-15.html", date(2023, 6, 15)),
            stub("notes.html", date(2023, 3, 1)),
        ];
        sort_pages(&mut pages);
        assert_eq!(
            buttons(&pages),
            concat!(
                r#"<a href="2023-06-15.html" class="button">2023-06-15</a>"#,
                r#"<a href="notes.html" class="button">2023-03-01</a>"#,
                r#"<a href="2023-01-01-hello.html" class="button">2023-01-01</a>"#,
            )
        );
    }

    #[test]
    fn test_buttons_exclude_index() {
        let pages = vec![
            stub("index.html", date(2023, 1, 2)),
            stub("notes.html", date(2023, 1, 1)),
        ];
        assert_eq!(
            buttons(&pages),
            r#"<a href="notes.html" class="button">2023-01-01</a>"#
        );
    }

    #[test]
    fn test_buttons_empty() {
        assert_eq!(buttons(&[]), "");
    }
}
