//! Markdown-to-HTML conversion. [`pulldown_cmark`] does the parsing; on top
//! of its tables, footnotes, strikethrough, and task-list extensions we run
//! three event-conversion passes:
//!
//! * soft line breaks become hard breaks, so single newlines in a note show
//!   up as line breaks in the output;
//! * headings get a slugified `id` attribute derived from their text;
//! * bare `http://`/`https://` tokens in prose become links.
//!
//! Conversion is infallible; a file that reaches this module always produces
//! some HTML.

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag};

/// Converts markdown to an HTML string.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let events: Vec<Event> = Parser::new_ext(markdown, options)
        .map(|ev| match ev {
            Event::SoftBreak => Event::HardBreak,
            _ => ev,
        })
        .collect();
    let events = autolink(anchor_headings(events));

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Replaces each heading's start and end tags with raw HTML carrying an `id`
/// attribute slugified from the heading's text content.
fn anchor_headings(events: Vec<Event>) -> Vec<Event> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::Heading(level)) => {
                let level = *level;
                let mut text = String::new();
                let mut j = i + 1;
                while j < events.len() {
                    match &events[j] {
                        Event::End(Tag::Heading(_)) => break,
                        Event::Text(t) | Event::Code(t) => text.push_str(t),
                        _ => {}
                    }
                    j += 1;
                }
                out.push(Event::Html(CowStr::from(format!(
                    "<h{} id=\"{}\">",
                    level,
                    slug::slugify(&text)
                ))));
                out.extend(events[i + 1..j].iter().cloned());
                out.push(Event::Html(CowStr::from(format!("</h{}>\n", level))));
                i = j + 1;
            }
            _ => {
                out.push(events[i].clone());
                i += 1;
            }
        }
    }
    out
}

/// Turns bare `http(s)://` tokens in text events into links. Text inside code
/// blocks is left alone (code spans are already separate [`Event::Code`]
/// events and never reach the text arm).
fn autolink(events: Vec<Event>) -> Vec<Event> {
    let mut out = Vec::with_capacity(events.len());
    let mut in_code_block = false;
    for ev in events {
        match &ev {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                out.push(ev);
            }
            Event::End(Tag::CodeBlock(_)) => {
                in_code_block = false;
                out.push(ev);
            }
            Event::Text(text) if !in_code_block && text.contains("http") => {
                linkify_into(text, &mut out);
            }
            _ => out.push(ev),
        }
    }
    out
}

/// Splits `text` around bare URLs, pushing plain text and link events.
fn linkify_into<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut cursor = 0;
    for (start, _) in text.match_indices("http") {
        if start < cursor {
            continue;
        }
        let tail = &text[start..];
        if !tail.starts_with("http://") && !tail.starts_with("https://") {
            continue;
        }
        // Only linkify at a word boundary; `xhttp://` is not a URL.
        if start > 0 && !text[..start].ends_with(|c: char| c.is_whitespace() || c == '(') {
            continue;
        }
        let stop = tail
            .find(char::is_whitespace)
            .map(|offset| start + offset)
            .unwrap_or_else(|| text.len());
        let url = text[start..stop].trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':' | ')'));
        if url.len() <= "https://".len() {
            continue;
        }
        if start > cursor {
            out.push(Event::Text(CowStr::from(text[cursor..start].to_owned())));
        }
        let href = CowStr::from(url.to_owned());
        out.push(Event::Start(Tag::Link(
            LinkType::Autolink,
            href.clone(),
            CowStr::from(""),
        )));
        out.push(Event::Text(href.clone()));
        out.push(Event::End(Tag::Link(
            LinkType::Autolink,
            href,
            CowStr::from(""),
        )));
        cursor = start + url.len();
    }
    if cursor < text.len() {
        out.push(Event::Text(CowStr::from(text[cursor..].to_owned())));
    }
}
