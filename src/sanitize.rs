//! Output-side HTML filter for user-supplied text.
//!
//! Whitelisted tags are re-emitted with only their whitelisted attributes, every
//! other tag is escaped so it renders as text, and comments are dropped. Stored
//! values stay raw; this runs when a row is turned into a response.

use lazy_static::lazy_static;
use regex::Regex;

const SAFE_URL_PREFIXES: &[&str] = &[
    "http://", "https://", "mailto:", "tel:", "#", "/", "./", "../",
];

fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "a" => &["href", "title", "target"],
        "abbr" => &["title"],
        "img" => &["src", "alt", "title", "width", "height"],
        "blockquote" | "q" => &["cite"],
        "del" | "ins" => &["datetime"],
        "font" => &["color", "size", "face"],
        "table" => &["width", "border", "align", "valign"],
        "td" | "th" => &["width", "rowspan", "colspan", "align", "valign"],
        "tr" => &["rowspan", "align", "valign"],
        "address" | "article" | "aside" | "b" | "big" | "br" | "caption" | "center"
        | "cite" | "code" | "dd" | "div" | "dl" | "dt" | "em" | "figcaption" | "figure"
        | "footer" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hr" | "i"
        | "kbd" | "li" | "mark" | "nav" | "ol" | "p" | "pre" | "s" | "section"
        | "small" | "span" | "strike" | "strong" | "sub" | "summary" | "sup" | "tbody"
        | "tfoot" | "thead" | "tt" | "u" | "ul" => &[],
        _ => return None,
    };
    Some(attrs)
}

pub fn sanitize(input: &str) -> String {
    lazy_static! {
        static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    }
    let input = COMMENT.replace_all(input, "");

    let mut out = String::with_capacity(input.len());
    let mut rest: &str = &input;
    while let Some(start) = rest.find('<') {
        out.push_str(&escape_text(&rest[..start]));
        let candidate = &rest[start..];
        match tag_end(candidate) {
            Some(end) => {
                out.push_str(&filter_tag(&candidate[..=end]));
                rest = &candidate[end + 1..];
            }
            None => {
                out.push_str("&lt;");
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(&escape_text(rest));
    out
}

pub fn sanitize_opt(value: Option<&str>) -> Option<String> {
    value.map(sanitize)
}

/// Byte index of the `>` closing the tag opened at index 0. Quoted sections may
/// contain `>`; a bare `<` before the close means index 0 was not a tag.
fn tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate().skip(1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                b'<' => return None,
                _ => {}
            },
        }
    }
    None
}

fn filter_tag(tag: &str) -> String {
    lazy_static! {
        static ref ATTR: Regex = Regex::new(
            r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#
        )
        .unwrap();
    }

    let inner = &tag[1..tag.len() - 1];
    let (closing, body) = match inner.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, inner),
    };
    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_len].to_ascii_lowercase();

    let Some(allowed) = allowed_attributes(&name) else {
        return escape_text(tag);
    };
    if closing {
        return format!("</{name}>");
    }

    let attrs = &body[name_len..];
    let mut out = format!("<{name}");
    for cap in ATTR.captures_iter(attrs) {
        let attr = cap[1].to_ascii_lowercase();
        if !allowed.contains(&attr.as_str()) {
            continue;
        }
        let value = cap.get(2).or_else(|| cap.get(3)).or_else(|| cap.get(4));
        match value {
            None => {
                out.push(' ');
                out.push_str(&attr);
            }
            Some(v) => {
                let v = unescape_attr(v.as_str());
                if matches!(attr.as_str(), "href" | "src") && !is_safe_url(&v) {
                    continue;
                }
                out.push_str(&format!(" {attr}=\"{}\"", escape_attr(&v)));
            }
        }
    }
    if attrs.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');
    out
}

fn is_safe_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    SAFE_URL_PREFIXES.iter().any(|p| compact.starts_with(p))
}

fn escape_text(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape_attr(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
