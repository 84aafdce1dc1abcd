use scraper::{Html, Selector};

/// Minimum rendered width for an in-body image to count as a lead image.
const MIN_IMAGE_WIDTH: u32 = 200;

/// Everything we can pull out of an article page in one pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractedArticle {
    pub text: String,
    pub authors: Vec<String>,
    pub publish_date: Option<String>,
    pub top_image: Option<String>,
}

/// Find the best lead-image candidate in a page.
///
/// Preference order: og:image, twitter:image, schema.org itemprop image,
/// then the first in-body <img> that is plausibly large enough.
pub fn discover_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    image_from_document(&document)
}

fn image_from_document(document: &Html) -> Option<String> {
    let meta_selectors = [
        r#"meta[property="og:image"]"#,
        r#"meta[name="twitter:image"]"#,
        r#"meta[itemprop="image"]"#,
    ];

    for raw in meta_selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if let Some(url) = document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .find(|content| !content.trim().is_empty())
            {
                return Some(url.trim().to_string());
            }
        }
    }

    let img_selector = Selector::parse("img").ok()?;
    for img in document.select(&img_selector) {
        let width = img
            .value()
            .attr("width")
            .and_then(|w| w.trim().parse::<u32>().ok());
        if let (Some(width), Some(src)) = (width, img.value().attr("src")) {
            if width >= MIN_IMAGE_WIDTH && !src.trim().is_empty() {
                return Some(src.trim().to_string());
            }
        }
    }

    None
}

/// Extract body text, byline metadata and lead image from an article page.
pub fn extract_article(html: &str) -> ExtractedArticle {
    let document = Html::parse_document(html);

    ExtractedArticle {
        text: paragraph_text(&document),
        authors: author_names(&document),
        publish_date: publish_date(&document),
        top_image: image_from_document(&document),
    }
}

/// Join paragraph text, preferring paragraphs inside an <article> element.
fn paragraph_text(document: &Html) -> String {
    let in_article = Selector::parse("article p").ok();
    let anywhere = Selector::parse("p").ok();

    let collect = |selector: &Selector| -> Vec<String> {
        document
            .select(selector)
            .map(|p| p.text().collect::<String>())
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())
            .collect()
    };

    let mut paragraphs = in_article.as_ref().map(|s| collect(s)).unwrap_or_default();
    if paragraphs.is_empty() {
        if let Some(selector) = anywhere.as_ref() {
            paragraphs = collect(selector);
        }
    }

    paragraphs.join("\n\n")
}

fn author_names(document: &Html) -> Vec<String> {
    let selector = match Selector::parse(r#"meta[name="author"]"#) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .flat_map(|content| content.split(','))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn publish_date(document: &Html) -> Option<String> {
    let selectors = [
        r#"meta[property="article:published_time"]"#,
        r#"meta[name="date"]"#,
    ];

    for raw in selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if let Some(date) = document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .find(|content| !content.trim().is_empty())
            {
                return Some(date.trim().to_string());
            }
        }
    }

    None
}
