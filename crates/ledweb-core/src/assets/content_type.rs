use crate::http::ContentType;

/// Extension suffix to content type, checked in order.
const CONTENT_TYPES: &[(&str, ContentType)] = &[
    (".htm", ContentType::TextHtml),
    (".html", ContentType::TextHtml),
    (".css", ContentType::TextCss),
    (".js", ContentType::JavaScript),
    (".png", ContentType::Png),
    (".gif", ContentType::Gif),
    (".jpg", ContentType::Jpeg),
    (".ico", ContentType::Icon),
    (".xml", ContentType::TextXml),
    (".pdf", ContentType::Pdf),
    (".zip", ContentType::Zip),
    (".gz", ContentType::Gzip),
];

/// Infer the content type of an asset path.
///
/// Suffixes are compared case-sensitively; the first match wins and
/// anything unknown is `text/plain`.
pub fn content_type_for(path: &str) -> ContentType {
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(ContentType::TextPlain)
}
