//! Element-type metadata bundles: links, form controls, images and video.

use log::warn;
use url::Url;

use crate::node::Node;
use crate::style::StyleSnapshot;
use crate::utilities::{clean_attribute, collapse_whitespace};
use domcompose_core::{FormInfo, ImageInfo, LinkInfo, MediaSource, SelectOption, VideoInfo};

/// Classify a link target.
///
/// `mailto:` and `tel:` are email and phone links. Fragments, absolute paths
/// and relative references are internal, as are `http(s)` URLs on the same
/// host as `base`. Any other `http(s)` URL is external; other schemes set no
/// flag.
pub fn link_info(href: &str, base: Option<&Url>) -> LinkInfo {
    let mut info = LinkInfo {
        href: href.to_string(),
        ..Default::default()
    };
    let trimmed = href.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("mailto:") {
        info.is_email = true;
    } else if lower.starts_with("tel:") {
        info.is_phone = true;
    } else if lower.starts_with("//") {
        let resolved = base.and_then(|b| b.join(trimmed).ok());
        let same_host = matches!((base, &resolved), (Some(b), Some(r)) if b.host_str() == r.host_str());
        info.is_internal = same_host;
        info.is_external = !same_host;
    } else {
        match Url::parse(trimmed) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                let same_host = base.is_some_and(|b| b.host_str() == url.host_str());
                info.is_internal = same_host;
                info.is_external = !same_host;
            }
            Ok(_) => {}
            Err(_) => info.is_internal = true,
        }
    }
    info
}

/// Resolve `src` against `base`; unresolvable values are returned as-is
pub fn absolute_url(src: &str, base: Option<&Url>) -> String {
    base.and_then(|b| b.join(src.trim()).ok())
        .map(String::from)
        .unwrap_or_else(|| src.to_string())
}

/// Form bundle for `input`, `textarea`, `select` and `form`
pub fn form_info(node: &Node) -> FormInfo {
    let tag = node.tag_name();
    let input_type = match tag.as_str() {
        "input" => node.attr("type").map(str::to_ascii_lowercase).unwrap_or_else(|| "text".to_string()),
        "select" if node.has_attr("multiple") => "select-multiple".to_string(),
        "select" => "select-one".to_string(),
        other => other.to_string(),
    };

    let options = if tag == "select" {
        let mut options = Vec::new();
        collect_options(node, &mut options);
        options
    } else {
        Vec::new()
    };

    let value = match tag.as_str() {
        "textarea" => node.text_content(),
        "select" => options
            .iter()
            .find(|o| o.selected)
            .or_else(|| options.first())
            .map(|o| o.value.clone())
            .unwrap_or_default(),
        _ => node.attr("value").unwrap_or_default().to_string(),
    };

    FormInfo {
        input_type,
        name: clean_attribute(node.attr("name")),
        placeholder: node.attr("placeholder").unwrap_or_default().to_string(),
        required: node.has_attr("required"),
        value,
        options,
    }
}

fn collect_options(node: &Node, out: &mut Vec<SelectOption>) {
    for child in node.element_children() {
        if child.is_tag("option") {
            let label = collapse_whitespace(&child.text_content());
            out.push(SelectOption {
                value: child.attr("value").map(str::to_string).unwrap_or_else(|| label.clone()),
                label: child.attr("label").map(str::to_string).unwrap_or(label),
                selected: child.has_attr("selected"),
            });
        } else if child.is_tag("optgroup") {
            collect_options(child, out);
        }
    }
}

/// Image bundle. Dimensions come from the attributes, falling back to the
/// computed pixel size.
pub fn image_info(node: &Node, src: &str, computed: Option<&StyleSnapshot>) -> ImageInfo {
    let dimension = |name: &str| {
        node.attr(name)
            .and_then(parse_pixels)
            .or_else(|| computed.and_then(|c| c.get(name)).and_then(|v| parse_pixels(v)))
    };

    ImageInfo {
        src: src.to_string(),
        alt: node.attr("alt").unwrap_or_default().to_string(),
        width: dimension("width"),
        height: dimension("height"),
        loading: node.attr("loading").unwrap_or("eager").to_string(),
        decoding: node.attr("decoding").unwrap_or("auto").to_string(),
    }
}

/// `"320"`, `"320px"` and `"319.6px"` all give 320
fn parse_pixels(value: &str) -> Option<u32> {
    let number = value.trim().trim_end_matches("px").trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32)
}

/// Video bundle with every `source` child, falling back to the element's own
/// `src`. A video without any source yields an empty source list.
pub fn video_info(node: &Node, base: Option<&Url>) -> VideoInfo {
    let mut sources: Vec<MediaSource> = node
        .element_children()
        .filter(|c| c.is_tag("source"))
        .filter_map(|c| {
            let src = c.attr("src")?.trim();
            (!src.is_empty()).then(|| MediaSource {
                src: absolute_url(src, base),
                mime_type: c.attr("type").unwrap_or_default().to_string(),
            })
        })
        .collect();

    if sources.is_empty() {
        if let Some(src) = node.attr("src").map(str::trim).filter(|s| !s.is_empty()) {
            sources.push(MediaSource {
                src: absolute_url(src, base),
                mime_type: String::new(),
            });
        }
    }

    if sources.is_empty() {
        warn!(target: "domcompose::convert", "<video> without a source, emitting empty media metadata");
    }

    VideoInfo {
        sources,
        poster: node.attr("poster").map(|p| absolute_url(p, base)).unwrap_or_default(),
        autoplay: node.has_attr("autoplay"),
        looping: node.has_attr("loop"),
        muted: node.has_attr("muted"),
        controls: node.has_attr("controls"),
        plays_inline: node.has_attr("playsinline"),
    }
}
