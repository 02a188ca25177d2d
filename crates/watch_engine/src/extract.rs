use scraper::{ElementRef, Html, Selector};
use watch_core::{Title, TitleSet};

pub const DEFAULT_TITLE_CLASS: &str =
    "product-title px_list_page_product_click list_page_product_tracking_target";
pub const DEFAULT_PAGINATION_CLASS: &str = "js_pagination_item";

/// Class attribute literals identifying the interesting anchors on a listing
/// page. Matching is exact string equality on the whole attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingMarkers {
    pub title_class: String,
    pub pagination_class: String,
}

impl Default for ListingMarkers {
    fn default() -> Self {
        Self {
            title_class: DEFAULT_TITLE_CLASS.to_string(),
            pagination_class: DEFAULT_PAGINATION_CLASS.to_string(),
        }
    }
}

/// Collects the product titles on one listing page. No match is an empty set.
pub fn extract_titles(markup: &str, markers: &ListingMarkers) -> TitleSet {
    let doc = Html::parse_document(markup);
    let mut titles = TitleSet::new();
    visit_marked_anchors(&doc, &markers.title_class, |anchor| {
        if let Some(title) = Title::new(&anchor.text().collect::<String>()) {
            titles.insert(title);
        }
    });
    titles
}

/// Highest numeric pagination label on the page, or 1 when there is none.
pub fn max_page_number(markup: &str, markers: &ListingMarkers) -> u32 {
    let doc = Html::parse_document(markup);
    let mut max_page = 1;
    visit_marked_anchors(&doc, &markers.pagination_class, |anchor| {
        let label = anchor.text().collect::<String>();
        // Ellipsis and arrow items carry no number.
        if let Ok(page) = label.trim().parse::<u32>() {
            max_page = max_page.max(page);
        }
    });
    max_page
}

fn visit_marked_anchors(doc: &Html, class: &str, visit: impl FnMut(ElementRef<'_>)) {
    let Ok(anchor_sel) = Selector::parse("a") else {
        return;
    };
    doc.select(&anchor_sel)
        .filter(|anchor| anchor.value().attr("class") == Some(class))
        .for_each(visit);
}
