//! Field extraction for catalog listings and item detail pages
//!
//! Everything here is pure: it reads a [`Node`] and returns owned values.
//! Fetching the detail page happens in the coordinator, which reports the
//! outcome back as a [`DetailFetch`].

use crate::crawler::document::{first_attr_or, select_text, Node, Page};
use crate::output::{ResultRow, NOT_SPECIFIED};

/// One listed item on a catalog page
pub const LISTING: &str = ".workshopItem";
/// Listing title
pub const LISTING_TITLE: &str = ".workshopItemTitle";
/// Anchor carrying both the detail link and the published file id
pub const LISTING_ANCHOR: &str = ".ugc";
/// Rating image inside a listing
pub const LISTING_RATING: &str = ".fileRating";
/// Pagination buttons; the second one points at the next page
pub const PAGE_BUTTON: &str = ".pagebtn";
/// Tag containers on a detail page
pub const DETAIL_TAGS: &str = ".workshopTags";
/// Cover image on a detail page
pub const DETAIL_COVER: &str = "#previewImage";

/// Labels whose sibling holds the players value
const PLAYER_LABELS: [&str; 2] = ["Number of players", "Tags"];

/// Fields read from a listing node, before the detail page is visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    /// Absolute detail page URL, empty when the listing has no link
    pub link: String,
    pub rating_image: String,
    pub published_id: String,
}

/// Fields read from a detail page; `None` means the page lacked them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub players: Option<String>,
    pub cover_image: Option<String>,
}

/// What happened when the item's detail page was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailFetch {
    /// The page was fetched and parsed
    Loaded(DetailFields),
    /// The listing had no link, so nothing was requested
    NoLink,
    /// The request failed; detail fields fall back to their defaults
    Failed { error: String },
}

impl DetailFetch {
    fn fields(&self) -> Option<&DetailFields> {
        match self {
            Self::Loaded(fields) => Some(fields),
            Self::NoLink | Self::Failed { .. } => None,
        }
    }

    /// Players value, [`NOT_SPECIFIED`] unless the page supplied one
    pub fn players(&self) -> &str {
        self.fields()
            .and_then(|f| f.players.as_deref())
            .unwrap_or(NOT_SPECIFIED)
    }

    /// Cover image URL, empty unless the page supplied one
    pub fn cover_image(&self) -> &str {
        self.fields()
            .and_then(|f| f.cover_image.as_deref())
            .unwrap_or("")
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A finished row together with how its detail fields were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub row: ResultRow,
    pub detail: DetailFetch,
}

impl ExtractedItem {
    pub fn new(listing: Listing, detail: DetailFetch) -> Self {
        let row = ResultRow {
            players: detail.players().to_string(),
            cover_image: detail.cover_image().to_string(),
            rating: rating_from_image_url(&listing.rating_image),
            title: listing.title,
            link: listing.link,
            published_id: listing.published_id,
        };
        Self { row, detail }
    }
}

/// Maps a rating image URL to a star count
///
/// Looks for `5-star` down to `1-star` and returns the first hit, so a URL
/// naming several counts resolves to the highest. No token means 0.
pub fn rating_from_image_url(image_url: &str) -> u8 {
    (1..=5u8)
        .rev()
        .find(|n| image_url.contains(&format!("{}-star", n)))
        .unwrap_or(0)
}

/// Reads every listing on a catalog page, resolving links against the page URL
pub fn read_listings(page: &Page) -> Vec<Listing> {
    page.root()
        .query(LISTING)
        .iter()
        .map(|node| {
            let mut listing = read_listing(node);
            if !listing.link.is_empty() {
                listing.link = page.resolve(&listing.link);
            }
            listing
        })
        .collect()
}

/// Reads one listing node; missing pieces become empty strings
pub fn read_listing<N: Node>(listing: &N) -> Listing {
    Listing {
        title: select_text(listing, LISTING_TITLE),
        link: first_attr_or(listing, LISTING_ANCHOR, "href", ""),
        rating_image: first_attr_or(listing, LISTING_RATING, "src", ""),
        published_id: first_attr_or(listing, LISTING_ANCHOR, "data-publishedfileid", ""),
    }
}

/// Reads the players value and cover image from a detail page
pub fn read_detail<N: Node>(detail: &N) -> DetailFields {
    DetailFields {
        players: players_from_detail(detail),
        cover_image: detail
            .query(DETAIL_COVER)
            .first()
            .and_then(|img| img.attr("src")),
    }
}

/// Finds the players value in a detail page's tag containers
///
/// Every child of every tag container is checked in document order; a child
/// whose text mentions "Number of players" or "Tags" contributes the text of
/// its first sibling. There is no early exit, so when several children
/// match, the last one wins.
pub fn players_from_detail<N: Node>(detail: &N) -> Option<String> {
    let mut players = None;
    for container in detail.query(DETAIL_TAGS) {
        for child in container.element_children() {
            let label = child.text_content();
            if PLAYER_LABELS.iter().any(|l| label.contains(l)) {
                players = Some(
                    child
                        .element_siblings()
                        .first()
                        .map(Node::text_content)
                        .unwrap_or_default(),
                );
            }
        }
    }
    players
}

/// The next catalog page link, or `None` on the last page
///
/// Reads the `href` of the second pagination button; an absent or empty
/// attribute means there is no further page.
pub fn next_page_link<N: Node>(root: &N) -> Option<String> {
    root.query(PAGE_BUTTON)
        .get(1)
        .and_then(|button| button.attr("href"))
        .filter(|href| !href.is_empty())
}
