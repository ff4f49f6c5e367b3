//! # Domain Models
//!
//! These structs represent the catalog entities of Price-Post: books, their
//! retailer listings and the post metadata used when generating output.
//! Field names serialize in camelCase so the persisted list and the HTTP
//! bodies share one shape.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A single retailer's listing for a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    /// Price in yen. Zero means "not entered".
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub url: String,
}

impl Platform {
    pub fn new(name: impl Into<String>, price: f64, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            url: url.into(),
        }
    }

    /// A listing is rendered only with a positive, finite price and a
    /// non-blank URL. Non-finite prices would not survive a JSON round trip.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && !self.url.trim().is_empty()
    }
}

/// The platform rows a fresh entry form starts from.
pub fn default_platforms() -> Vec<Platform> {
    ["Amazon(Kindle)", "Amazon(書籍)", "メルカリ", "楽天"]
        .into_iter()
        .map(|name| Platform::new(name, 0.0, ""))
        .collect()
}

/// Aggregate store review. Both fields default to zero when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub count: u64,
}

impl Review {
    pub fn new(stars: f64, count: u64) -> Self {
        Self { stars, count }
    }

    /// An all-zero review is omitted from output.
    pub fn is_empty(&self) -> bool {
        self.stars == 0.0 && self.count == 0
    }

    /// Stars limited to `0..=5`; non-finite values count as zero.
    pub fn clamped(self) -> Self {
        Self {
            stars: clamp_stars(self.stars),
            ..self
        }
    }
}

fn clamp_stars(stars: f64) -> f64 {
    if stars.is_finite() {
        stars.clamp(0.0, 5.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub review: Review,
}

impl Book {
    /// The author, if present and not blank.
    pub fn display_author(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
    }

    /// Valid listings in insertion order.
    pub fn valid_platforms(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| p.is_valid())
    }
}

/// Input for the extended post variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub post_title: String,
    #[serde(default)]
    pub target_audience: String,
    pub books: Vec<Book>,
}

/// Raw entry-form contents before validation.
///
/// Review fields are kept as the text the operator typed; unparsable input
/// counts as zero, the same way an empty field does.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub platforms: Vec<Platform>,
    pub review_stars: String,
    pub review_count: String,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            platforms: default_platforms(),
            review_stars: String::new(),
            review_count: String::new(),
        }
    }
}

impl BookDraft {
    /// Validates the draft and builds the book that gets appended to the catalog.
    ///
    /// Only valid platforms are kept; a draft without any is rejected.
    pub fn into_book(self) -> Result<Book> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("book title is required".into()));
        }

        let platforms: Vec<Platform> = self
            .platforms
            .into_iter()
            .filter(Platform::is_valid)
            .map(|p| Platform {
                url: p.url.trim().to_string(),
                ..p
            })
            .collect();
        if platforms.is_empty() {
            return Err(AppError::ValidationError(
                "at least one platform needs a price and a URL".into(),
            ));
        }

        let stars = self
            .review_stars
            .trim()
            .parse::<f64>()
            .map_or(0.0, clamp_stars);
        let count = self.review_count.trim().parse::<u64>().unwrap_or(0);

        let author = self.author.trim();
        Ok(Book {
            title: title.to_string(),
            author: (!author.is_empty()).then(|| author.to_string()),
            platforms,
            review: Review::new(stars, count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookDraft {
        let mut draft = BookDraft {
            title: "  Rust入門 ".into(),
            author: " 山田太郎 ".into(),
            review_stars: "4.4".into(),
            review_count: "241".into(),
            ..BookDraft::default()
        };
        draft.platforms[0].price = 1200.0;
        draft.platforms[0].url = " https://example.com/kindle ".into();
        draft
    }

    #[test]
    fn platform_validity_requires_price_and_url() {
        assert!(Platform::new("A", 1.0, "u").is_valid());
        assert!(!Platform::new("A", 0.0, "u").is_valid());
        assert!(!Platform::new("A", -5.0, "u").is_valid());
        assert!(!Platform::new("A", 100.0, "   ").is_valid());
        assert!(!Platform::new("A", f64::NAN, "u").is_valid());
        assert!(!Platform::new("A", f64::INFINITY, "u").is_valid());
    }

    #[test]
    fn draft_keeps_only_valid_platforms_and_trims_fields() {
        let book = draft().into_book().unwrap();
        assert_eq!(book.title, "Rust入門");
        assert_eq!(book.author.as_deref(), Some("山田太郎"));
        assert_eq!(book.platforms.len(), 1);
        assert_eq!(book.platforms[0].name, "Amazon(Kindle)");
        assert_eq!(book.platforms[0].url, "https://example.com/kindle");
        assert_eq!(book.review, Review::new(4.4, 241));
    }

    #[test]
    fn draft_without_title_is_rejected() {
        let mut d = draft();
        d.title = "   ".into();
        assert!(matches!(d.into_book(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn draft_without_valid_platform_is_rejected() {
        let d = BookDraft {
            title: "X".into(),
            ..BookDraft::default()
        };
        assert!(matches!(d.into_book(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn unparsable_review_counts_as_zero() {
        let mut d = draft();
        d.review_stars = "lots".into();
        d.review_count = "".into();
        d.author = " ".into();
        let book = d.into_book().unwrap();
        assert!(book.review.is_empty());
        assert_eq!(book.author, None);
    }

    #[test]
    fn review_stars_are_clamped() {
        let mut d = draft();
        d.review_stars = "9".into();
        assert_eq!(d.into_book().unwrap().review.stars, 5.0);

        for raw in ["-2", "inf", "NaN"] {
            let mut d = draft();
            d.review_stars = raw.into();
            assert_eq!(d.into_book().unwrap().review.stars, 0.0, "stars {raw}");
        }
    }

    #[test]
    fn clamped_review_keeps_count() {
        assert_eq!(Review::new(7.0, 3).clamped(), Review::new(5.0, 3));
        assert_eq!(Review::new(-1.0, 0).clamped(), Review::default());
        assert_eq!(Review::new(3.5, 9).clamped(), Review::new(3.5, 9));
    }

    #[test]
    fn draft_with_infinite_price_is_rejected() {
        let mut d = draft();
        d.platforms[0].price = f64::INFINITY;
        assert!(matches!(d.into_book(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn book_deserializes_with_missing_optional_fields() {
        let book: Book = serde_json::from_str(
            r#"{"title":"X","platforms":[{"name":"A","price":10,"url":"u"}]}"#,
        )
        .unwrap();
        assert_eq!(book.author, None);
        assert!(book.review.is_empty());
        assert_eq!(book.display_author(), None);
    }

    #[test]
    fn post_data_uses_camel_case() {
        let post: PostData = serde_json::from_str(
            r#"{"postTitle":"今週のセール","targetAudience":"学生","books":[]}"#,
        )
        .unwrap();
        assert_eq!(post.post_title, "今週のセール");
        assert_eq!(post.target_audience, "学生");
    }
}
