//! # Post Formatting
//!
//! Renders a book list into the text of a social-media post: each book's
//! listings ranked by price, its review line, then the fixed disclosures.
//! Pure and deterministic; the only failure is an empty book list (or a
//! blank title in the extended variant).

use crate::error::{AppError, Result};
use crate::models::{Book, Platform, PostData};
use crate::traits::FormatRequest;

const CHEAPEST_MARKER: &str = "🟥";
const OTHER_MARKER: &str = "⬜";
const CHEAPEST_LABEL: &str = "（最安）";
const BOOK_SEPARATOR: &str = "---";
const TARGET_AUDIENCE_HEADING: &str = "【こんな方におすすめ】";

/// Information freshness, price source, affiliate disclosure.
pub const DISCLOSURES: [&str; 3] = [
    "※各情報は投稿時点の情報です。最新情報は各サイトでご確認ください",
    "※Amazonの価格は「Amazonの他の出品者」の価格を参考にしています",
    "※本投稿にはアフィリエイト広告（PR）が含まれます",
];

/// Closing block of the extended variant.
pub const SIGNATURE: &str = "━━━━━━━━━━━━━━━
📚 お得な本のセール情報を毎日発信中！
フォローして見逃しを防ごう
━━━━━━━━━━━━━━━";

/// Formats `books` in list order.
///
/// Passing `post_title` selects the extended variant: the title (and the
/// target audience block, when non-blank) is prepended and [`SIGNATURE`] is
/// appended after the disclosures.
pub fn format(
    books: &[Book],
    post_title: Option<&str>,
    target_audience: Option<&str>,
) -> Result<String> {
    if books.is_empty() {
        return Err(AppError::ValidationError("books data is required".into()));
    }

    let mut out = String::new();

    if let Some(title) = post_title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("post title is required".into()));
        }
        out.push_str(&format!("{title}\n\n"));

        if let Some(audience) = target_audience.map(str::trim).filter(|a| !a.is_empty()) {
            out.push_str(&format!("{TARGET_AUDIENCE_HEADING}\n{audience}\n\n"));
        }
    }

    for (index, book) in books.iter().enumerate() {
        render_book(&mut out, book);
        if index + 1 < books.len() {
            out.push_str(&format!("{BOOK_SEPARATOR}\n\n"));
        }
    }

    out.push_str(&DISCLOSURES.join("\n"));

    if post_title.is_some() {
        out.push_str("\n\n");
        out.push_str(SIGNATURE);
    }

    Ok(out)
}

/// Extended variant from a [`PostData`].
pub fn format_post(post: &PostData) -> Result<String> {
    format(
        &post.books,
        Some(post.post_title.as_str()),
        Some(post.target_audience.as_str()),
    )
}

/// Entry point for wire requests, where the book list may be missing.
pub fn format_request(request: &FormatRequest) -> Result<String> {
    let books = request
        .books
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("books data is required".into()))?;
    format(
        books,
        request.post_title.as_deref(),
        request.target_audience.as_deref(),
    )
}

/// Valid listings sorted ascending by price. Equal prices keep their
/// insertion order, so the first entry is the one marked cheapest.
pub fn rank_platforms(book: &Book) -> Vec<&Platform> {
    let mut ranked: Vec<&Platform> = book.valid_platforms().collect();
    ranked.sort_by(|a, b| a.price.total_cmp(&b.price));
    ranked
}

fn render_book(out: &mut String, book: &Book) {
    let title = book.title.trim();
    match book.display_author() {
        Some(author) => out.push_str(&format!("『{title}』（{author}）\n\n")),
        None => out.push_str(&format!("『{title}』\n\n")),
    }

    for (rank, platform) in rank_platforms(book).into_iter().enumerate() {
        let (marker, label) = if rank == 0 {
            (CHEAPEST_MARKER, CHEAPEST_LABEL)
        } else {
            (OTHER_MARKER, "")
        };
        out.push_str(&format!(
            "{marker} {name}{label}\n▶️ ¥{price}\n{url}\n\n",
            name = platform.name,
            price = format_price(platform.price),
            url = platform.url.trim(),
        ));
    }

    let review = book.review.clamped();
    if !review.is_empty() {
        out.push_str(&format!(
            "※ amazon✨{} レビュー{}\n\n",
            review.stars, review.count
        ));
    }
}

/// Thousands-separated price with at most three fraction digits,
/// e.g. `1234567.5` -> `1,234,567.5`.
pub fn format_price(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    let abs = price.abs();

    // Integer and fraction are handled apart so large values never pass
    // through a fixed-width integer.
    let mut whole = abs.trunc();
    let mut thousandths = ((abs - whole) * 1000.0).round();
    if thousandths >= 1000.0 {
        whole += 1.0;
        thousandths = 0.0;
    }
    let grouped = group_thousands(&format!("{whole:.0}"));

    if thousandths == 0.0 {
        format!("{sign}{grouped}")
    } else {
        let digits = format!("{:03}", thousandths as u16);
        format!("{sign}{grouped}.{}", digits.trim_end_matches('0'))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
