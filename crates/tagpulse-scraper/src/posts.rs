use crate::access::{ContentAccess, ElementRef};
use crate::error::ScraperError;
use crate::selectors;

/// A post link read from a grid or feed, captured before leaving the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    /// Platform-relative post path, when the link carried one.
    pub href: Option<String>,
    /// Alt text of the link's first image; empty when absent.
    pub alt: String,
}

/// Read up to `limit` post links on the current page, in document order.
///
/// # Errors
///
/// Returns an error if the link lookup itself fails. Unreadable attributes
/// on individual links are treated as absent.
pub async fn read_post_refs(
    access: &dyn ContentAccess,
    limit: usize,
) -> Result<Vec<PostRef>, ScraperError> {
    let links = access.find_all(selectors::POST_LINK).await?;
    let mut refs = Vec::with_capacity(links.len().min(limit));
    for link in links.into_iter().take(limit) {
        let href = access
            .attribute(link, "href")
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "post link href unreadable");
                None
            })
            .filter(|h| !h.is_empty());
        let alt = first_image_alt(access, link).await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "post image alt unreadable");
            None
        });
        refs.push(PostRef {
            href,
            alt: alt.unwrap_or_default(),
        });
    }
    Ok(refs)
}

async fn first_image_alt(
    access: &dyn ContentAccess,
    link: ElementRef,
) -> Result<Option<String>, ScraperError> {
    let images = access.find_within(link, selectors::POST_IMAGE).await?;
    match images.first() {
        Some(&image) => access.attribute(image, "alt").await,
        None => Ok(None),
    }
}
