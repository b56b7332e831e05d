//! Startup restoration of pinned tabs.
//!
//! When the browser starts, the bookmarks of the chosen folder are
//! reopened as pinned tabs:
//!
//! 1. Read `targetFolderId`; stop if nothing was chosen.
//! 2. Close pinned tabs left over from session restore.
//! 3. Open one pinned tab per bookmark directly inside the folder.
//!
//! Only `http` and `https` URLs are opened. Anything else (`javascript:`,
//! `file:`, `chrome:`, malformed URLs) is skipped with a warning.

use serde::Serialize;
use url::Url;

use crate::Result;
use crate::host::{BookmarkSource, KeyValueStore, TabHost};
use crate::models::{BookmarkChild, SelectionState, TARGET_FOLDER_KEY};

/// Whether a bookmark URL may be opened as a tab.
pub fn is_safe_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Bookmark URLs of a folder split by whether they will be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinnedUrls {
    pub open: Vec<String>,
    pub skipped: Vec<String>,
}

/// Partition the URLs of a folder's direct children.
///
/// Subfolders (children without a URL or with an empty one) are ignored;
/// input order is kept.
pub fn pinned_urls(children: &[BookmarkChild]) -> PinnedUrls {
    let mut urls = PinnedUrls::default();
    let listed = children
        .iter()
        .filter_map(|c| c.url.as_deref())
        .filter(|url| !url.is_empty());
    for url in listed {
        if is_safe_url(url) {
            urls.open.push(url.to_string());
        } else {
            urls.skipped.push(url.to_string());
        }
    }
    urls
}

/// What a restore run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    /// Folder that was restored, `None` when nothing is configured
    pub folder_id: Option<String>,
    /// Number of leftover pinned tabs closed
    pub closed: usize,
    /// URLs opened as pinned tabs
    pub opened: Vec<String>,
    /// URLs skipped because of their scheme
    pub skipped: Vec<String>,
}

/// Reopen the chosen folder as pinned tabs.
///
/// Stops at the first failing browser call; the error is logged and
/// returned, and tabs opened so far stay open.
pub async fn restore_pinned_tabs(
    store: &dyn KeyValueStore,
    bookmarks: &dyn BookmarkSource,
    tabs: &dyn TabHost,
) -> Result<RestoreReport> {
    let items = store.get(TARGET_FOLDER_KEY).await?;
    let selection = match SelectionState::from_items(&items) {
        Ok(selection) => selection,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable target folder");
            return Ok(RestoreReport::default());
        }
    };
    let Some(folder_id) = selection.folder_id() else {
        tracing::debug!("no target folder configured");
        return Ok(RestoreReport::default());
    };

    let mut report = RestoreReport {
        folder_id: Some(folder_id.to_string()),
        ..RestoreReport::default()
    };
    if let Err(e) = reopen(folder_id, bookmarks, tabs, &mut report).await {
        tracing::error!(error = %e, folder_id = %folder_id, "failed to restore pinned tabs");
        return Err(e);
    }
    tracing::info!(
        folder_id = %folder_id,
        closed = report.closed,
        opened = report.opened.len(),
        skipped = report.skipped.len(),
        "restored pinned tabs"
    );
    Ok(report)
}

async fn reopen(
    folder_id: &str,
    bookmarks: &dyn BookmarkSource,
    tabs: &dyn TabHost,
    report: &mut RestoreReport,
) -> Result<()> {
    for tab_id in tabs.query_pinned().await? {
        tabs.remove(tab_id).await?;
        report.closed += 1;
    }

    let children = bookmarks.get_children(folder_id).await?;
    let urls = pinned_urls(&children);
    for url in &urls.skipped {
        tracing::warn!(url = %url, "skipping bookmark with unsafe URL scheme");
    }
    report.skipped = urls.skipped;

    for url in urls.open {
        tabs.create_pinned(&url).await?;
        report.opened.push(url);
    }
    Ok(())
}
