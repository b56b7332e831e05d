//! Folder extraction from a bookmark tree snapshot.
//!
//! The browser hands out the whole bookmark tree at once. The picker only
//! needs the folders, flattened in the order a user would see them when
//! expanding the tree top to bottom.

use crate::messages::Messages;
use crate::models::{BookmarkNode, FolderDescriptor, ROOT_FOLDER_ID};

/// Flatten a bookmark tree into the list of selectable folders.
///
/// Folders are emitted in pre-order: a folder comes before its
/// descendants and siblings keep their input order. Bookmark leaves are
/// skipped together with anything below them. The synthetic root
/// (id `"0"`) is never emitted, but its children are still visited.
///
/// The tree must be acyclic, which every browser snapshot is.
pub fn extract_folders(roots: &[BookmarkNode]) -> Vec<FolderDescriptor> {
    let mut folders = Vec::new();
    collect_folders(roots, &mut folders);
    folders
}

fn collect_folders(nodes: &[BookmarkNode], out: &mut Vec<FolderDescriptor>) {
    for node in nodes.iter().filter(|n| n.is_folder()) {
        if node.id != ROOT_FOLDER_ID {
            out.push(FolderDescriptor::from(node));
        }
        collect_folders(node.child_nodes(), out);
    }
}

/// Display title for a folder using the default message catalog.
///
/// See [`Messages::folder_title`] for the policy.
pub fn resolve_folder_title(folder: &FolderDescriptor) -> String {
    Messages::default().folder_title(folder)
}

/// Find a folder node by id anywhere in the tree.
pub fn find_folder<'a>(roots: &'a [BookmarkNode], id: &str) -> Option<&'a BookmarkNode> {
    for node in roots.iter().filter(|n| n.is_folder()) {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_folder(node.child_nodes(), id) {
            return Some(found);
        }
    }
    None
}
