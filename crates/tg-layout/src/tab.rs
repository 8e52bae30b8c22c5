// ABOUTME: A tab: one open document plus its presentation state.
// ABOUTME: Tabs are owned by exactly one pane and never shared.

use tg_core::{DocumentRef, TabId, TabSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    id: TabId,
    document: DocumentRef,
    title: String,
    icon: Option<String>,
    dirty: bool,
}

impl Tab {
    pub(crate) fn new(id: TabId, document: DocumentRef) -> Self {
        Self {
            id,
            title: document.title(),
            icon: document.icon(),
            document,
            dirty: false,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn to_snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            id: self.id,
            document: self.document.clone(),
            title: self.title.clone(),
            icon: self.icon.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn from_snapshot(snapshot: &TabSnapshot) -> Self {
        Self {
            id: snapshot.id,
            document: snapshot.document.clone(),
            title: snapshot.title.clone(),
            icon: snapshot.icon.clone(),
            dirty: snapshot.dirty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tab_takes_title_and_icon_from_document() {
        let tab = Tab::new(TabId(1), DocumentRef::file("src/lib.rs"));
        assert_eq!(tab.title(), "lib.rs");
        assert_eq!(tab.icon(), Some("rs"));
        assert!(!tab.is_dirty());
    }

    #[test]
    fn snapshot_keeps_presentation_state() {
        let mut tab = Tab::new(TabId(4), DocumentRef::resource("untitled:1"));
        tab.set_dirty(true);
        tab.set_title("Scratch".to_string());

        let restored = Tab::from_snapshot(&tab.to_snapshot());
        assert_eq!(restored, tab);
    }
}
