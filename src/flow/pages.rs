//! Page registry
//!
//! A fixed set of named pages; exactly one carries the active marker once
//! the first page has been shown. Switching clears every marker first.

use std::fmt;

/// A navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Landing,
    Game,
    Gift,
    Passcode,
    Cards,
    /// Content page for card `n` of the catalog
    Card(usize),
}

impl PageId {
    /// Element id of the page container
    pub fn dom_id(&self) -> String {
        match self {
            PageId::Landing => "landingPage".to_string(),
            PageId::Game => "gamePage".to_string(),
            PageId::Gift => "giftPage".to_string(),
            PageId::Passcode => "passwordPage".to_string(),
            PageId::Cards => "cardsPage".to_string(),
            PageId::Card(n) => format!("card{n}Page"),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dom_id())
    }
}

/// All registered pages and their active markers
#[derive(Debug, Clone)]
pub struct PageRegistry {
    pages: Vec<(PageId, bool)>,
}

impl PageRegistry {
    /// Fixed pages plus one page per catalog card
    pub fn new(card_count: usize) -> Self {
        let mut pages = vec![
            (PageId::Landing, false),
            (PageId::Game, false),
            (PageId::Gift, false),
            (PageId::Passcode, false),
            (PageId::Cards, false),
        ];
        pages.extend((0..card_count).map(|n| (PageId::Card(n), false)));
        Self { pages }
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.pages.iter().any(|(p, _)| *p == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.pages.iter().map(|(p, _)| *p)
    }

    /// Make `id` the only active page.
    ///
    /// Returns `false` and leaves every marker untouched when `id` is not
    /// registered.
    pub fn activate(&mut self, id: PageId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for (page, active) in &mut self.pages {
            *active = *page == id;
        }
        true
    }

    pub fn active(&self) -> Option<PageId> {
        self.pages.iter().find(|(_, a)| *a).map(|(p, _)| *p)
    }

    pub fn active_count(&self) -> usize {
        self.pages.iter().filter(|(_, a)| *a).count()
    }
}
