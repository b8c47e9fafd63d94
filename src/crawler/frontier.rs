//! Work list a strategy run draws URLs from
//!
//! Seed URLs are always handed out, in order, exactly as given (duplicates
//! included, so every input URL gets one outcome). Discovered links are only
//! accepted in link-following mode; they are deduplicated against everything
//! seen so far and stop being accepted once `max_pages` URLs have been queued.

use std::collections::{HashSet, VecDeque};

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    follow_links: bool,
    max_pages: usize,
    queued: usize,
}

impl Frontier {
    /// Creates a frontier over the seed URLs
    ///
    /// `max_pages` only bounds discovered links; seeds always run.
    pub fn new(seeds: &[String], follow_links: bool, max_pages: usize) -> Self {
        Self {
            queue: seeds.iter().cloned().collect(),
            seen: seeds.iter().cloned().collect(),
            follow_links,
            max_pages,
            queued: seeds.len(),
        }
    }

    /// Takes the next URL to fetch
    pub fn next_url(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Offers links discovered on a fetched page
    ///
    /// Returns how many were queued.
    pub fn extend<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        if !self.follow_links {
            return 0;
        }

        let mut added = 0;
        for link in links {
            if self.queued >= self.max_pages {
                break;
            }
            if self.seen.insert(link.clone()) {
                self.queue.push_back(link);
                self.queued += 1;
                added += 1;
            }
        }
        added
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
