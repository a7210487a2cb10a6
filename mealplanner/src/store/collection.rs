use std::sync::RwLock;
use std::time::Duration;

use tracing::{debug, warn};

use super::{InFlight, Liveness, Notice, NoticeBoard, Outcome};
use crate::calc::filter_by_name;
use crate::gateway::{create_all, ItemGateway, Named};
use crate::models::ListFilter;

/// Local mirror of one remote collection for the lifetime of a screen.
///
/// Creates are prepended and deletes filtered out only after the server
/// confirms them, so the collection never shows an entity the server
/// rejected and never loses one whose removal failed.
pub struct CollectionStore<G: ItemGateway> {
    gateway: G,
    items: RwLock<Vec<G::Item>>,
    filter: RwLock<ListFilter>,
    loading: InFlight,
    liveness: Liveness,
    notices: NoticeBoard,
}

impl<G: ItemGateway> CollectionStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            items: RwLock::new(Vec::new()),
            filter: RwLock::new(ListFilter::default()),
            loading: InFlight::new(),
            liveness: Liveness::new(),
            notices: NoticeBoard::default(),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notices = NoticeBoard::new(ttl);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn unmount(&self) {
        self.liveness.unmount();
    }

    /// `true` while a request started by this store is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    pub fn items(&self) -> Vec<G::Item> {
        self.items.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The filter the current items were fetched with.
    pub fn filter(&self) -> ListFilter {
        self.filter.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.last()
    }

    /// The collection as the screen shows it for the current search text.
    ///
    /// Resources searched server-side were already narrowed by [`load`](Self::load);
    /// the rest are filtered here on every call.
    pub fn visible(&self, query: &str) -> Vec<G::Item> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        if G::SERVER_SEARCH {
            items.clone()
        } else {
            filter_by_name(&items, query)
        }
    }

    /// Replaces the collection with a fresh fetch.
    pub async fn load(&self, filter: &ListFilter) -> Outcome {
        let Ok(_guard) = self.loading.try_begin() else {
            return Outcome::Busy;
        };

        let request = if G::SERVER_SEARCH {
            filter.clone()
        } else {
            ListFilter::default()
        };

        let Some(result) = self.liveness.run(self.gateway.list(&request)).await else {
            return Outcome::Unmounted;
        };

        match result {
            Ok(items) => {
                debug!("Loaded {} {}(s)", items.len(), G::NOUN);
                *self.items.write().unwrap_or_else(|e| e.into_inner()) = items;
                *self.filter.write().unwrap_or_else(|e| e.into_inner()) = request;
                Outcome::Completed(None)
            }
            Err(e) => self
                .notices
                .post(Err(e), &format!("Failed to load {}s", G::NOUN)),
        }
    }

    pub async fn add(&self, draft: &G::Draft) -> Outcome {
        let Ok(_guard) = self.loading.try_begin() else {
            return Outcome::Busy;
        };
        let Some(result) = self.liveness.run(self.gateway.create(draft)).await else {
            return Outcome::Unmounted;
        };

        let result = result.map(|item| {
            let message = format!("{} added", item.name());
            self.write_items(|items| items.insert(0, item));
            message
        });
        self.notices
            .post(result, &format!("Failed to add {}", G::NOUN))
    }

    pub async fn update(&self, id: i64, draft: &G::Draft) -> Outcome {
        let Ok(_guard) = self.loading.try_begin() else {
            return Outcome::Busy;
        };
        let Some(result) = self.liveness.run(self.gateway.update(id, draft)).await else {
            return Outcome::Unmounted;
        };

        let result = result.map(|updated| {
            self.write_items(|items| {
                if let Some(slot) = items.iter_mut().find(|i| i.id() == id) {
                    *slot = updated;
                }
            });
            format!("{} updated", capitalize(G::NOUN))
        });
        self.notices
            .post(result, &format!("Failed to update {}", G::NOUN))
    }

    pub async fn remove(&self, id: i64) -> Outcome {
        let Ok(_guard) = self.loading.try_begin() else {
            return Outcome::Busy;
        };
        let Some(result) = self.liveness.run(self.gateway.delete(id)).await else {
            return Outcome::Unmounted;
        };

        let result = result.map(|()| {
            self.write_items(|items| items.retain(|i| i.id() != id));
            format!("{} removed", capitalize(G::NOUN))
        });
        self.notices
            .post(result, &format!("Failed to remove {}", G::NOUN))
    }

    /// Creates several entities one after another and keeps every one the
    /// server accepted, even when a later one fails.
    pub async fn add_many(&self, drafts: &[G::Draft]) -> Outcome {
        if drafts.is_empty() {
            return self.notices.show(Notice::error("Please select items to add"));
        }
        let Ok(_guard) = self.loading.try_begin() else {
            return Outcome::Busy;
        };
        let Some(batch) = self.liveness.run(create_all(&self.gateway, drafts)).await else {
            return Outcome::Unmounted;
        };

        let added = batch.created.len();
        self.write_items(|items| {
            for item in batch.created {
                items.insert(0, item);
            }
        });

        let noun = if added == 1 {
            G::NOUN.to_string()
        } else {
            format!("{}s", G::NOUN)
        };
        match batch.error {
            None => self.notices.post(Ok(format!("Added {added} {noun}")), ""),
            Some(e) => {
                warn!("Added {} of {} {}s: {}", added, drafts.len(), G::NOUN, e);
                let reason = e.user_message(&format!("Failed to add {}", G::NOUN));
                let message = if added == 0 {
                    reason
                } else {
                    format!("Added {added} of {}. {reason}", drafts.len())
                };
                self.notices.show(Notice::error(message))
            }
        }
    }

    fn write_items(&self, f: impl FnOnce(&mut Vec<G::Item>)) {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        f(&mut items);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
