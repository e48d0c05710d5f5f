//! Single owner of the selected district.
//!
//! The map, the selector and the detail loader never hold their own copy of
//! the selection: they subscribe here and every selection, whatever widget
//! it came from, goes through [`SelectionCoordinator::select_district`].
//!
//! Single-threaded: state lives in `Cell`/`RefCell` so that subscribers may
//! read the coordinator, or select another district, while a notification
//! is in progress.

use contracts::dashboards::d400_district_performance::District;
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

use super::geo::{coordinates_for, has_anchor, LatLon};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unknown district: {0}")]
    UnknownDistrict(String),
}

/// Handle returned by [`SelectionCoordinator::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Broadcast to subscribers after every successful selection
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub district_id: String,
    /// Where the map should centre
    pub coordinates: LatLon,
    pub request_id: u64,
    /// The district was already selected
    pub reselected: bool,
}

/// Ticket for the detail fetch triggered by a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub district_id: String,
    pub request_id: u64,
}

type Subscriber = Box<dyn FnMut(&SelectionChange)>;

#[derive(Default)]
pub struct SelectionCoordinator {
    directory: RefCell<Vec<District>>,
    current: RefCell<Option<String>>,
    last_request_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    pending: RefCell<VecDeque<SelectionChange>>,
    notifying: Cell<bool>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the district directory, keeping the order it was delivered in.
    ///
    /// Auto-selects the first district when nothing is selected yet or the
    /// current selection is not part of the new directory.
    pub fn load_directory(&self, districts: Vec<District>) -> Option<DetailRequest> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(districts.len());
        for district in districts {
            if seen.insert(district.id.clone()) {
                if !has_anchor(&district.id) {
                    tracing::debug!("district {} has no map anchor, using state centre", district.id);
                }
                unique.push(district);
            } else {
                tracing::warn!("duplicate district id {} in directory, ignored", district.id);
            }
        }
        tracing::info!("district directory loaded: {} districts", unique.len());

        let first_id = unique.first().map(|d| d.id.clone());
        *self.directory.borrow_mut() = unique;

        let keep_current = self
            .current_selection()
            .map(|id| self.contains(&id))
            .unwrap_or(false);
        if keep_current {
            return None;
        }

        match first_id {
            Some(id) => self.select_district(&id).ok(),
            None => {
                *self.current.borrow_mut() = None;
                None
            }
        }
    }

    /// Make `district_id` the current selection and notify subscribers in
    /// registration order.
    ///
    /// Selecting the already selected district notifies again so views can
    /// refresh. Unknown ids leave the state untouched.
    pub fn select_district(&self, district_id: &str) -> Result<DetailRequest, SelectionError> {
        if !self.contains(district_id) {
            tracing::warn!("selection of unknown district {} rejected", district_id);
            return Err(SelectionError::UnknownDistrict(district_id.to_string()));
        }

        let reselected = self.current.borrow().as_deref() == Some(district_id);
        *self.current.borrow_mut() = Some(district_id.to_string());
        let request_id = self.last_request_id.get() + 1;
        self.last_request_id.set(request_id);

        tracing::debug!(
            "district {} selected (request {}, reselected: {})",
            district_id,
            request_id,
            reselected
        );

        let change = SelectionChange {
            district_id: district_id.to_string(),
            coordinates: coordinates_for(district_id),
            request_id,
            reselected,
        };
        self.notify(change);

        Ok(DetailRequest {
            district_id: district_id.to_string(),
            request_id,
        })
    }

    pub fn current_selection(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// False once a newer selection has been made after `request` was issued
    pub fn is_current(&self, request: &DetailRequest) -> bool {
        request.request_id == self.last_request_id.get()
            && self.current.borrow().as_deref() == Some(request.district_id.as_str())
    }

    pub fn contains(&self, district_id: &str) -> bool {
        self.directory.borrow().iter().any(|d| d.id == district_id)
    }

    pub fn district(&self, district_id: &str) -> Option<District> {
        self.directory
            .borrow()
            .iter()
            .find(|d| d.id == district_id)
            .cloned()
    }

    /// Directory in delivery order
    pub fn districts(&self) -> Vec<District> {
        self.directory.borrow().clone()
    }

    pub fn subscribe(&self, subscriber: impl FnMut(&SelectionChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    // Changes are queued and delivered in order by the outermost call. A
    // selection made from inside a callback is broadcast once the current
    // change has reached every subscriber. The list is taken out while
    // callbacks run so a subscriber may read the coordinator or subscribe.
    fn notify(&self, change: SelectionChange) {
        self.pending.borrow_mut().push_back(change);
        if self.notifying.replace(true) {
            return;
        }

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(change) = next else { break };

            let mut running = std::mem::take(&mut *self.subscribers.borrow_mut());
            for (_, subscriber) in running.iter_mut() {
                subscriber(&change);
            }
            let mut subscribers = self.subscribers.borrow_mut();
            let added = std::mem::take(&mut *subscribers);
            running.extend(added);
            *subscribers = running;
        }

        self.notifying.set(false);
    }
}
