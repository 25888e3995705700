//! Subscription bookkeeping and message-ID allocation

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use kalshi_types::Channel;

/// Lifecycle of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Subscribe sent, no acknowledgment yet
    Requested,
    /// Acknowledged by the server
    Active,
    /// Not (or no longer) subscribed
    Unsubscribed,
}

/// One subscribe request and what became of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Id of the subscribe message
    pub id: u64,
    pub channels: Vec<Channel>,
    pub state: SubscriptionState,
    /// Server subscription id, once acknowledged
    pub sid: Option<u64>,
}

/// Kind of an issued control message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Subscribe,
    Unsubscribe,
    Custom,
}

/// Number of control records kept; older ones are dropped first
pub const CONTROL_LOG_CAPACITY: usize = 1024;

/// Audit entry for one issued control message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRecord {
    pub id: u64,
    pub kind: ControlKind,
    pub channels: Vec<String>,
}

/// Active subscriptions of one session, plus its message-ID counter
///
/// Ids start at 1 and every mutation consumes exactly one, including
/// duplicate subscribes and removal of channels that were never subscribed.
/// Ids are never reused for the life of the registry, `clear` included.
#[derive(Debug)]
pub struct SubscriptionRegistry {
    next_id: u64,
    subscriptions: BTreeMap<u64, Subscription>,
    log: VecDeque<ControlRecord>,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            subscriptions: BTreeMap::new(),
            log: VecDeque::new(),
        }
    }

    /// Record a subscribe request and return its message id
    pub fn add(&mut self, channels: Vec<Channel>) -> u64 {
        let id = self.issue(ControlKind::Subscribe, &channels);
        self.subscriptions.insert(
            id,
            Subscription {
                id,
                channels,
                state: SubscriptionState::Requested,
                sid: None,
            },
        );
        id
    }

    /// Record an unsubscribe request and return its message id
    ///
    /// The channels are dropped from every subscription carrying them; a
    /// subscription left with no channels is removed.
    pub fn remove(&mut self, channels: &[Channel]) -> u64 {
        let id = self.issue(ControlKind::Unsubscribe, channels);
        for sub in self.subscriptions.values_mut() {
            sub.channels.retain(|c| !channels.contains(c));
        }
        self.subscriptions.retain(|_, sub| !sub.channels.is_empty());
        id
    }

    /// Allocate an id for a custom control message
    pub fn allocate_id(&mut self) -> u64 {
        self.issue(ControlKind::Custom, &[])
    }

    /// Mark the subscription created by message `id` as active
    ///
    /// Returns false when no such subscription is pending.
    pub fn acknowledge(&mut self, id: u64, sid: Option<u64>) -> bool {
        match self.subscriptions.get_mut(&id) {
            Some(sub) => {
                sub.state = SubscriptionState::Active;
                sub.sid = sid.or(sub.sid);
                true
            }
            None => false,
        }
    }

    /// Drop the subscription created by message `id`
    pub fn reject(&mut self, id: u64) -> Option<Subscription> {
        self.subscriptions.remove(&id)
    }

    /// Drop every subscription; the id counter keeps going
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    /// Wire names of every requested or active channel
    pub fn list(&self) -> BTreeSet<String> {
        self.subscriptions
            .values()
            .flat_map(|sub| sub.channels.iter().map(Channel::wire_name))
            .collect()
    }

    /// Wire names of acknowledged channels only
    pub fn active(&self) -> BTreeSet<String> {
        self.subscriptions
            .values()
            .filter(|sub| sub.state == SubscriptionState::Active)
            .flat_map(|sub| sub.channels.iter().map(Channel::wire_name))
            .collect()
    }

    /// Most advanced state of `channel` across all subscriptions
    pub fn channel_state(&self, channel: &Channel) -> SubscriptionState {
        let mut state = SubscriptionState::Unsubscribed;
        for sub in self.subscriptions.values() {
            if sub.channels.contains(channel) {
                if sub.state == SubscriptionState::Active {
                    return SubscriptionState::Active;
                }
                state = sub.state;
            }
        }
        state
    }

    pub fn get(&self, id: u64) -> Option<&Subscription> {
        self.subscriptions.get(&id)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Id the next control message will get
    pub fn peek_next_id(&self) -> u64 {
        self.next_id
    }

    /// The most recent control messages, oldest first
    ///
    /// Holds at most [`CONTROL_LOG_CAPACITY`] records.
    pub fn log(&self) -> &VecDeque<ControlRecord> {
        &self.log
    }

    fn issue(&mut self, kind: ControlKind, channels: &[Channel]) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.log.len() == CONTROL_LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(ControlRecord {
            id,
            kind,
            channels: channels.iter().map(Channel::wire_name).collect(),
        });
        id
    }
}
