use std::collections::HashMap;
use std::hash::Hash;

use crate::host::{ListenerId, ListenerKind, MapHost};

/// The markers under management, in insertion order, with the interaction
/// listener each one was subscribed with.
#[derive(Debug)]
pub struct MarkerRegistry<M> {
    markers: Vec<M>,
    listener_by_marker: HashMap<M, ListenerId>,
    marker_by_listener: HashMap<ListenerId, M>,
}

impl<M> Default for MarkerRegistry<M> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            listener_by_marker: HashMap::new(),
            marker_by_listener: HashMap::new(),
        }
    }
}

impl<M: Copy + Eq + Hash> MarkerRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts managing `marker`. Returns `false` if it already was managed.
    pub fn add<H>(&mut self, host: &mut H, marker: M, listener: ListenerId) -> bool
    where
        H: MapHost<Marker = M>,
    {
        if self.listener_by_marker.contains_key(&marker) {
            return false;
        }

        host.attach_listener(marker, listener, ListenerKind::Interaction);
        self.listener_by_marker.insert(marker, listener);
        self.marker_by_listener.insert(listener, marker);
        self.markers.push(marker);
        true
    }

    pub fn remove<H>(&mut self, host: &mut H, marker: M) -> bool
    where
        H: MapHost<Marker = M>,
    {
        let Some(listener) = self.listener_by_marker.remove(&marker) else {
            return false;
        };

        host.detach_listener(marker, listener);
        self.marker_by_listener.remove(&listener);
        self.markers.retain(|managed| *managed != marker);
        true
    }

    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: MapHost<Marker = M>,
    {
        for marker in self.markers.drain(..) {
            if let Some(listener) = self.listener_by_marker.remove(&marker) {
                host.detach_listener(marker, listener);
            }
        }
        self.marker_by_listener.clear();
    }

    pub fn contains(&self, marker: M) -> bool {
        self.listener_by_marker.contains_key(&marker)
    }

    pub fn marker_for(&self, listener: ListenerId) -> Option<M> {
        self.marker_by_listener.get(&listener).copied()
    }

    /// Snapshot of the managed markers.
    pub fn list(&self) -> Vec<M> {
        self.markers.clone()
    }

    pub fn as_slice(&self) -> &[M] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
