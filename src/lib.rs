//! Declutters overlapping point markers on an interactive 2-D map.
//!
//! Markers that sit within a few pixels of each other cannot be clicked
//! individually. [`Spiderfier`] detects such clusters when one of them is
//! clicked and fans the members out into a circle or spiral, each tied to its
//! original position by a leg. The next interaction collapses the cluster.
//!
//! Rendering, projection and gesture capture belong to the host map, which
//! implements [`MapHost`] and forwards raw events through
//! [`Spiderfier::handle_event`].

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod proximity;
pub mod registry;
pub mod spiderfier;

pub use config::{LegColors, SpiderfyConfig, SpiderfyOptions};
pub use error::ConfigError;
pub use events::{EventBus, EventKind, HandlerId, SpiderEvent};
pub use host::{HostEvent, LegStyle, ListenerId, ListenerKind, MapHost, MarkerEventKind};
pub use spiderfier::{Phase, SpiderState, Spiderfier};
