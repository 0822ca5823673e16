use std::fmt::Debug;
use std::hash::Hash;

use eframe::egui::{Color32, Pos2};

/// Token the spiderfier hands to the host when it subscribes to a marker.
///
/// The host echoes it back in [`HostEvent::Marker`] so the event can be routed
/// to whichever side table owns the subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Registry subscription: clicks and hover passthroughs.
    Interaction,
    /// Leg recolouring while a marker is spiderfied.
    Highlight,
}

impl ListenerKind {
    pub fn accepts(self, kind: MarkerEventKind) -> bool {
        match self {
            Self::Interaction => matches!(
                kind,
                MarkerEventKind::Click
                    | MarkerEventKind::PointerEnter
                    | MarkerEventKind::PointerOver
            ),
            Self::Highlight => matches!(
                kind,
                MarkerEventKind::PointerEnter | MarkerEventKind::PointerLeave
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerEventKind {
    Click,
    PointerEnter,
    PointerOver,
    PointerLeave,
}

/// Raw input the host forwards to [`crate::Spiderfier::handle_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Marker {
        listener: ListenerId,
        kind: MarkerEventKind,
    },
    BackgroundClick,
    ZoomChanged,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegStyle {
    pub color: Color32,
    pub weight: f32,
    pub interactive: bool,
}

/// The map surface markers live on.
///
/// Positions are in whatever geographic space the host uses; the spiderfier
/// only moves them through `project`/`unproject` and stores them verbatim.
pub trait MapHost {
    type Marker: Copy + Eq + Hash + Debug;
    type Position: Copy + PartialEq + Debug;
    type Line;

    fn project(&self, position: Self::Position) -> Pos2;
    fn unproject(&self, point: Pos2) -> Self::Position;

    fn add_line(
        &mut self,
        from: Self::Position,
        to: Self::Position,
        style: LegStyle,
    ) -> Self::Line;
    fn set_line_color(&mut self, line: &Self::Line, color: Color32);
    fn remove_line(&mut self, line: Self::Line);

    fn marker_position(&self, marker: Self::Marker) -> Self::Position;
    fn set_marker_position(&mut self, marker: Self::Marker, position: Self::Position);
    fn stack_offset(&self, marker: Self::Marker) -> i32;
    fn set_stack_offset(&mut self, marker: Self::Marker, offset: i32);
    /// Whether the marker is attached to the currently rendered view.
    fn is_marker_visible(&self, marker: Self::Marker) -> bool;

    fn attach_listener(&mut self, marker: Self::Marker, listener: ListenerId, kind: ListenerKind);
    fn detach_listener(&mut self, marker: Self::Marker, listener: ListenerId);
}
