use std::collections::HashMap;

use eframe::egui::Pos2;

use crate::config::SpiderfyConfig;
use crate::error::ConfigError;
use crate::events::{EventBus, SpiderEvent};
use crate::geometry::{centroid, circle_points, extract_closest, spiral_points, squared_distance};
use crate::host::{HostEvent, LegStyle, ListenerId, ListenerKind, MapHost, MarkerEventKind};
use crate::proximity::{NearbyPartition, find_nearby};
use crate::registry::MarkerRegistry;

/// Added to a marker's own stack offset to lift it above every other marker
/// and leg while it is spiderfied.
pub const SPIDERFIED_STACK_OFFSET: i32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spiderfying,
    Spiderfied,
    Unspiderfying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    BeginSpiderfy,
    Expand,
    Dismiss,
    BeginUnspiderfy,
    Collapse,
}

impl Phase {
    fn after(self, transition: Transition) -> Option<Self> {
        match (self, transition) {
            (Self::Idle, Transition::BeginSpiderfy) => Some(Self::Spiderfying),
            (Self::Spiderfying, Transition::Expand) => Some(Self::Spiderfied),
            (Self::Spiderfying, Transition::Dismiss) => Some(Self::Idle),
            (Self::Spiderfied, Transition::BeginUnspiderfy) => Some(Self::Unspiderfying),
            (Self::Unspiderfying, Transition::Collapse) => Some(Self::Idle),
            _ => None,
        }
    }
}

/// Decoration a marker carries while it sits on a spiderfied foot.
pub struct SpiderState<H: MapHost> {
    original_position: H::Position,
    original_stack_offset: i32,
    leg: H::Line,
    highlight: Option<ListenerId>,
}

impl<H: MapHost> SpiderState<H> {
    pub fn original_position(&self) -> H::Position {
        self.original_position
    }

    pub fn original_stack_offset(&self) -> i32 {
        self.original_stack_offset
    }

    pub fn leg(&self) -> &H::Line {
        &self.leg
    }

    pub fn highlight_listener(&self) -> Option<ListenerId> {
        self.highlight
    }
}

/// Spiderfy/unspiderfy controller for the markers of one map.
///
/// The host forwards every raw event through [`Spiderfier::handle_event`];
/// observers subscribe on [`Spiderfier::events`]. All operations run to
/// completion synchronously; a call that arrives while another operation owns
/// the phase becomes a no-op.
pub struct Spiderfier<H: MapHost> {
    config: SpiderfyConfig,
    phase: Phase,
    registry: MarkerRegistry<H::Marker>,
    spider_states: HashMap<H::Marker, SpiderState<H>>,
    highlight_owners: HashMap<ListenerId, H::Marker>,
    events: EventBus<H::Marker>,
    next_listener: u64,
}

impl<H> Spiderfier<H>
where
    H: MapHost,
    H::Marker: 'static,
{
    pub fn new(config: SpiderfyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
            registry: MarkerRegistry::new(),
            spider_states: HashMap::new(),
            highlight_owners: HashMap::new(),
            events: EventBus::new(),
            next_listener: 0,
        })
    }

    pub fn config(&self) -> &SpiderfyConfig {
        &self.config
    }

    /// Replaces the configuration. An expanded cluster keeps its layout and
    /// its highlight listeners; hover recolouring uses the new leg colours
    /// right away, but whether feet get highlight listeners at all is decided
    /// again on the next spiderfy.
    pub fn set_config(&mut self, config: SpiderfyConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn events(&self) -> &EventBus<H::Marker> {
        &self.events
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_spiderfied(&self) -> bool {
        self.phase == Phase::Spiderfied
    }

    pub fn markers(&self) -> Vec<H::Marker> {
        self.registry.list()
    }

    pub fn is_managed(&self, marker: H::Marker) -> bool {
        self.registry.contains(marker)
    }

    pub fn spider_state(&self, marker: H::Marker) -> Option<&SpiderState<H>> {
        self.spider_states.get(&marker)
    }

    pub fn add_marker(&mut self, host: &mut H, marker: H::Marker) -> &mut Self {
        if !self.registry.contains(marker) {
            let listener = self.next_listener_id();
            self.registry.add(host, marker, listener);
        }
        self
    }

    pub fn remove_marker(&mut self, host: &mut H, marker: H::Marker) -> &mut Self {
        if self.spider_states.contains_key(&marker) {
            self.unspiderfy(host);
        }
        self.registry.remove(host, marker);
        self
    }

    pub fn clear_markers(&mut self, host: &mut H) -> &mut Self {
        self.unspiderfy(host);
        self.registry.clear(host);
        self
    }

    pub fn handle_event(&mut self, host: &mut H, event: HostEvent) {
        match event {
            HostEvent::BackgroundClick | HostEvent::ZoomChanged => {
                self.unspiderfy(host);
            }
            HostEvent::Marker { listener, kind } => {
                if let Some(marker) = self.registry.marker_for(listener) {
                    self.on_marker_event(host, marker, kind);
                } else if let Some(&marker) = self.highlight_owners.get(&listener) {
                    self.on_highlight_event(host, marker, kind);
                } else {
                    log::trace!("ignoring {kind:?} for detached listener {listener:?}");
                }
            }
        }
    }

    /// Collapses the expanded cluster, if any, back to original positions.
    pub fn unspiderfy(&mut self, host: &mut H) -> &mut Self {
        self.unspiderfy_except(host, None);
        self
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    fn advance(&mut self, transition: Transition) -> bool {
        match self.phase.after(transition) {
            Some(next) => {
                self.phase = next;
                true
            }
            None => {
                log::trace!("{transition:?} ignored while {:?}", self.phase);
                false
            }
        }
    }

    fn on_marker_event(&mut self, host: &mut H, marker: H::Marker, kind: MarkerEventKind) {
        match kind {
            MarkerEventKind::Click => self.on_marker_click(host, marker),
            MarkerEventKind::PointerEnter => self.events.emit(&SpiderEvent::MouseEnter(marker)),
            MarkerEventKind::PointerOver => self.events.emit(&SpiderEvent::MouseOver(marker)),
            MarkerEventKind::PointerLeave => {}
        }
    }

    fn on_highlight_event(&mut self, host: &mut H, marker: H::Marker, kind: MarkerEventKind) {
        let Some(state) = self.spider_states.get(&marker) else {
            return;
        };

        let colors = self.config.leg_colors;
        match kind {
            MarkerEventKind::PointerEnter => host.set_line_color(&state.leg, colors.highlighted),
            MarkerEventKind::PointerLeave => host.set_line_color(&state.leg, colors.usual),
            MarkerEventKind::Click | MarkerEventKind::PointerOver => {}
        }
    }

    fn on_marker_click(&mut self, host: &mut H, marker: H::Marker) {
        if self.spider_states.contains_key(&marker) {
            if !self.config.keep_spiderfied {
                self.unspiderfy_except(host, Some(marker));
            }
            self.events.emit(&SpiderEvent::Click(marker));
            return;
        }

        self.unspiderfy_except(host, None);
        if !self.advance(Transition::BeginSpiderfy) {
            return;
        }

        let partition = find_nearby(
            marker,
            self.registry.as_slice(),
            self.config.nearby_distance,
            |candidate| host.project(host.marker_position(candidate)),
            |candidate| host.is_marker_visible(candidate),
        );

        if partition.nearby.len() < 2 {
            self.advance(Transition::Dismiss);
            self.events.emit(&SpiderEvent::Click(marker));
            return;
        }

        self.spiderfy(host, partition);
    }

    fn foot_points(&self, count: usize, body: Pos2) -> Vec<Pos2> {
        let config = &self.config;
        if count >= config.circle_spiral_switchover {
            let mut points = spiral_points(
                count,
                body,
                config.spiral_length_start,
                config.spiral_foot_separation,
                config.spiral_length_factor,
            );
            points.reverse();
            points
        } else {
            circle_points(
                count,
                body,
                config.circle_start_angle,
                config.circle_foot_separation,
            )
        }
    }

    fn spiderfy(&mut self, host: &mut H, partition: NearbyPartition<H::Marker>) {
        let NearbyPartition {
            nearby: mut remaining,
            non_nearby,
        } = partition;

        let screen_points = remaining
            .iter()
            .map(|member| member.screen_point)
            .collect::<Vec<_>>();
        let Some(body) = centroid(&screen_points) else {
            self.advance(Transition::Dismiss);
            return;
        };

        let feet = self.foot_points(remaining.len(), body);
        let style = LegStyle {
            color: self.config.leg_colors.usual,
            weight: self.config.leg_weight,
            interactive: false,
        };

        let mut spiderfied = Vec::with_capacity(feet.len());
        for foot in feet {
            let Some(member) = extract_closest(&mut remaining, |member| {
                squared_distance(member.screen_point, foot)
            }) else {
                break;
            };

            let marker = member.marker;
            let foot_position = host.unproject(foot);
            let original_position = host.marker_position(marker);
            let original_stack_offset = host.stack_offset(marker);
            let leg = host.add_line(original_position, foot_position, style);

            let highlight = if self.config.leg_colors.highlights() {
                let listener = self.next_listener_id();
                host.attach_listener(marker, listener, ListenerKind::Highlight);
                self.highlight_owners.insert(listener, marker);
                Some(listener)
            } else {
                None
            };

            self.spider_states.insert(
                marker,
                SpiderState {
                    original_position,
                    original_stack_offset,
                    leg,
                    highlight,
                },
            );
            host.set_marker_position(marker, foot_position);
            host.set_stack_offset(
                marker,
                original_stack_offset.saturating_add(SPIDERFIED_STACK_OFFSET),
            );
            spiderfied.push(marker);
        }

        self.advance(Transition::Expand);
        log::debug!(
            "spiderfied {} markers around ({:.1}, {:.1}), {} left in place",
            spiderfied.len(),
            body.x,
            body.y,
            non_nearby.len()
        );
        self.events.emit(&SpiderEvent::Spiderfy {
            spiderfied,
            non_nearby,
        });
    }

    fn unspiderfy_except(&mut self, host: &mut H, keep_in_place: Option<H::Marker>) {
        if !self.advance(Transition::BeginUnspiderfy) {
            return;
        }

        let mut unspiderfied = Vec::new();
        let mut non_nearby = Vec::new();
        for &marker in self.registry.as_slice() {
            let Some(state) = self.spider_states.remove(&marker) else {
                non_nearby.push(marker);
                continue;
            };

            host.remove_line(state.leg);
            if keep_in_place != Some(marker) {
                host.set_marker_position(marker, state.original_position);
            }
            host.set_stack_offset(marker, state.original_stack_offset);
            if let Some(listener) = state.highlight {
                host.detach_listener(marker, listener);
                self.highlight_owners.remove(&listener);
            }
            unspiderfied.push(marker);
        }
        debug_assert!(self.spider_states.is_empty());

        self.advance(Transition::Collapse);
        log::debug!(
            "unspiderfied {} markers, {} untouched",
            unspiderfied.len(),
            non_nearby.len()
        );
        self.events.emit(&SpiderEvent::Unspiderfy {
            unspiderfied,
            non_nearby,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [Phase; 4] = [
        Phase::Idle,
        Phase::Spiderfying,
        Phase::Spiderfied,
        Phase::Unspiderfying,
    ];
    const ALL_TRANSITIONS: [Transition; 5] = [
        Transition::BeginSpiderfy,
        Transition::Expand,
        Transition::Dismiss,
        Transition::BeginUnspiderfy,
        Transition::Collapse,
    ];

    #[test]
    fn happy_path_cycles_back_to_idle() {
        let phase = Phase::Idle;
        let phase = phase.after(Transition::BeginSpiderfy).expect("begin");
        assert_eq!(phase, Phase::Spiderfying);
        let phase = phase.after(Transition::Expand).expect("expand");
        assert_eq!(phase, Phase::Spiderfied);
        let phase = phase.after(Transition::BeginUnspiderfy).expect("collapse");
        assert_eq!(phase, Phase::Unspiderfying);
        assert_eq!(phase.after(Transition::Collapse), Some(Phase::Idle));
    }

    #[test]
    fn single_member_cluster_returns_to_idle() {
        assert_eq!(
            Phase::Spiderfying.after(Transition::Dismiss),
            Some(Phase::Idle)
        );
    }

    #[test]
    fn each_phase_has_only_its_own_exits() {
        for phase in ALL_PHASES {
            let legal = ALL_TRANSITIONS
                .iter()
                .filter(|transition| phase.after(**transition).is_some())
                .count();
            let expected = if phase == Phase::Spiderfying { 2 } else { 1 };
            assert_eq!(legal, expected, "{phase:?}");
        }
    }

    #[test]
    fn busy_phases_reject_new_operations() {
        for phase in [Phase::Spiderfying, Phase::Unspiderfying] {
            assert_eq!(phase.after(Transition::BeginSpiderfy), None);
            assert_eq!(phase.after(Transition::BeginUnspiderfy), None);
        }
        assert_eq!(Phase::Idle.after(Transition::BeginUnspiderfy), None);
        assert_eq!(Phase::Spiderfied.after(Transition::BeginSpiderfy), None);
    }
}
