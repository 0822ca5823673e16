use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use eframe::egui::{self, Context};
use marker_spiderfier::{EventKind, SpiderEvent, Spiderfier, SpiderfyConfig};

use crate::util::short_label;

mod interaction;
mod map;
mod render_utils;
mod ui;
mod view;

use map::{DemoMap, DemoMarkerId};

const EVENT_LOG_CAPACITY: usize = 200;
const LOGGED_EVENTS: [EventKind; 4] = [
    EventKind::Spiderfy,
    EventKind::Unspiderfy,
    EventKind::Click,
    EventKind::MouseEnter,
];

pub struct SpiderfyDemoApp {
    view: MapView,
}

struct MapView {
    map: DemoMap,
    spiderfier: Spiderfier<DemoMap>,
    event_log: Rc<RefCell<VecDeque<String>>>,
    hovered: Option<DemoMarkerId>,
    search: String,
    clusters: usize,
    cluster_size: usize,
    config_error: Option<String>,
}

impl SpiderfyDemoApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: SpiderfyConfig,
        clusters: usize,
        cluster_size: usize,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            view: MapView::new(config, clusters, cluster_size)?,
        })
    }
}

impl eframe::App for SpiderfyDemoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.view.show(ctx);
    }
}

impl MapView {
    fn new(config: SpiderfyConfig, clusters: usize, cluster_size: usize) -> anyhow::Result<Self> {
        let mut view = Self {
            map: DemoMap::generate(clusters, cluster_size),
            spiderfier: Spiderfier::new(config)?,
            event_log: Rc::new(RefCell::new(VecDeque::new())),
            hovered: None,
            search: String::new(),
            clusters,
            cluster_size,
            config_error: None,
        };
        view.subscribe_event_log();
        view.register_markers();
        Ok(view)
    }

    fn register_markers(&mut self) {
        for id in self.map.ids() {
            self.spiderfier.add_marker(&mut self.map, id);
        }
        log::info!(
            "managing {} markers in {} clusters",
            self.spiderfier.markers().len(),
            self.clusters
        );
    }

    fn regenerate(&mut self) {
        self.spiderfier.clear_markers(&mut self.map);
        let (pan, zoom, rect) = (self.map.pan, self.map.zoom, self.map.rect);
        self.map = DemoMap::generate(self.clusters, self.cluster_size);
        self.map.pan = pan;
        self.map.zoom = zoom;
        self.map.rect = rect;
        self.hovered = None;
        for kind in LOGGED_EVENTS {
            self.spiderfier.events().clear(kind);
        }
        self.subscribe_event_log();
        self.register_markers();
    }

    fn subscribe_event_log(&self) {
        let labels = Rc::new(
            self.map
                .markers
                .iter()
                .map(|marker| marker.label.clone())
                .collect::<Vec<_>>(),
        );

        for kind in LOGGED_EVENTS {
            let labels = Rc::clone(&labels);
            let log = Rc::clone(&self.event_log);
            self.spiderfier.events().on(kind, move |event| {
                let label = |id: &DemoMarkerId| {
                    labels
                        .get(id.0)
                        .map(|label| short_label(label).to_owned())
                        .unwrap_or_else(|| format!("#{}", id.0))
                };
                let line = match event {
                    SpiderEvent::Spiderfy {
                        spiderfied,
                        non_nearby,
                    } => format!(
                        "spiderfy: {} fanned out, {} untouched",
                        spiderfied.len(),
                        non_nearby.len()
                    ),
                    SpiderEvent::Unspiderfy {
                        unspiderfied,
                        non_nearby,
                    } => format!(
                        "unspiderfy: {} restored, {} untouched",
                        unspiderfied.len(),
                        non_nearby.len()
                    ),
                    SpiderEvent::Click(id) => format!("click: {}", label(id)),
                    SpiderEvent::MouseOver(id) => format!("mouseover: {}", label(id)),
                    SpiderEvent::MouseEnter(id) => format!("mouseenter: {}", label(id)),
                };

                let mut log = log.borrow_mut();
                log.push_front(line);
                log.truncate(EVENT_LOG_CAPACITY);
            });
        }
    }

    fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_map(ui));
    }
}
