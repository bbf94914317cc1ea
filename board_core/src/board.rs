use std::sync::mpsc::Sender;

use tracing::{debug, warn};

use board_proto::{Point, ReducerRequest, RowChange, TableUpdate};

use crate::history::{ActionLog, HistoryCache, HistoryError, ViewMode};
use crate::input::{self, DragState, PointerEvent};
use crate::layer::{Layer, LayerMask, RepaintCoalescer};
use crate::raster::PixelSurface;
use crate::render::{self, LayerStack};
use crate::store::EntityStore;

/// Board dimensions and the game the session is attached to.
#[derive(Debug, Clone, Copy)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    pub game: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            game: 1,
        }
    }
}

/// The client session: entity mirror, layered surfaces, repaint
/// bookkeeping, action history, and the drag machine, with the outbound
/// reducer channel as its only tie to the backend.
///
/// Everything runs on the host's event loop. The host polls
/// [`Board::frame_pending`] once per animation frame and calls
/// [`Board::render_frame`] when it returns true.
pub struct Board {
    game: u64,
    store: EntityStore,
    layers: LayerStack,
    repaint: RepaintCoalescer,
    log: ActionLog,
    history: HistoryCache,
    view: ViewMode,
    view_dirty: bool,
    drag: DragState,
    commands: Sender<ReducerRequest>,
}

impl Board {
    pub fn mount(config: BoardConfig, commands: Sender<ReducerRequest>) -> Self {
        Self {
            game: config.game,
            store: EntityStore::default(),
            layers: LayerStack::new(config.width, config.height),
            repaint: RepaintCoalescer::default(),
            log: ActionLog::default(),
            history: HistoryCache::default(),
            view: ViewMode::Live,
            view_dirty: false,
            drag: DragState::default(),
            commands,
        }
    }

    /// Queue the first full paint.
    pub fn start(&mut self) {
        self.repaint.mark_all();
    }

    /// Fold one subscription notification into the mirror and mark the
    /// owning layer dirty. Actions feed the log and the history cache
    /// instead; they change no live pixels.
    pub fn apply(&mut self, update: TableUpdate) {
        match update {
            TableUpdate::Unit(change) => {
                match change {
                    RowChange::Insert(unit) | RowChange::Update(unit) => {
                        self.store.upsert_unit(unit)
                    }
                    RowChange::Delete(id) => self.store.remove_unit(id),
                }
                self.repaint.mark(Layer::Units);
            }
            TableUpdate::Terrain(change) => {
                match change {
                    RowChange::Insert(terrain) | RowChange::Update(terrain) => {
                        self.store.upsert_terrain(terrain)
                    }
                    RowChange::Delete(id) => self.store.remove_terrain(id),
                }
                self.repaint.mark(Layer::Terrain);
            }
            TableUpdate::Underlay(change) => {
                match change {
                    RowChange::Insert(decal) | RowChange::Update(decal) => {
                        self.store.upsert_underlay(decal)
                    }
                    RowChange::Delete(id) => self.store.remove_underlay(id),
                }
                self.repaint.mark(Layer::Underlay);
            }
            TableUpdate::Overlay(change) => {
                match change {
                    RowChange::Insert(decal) | RowChange::Update(decal) => {
                        self.store.upsert_overlay(decal)
                    }
                    RowChange::Delete(id) => self.store.remove_overlay(id),
                }
                self.repaint.mark(Layer::Overlay);
            }
            TableUpdate::Action(action) => {
                if self.history.record_if_present(&action) {
                    debug!(action = action.id, "history.snapshot.recorded");
                }
                debug!(action = action.id, kind = action.kind.as_str(), "action.received");
                self.log.push(action);
            }
        }
    }

    pub fn frame_pending(&self) -> bool {
        self.repaint.frame_pending()
    }

    /// Paint one coalesced frame and return the layers that were painted.
    ///
    /// The pending guard drops before any painting, so a notification
    /// arriving mid-frame queues the next one instead of vanishing. In
    /// live mode only dirty layers repaint; while viewing a snapshot the
    /// live dirty set is left alone to accumulate for the return to live.
    pub fn render_frame(&mut self) -> LayerMask {
        self.repaint.begin_frame();
        let painted = match self.view {
            ViewMode::Live => {
                let dirty = self.repaint.take_dirty();
                for layer in Layer::Z_ORDER {
                    if dirty.contains(layer.mask()) {
                        paint_live(&mut self.layers, &self.store, layer);
                    }
                }
                dirty
            }
            ViewMode::Viewing(id) => {
                if !self.view_dirty {
                    return LayerMask::empty();
                }
                self.view_dirty = false;
                match self.history.lookup(id) {
                    Some(snapshot) => {
                        for layer in Layer::Z_ORDER {
                            self.layers.paint_layer(layer, snapshot);
                        }
                        LayerMask::all()
                    }
                    None => {
                        // Cache entries are never dropped mid-session;
                        // this would mean the view got ahead of it.
                        warn!(action = id, "history.snapshot.missing");
                        LayerMask::empty()
                    }
                }
            }
        };
        if !painted.is_empty() {
            self.layers.recomposite();
        }
        painted
    }

    /// The action-log control surface: `Some(id)` freezes the view on
    /// that action's snapshot, `None` returns to live. An unknown id is
    /// reported and changes nothing.
    pub fn scrub(&mut self, target: Option<u64>) -> Result<(), HistoryError> {
        match target {
            Some(id) => {
                if self.history.lookup(id).is_none() {
                    warn!(action = id, "history.lookup.failed");
                    return Err(HistoryError::UnknownAction(id));
                }
                debug!(action = id, "view.historical");
                self.view = ViewMode::Viewing(id);
                self.view_dirty = true;
                self.repaint.schedule();
                Ok(())
            }
            None => {
                debug!("view.live");
                self.view = ViewMode::Live;
                self.view_dirty = false;
                self.repaint.mark_all();
                Ok(())
            }
        }
    }

    /// Feed one normalized pointer event through the drag machine and
    /// forward whatever it emits. Gestures are suppressed wholesale while
    /// the view is frozen on history.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.view.is_live() {
            return;
        }
        let (next, request) = input::transition(self.drag, event, self.store.units());
        self.drag = next;
        if let Some(request) = request {
            self.send(request);
        }
    }

    /// Forward a reducer request from the surrounding shell (setup forms,
    /// dice, chat) on the same channel the drag machine uses.
    pub fn send(&self, request: ReducerRequest) {
        if let Err(err) = self.commands.send(request) {
            warn!("Failed to queue reducer request: {}", err);
        }
    }

    pub fn unit_at(&self, pos: Point) -> Option<u64> {
        input::hit_unit(self.store.units(), pos).map(|unit| unit.id)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn game(&self) -> u64 {
        self.game
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.log
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    /// Action ids the scrub UI can step through: logged actions that have
    /// a cached snapshot, newest first.
    pub fn snapshot_actions(&self) -> Vec<u64> {
        self.log
            .iter()
            .filter(|action| self.history.lookup(action.id).is_some())
            .map(|action| action.id)
            .collect()
    }

    /// The composited frame as of the last `render_frame`.
    pub fn frame(&self) -> &PixelSurface {
        self.layers.composite()
    }
}

fn paint_live(layers: &mut LayerStack, store: &EntityStore, layer: Layer) {
    match layer {
        Layer::Terrain => render::paint_terrain(layers.surface_mut(layer), store.terrain()),
        Layer::Underlay => render::paint_decals(layers.surface_mut(layer), store.underlays()),
        Layer::Units => render::paint_units(layers.surface_mut(layer), store.units()),
        Layer::Overlay => render::paint_decals(layers.surface_mut(layer), store.overlays()),
    }
}
