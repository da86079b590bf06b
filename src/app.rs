use std::time::Instant;

use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::loader::{Loaded, Loader};
use crate::map::Viewport;
use crate::router::{Dispatch, Route, Router};
use crate::ui::{self, Screen};
use crate::views::View;

/// What the body of the screen currently shows
pub enum ViewState {
    /// Unknown route: nothing is drawn
    Blank { hash: String },
    Loading { route: Route, since: Instant },
    Ready { route: Route, view: View },
    Failed { route: Route, error: DashboardError },
}

impl ViewState {
    pub fn route(&self) -> Option<&Route> {
        match self {
            ViewState::Blank { .. } => None,
            ViewState::Loading { route, .. } | ViewState::Ready { route, .. } | ViewState::Failed { route, .. } => {
                Some(route)
            }
        }
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            ViewState::Ready { view, .. } => Some(view),
            _ => None,
        }
    }
}

/// Application state
pub struct App {
    pub router: Router,
    pub state: ViewState,
    /// Map viewport, kept across navigations
    pub viewport: Viewport,
    pub screen: Screen,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for hover
    pub mouse_pos: Option<(u16, u16)>,
    /// Set once a press turns into a drag, so release does not count as a click
    dragged: bool,
    /// Route being typed after ':'
    pub prompt: Option<String>,
    pub show_borders: bool,
    loader: Loader,
}

impl App {
    pub fn new(loader: Loader, width: u16, height: u16) -> Self {
        let screen = ui::layout(Rect::new(0, 0, width, height));
        // Braille gives 2x4 resolution per character
        let viewport = Viewport::world(screen.inner.width as usize * 2, screen.inner.height as usize * 4);
        Self {
            router: Router::new(),
            state: ViewState::Blank { hash: String::new() },
            viewport,
            screen,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            dragged: false,
            prompt: None,
            show_borders: true,
            loader,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = ui::layout(Rect::new(0, 0, width, height));
        self.viewport.width = self.screen.inner.width as usize * 2;
        self.viewport.height = self.screen.inner.height as usize * 4;
    }

    pub fn navigate(&mut self, hash: &str) {
        let dispatch = self.router.navigate(hash);
        self.dispatch(dispatch);
    }

    pub fn back(&mut self) {
        match self.router.back() {
            Some(dispatch) => self.dispatch(dispatch),
            None => debug!("no previous route"),
        }
    }

    pub fn reload(&mut self) {
        if let Some(dispatch) = self.router.reload() {
            self.dispatch(dispatch);
        }
    }

    /// Clear the current view and start building the new one
    fn dispatch(&mut self, dispatch: Dispatch) {
        match dispatch.route {
            Some(route) => {
                info!(generation = dispatch.generation, %route, "navigating");
                self.loader.spawn(dispatch.generation, route.clone());
                self.state = ViewState::Loading {
                    route,
                    since: Instant::now(),
                };
            }
            None => {
                warn!(hash = %dispatch.hash, "unknown route");
                self.state = ViewState::Blank { hash: dispatch.hash };
            }
        }
    }

    /// Apply finished loads; returns true when the view changed
    pub fn poll_loads(&mut self) -> bool {
        let mut changed = false;
        while let Some(loaded) = self.loader.try_recv() {
            changed |= self.apply(loaded);
        }
        changed
    }

    /// Results from a superseded navigation are dropped
    pub fn apply(&mut self, loaded: Loaded) -> bool {
        if !self.router.is_current(loaded.generation) {
            debug!(
                generation = loaded.generation,
                current = self.router.generation(),
                route = %loaded.route,
                "discarding stale load"
            );
            return false;
        }
        self.state = match loaded.result {
            Ok(view) => ViewState::Ready {
                route: loaded.route,
                view,
            },
            Err(error) => ViewState::Failed {
                route: loaded.route,
                error,
            },
        };
        true
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn on_map(&self) -> bool {
        matches!(self.state.view(), Some(View::Map(_)))
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        if self.on_map() {
            self.viewport.pan(dx, dy);
        }
    }

    pub fn zoom_in(&mut self) {
        if self.on_map() {
            self.viewport.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.on_map() {
            self.viewport.zoom_out();
        }
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.pixel_at(col, row).filter(|_| self.on_map()) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.pixel_at(col, row).filter(|_| self.on_map()) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
    }

    pub fn toggle_borders(&mut self) {
        self.show_borders = !self.show_borders;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn press(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Pan by the mouse movement since the last event
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            if dx != 0 || dy != 0 {
                self.dragged = true;
            }
            // Scale based on zoom: less sensitive when zoomed out
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    /// Mouse released: a press without a drag is a click
    pub fn release(&mut self, col: u16, row: u16) {
        let clicked = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if clicked {
            self.click(col, row);
        }
    }

    /// Clicking a country on the map opens its chart
    pub fn click(&mut self, col: u16, row: u16) {
        let Some(name) = self.country_at(col, row).map(str::to_string) else {
            return;
        };
        let route = Route::CountryChart { country: name };
        self.navigate(&route.to_hash());
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Braille pixel under a terminal cell, when inside the body
    pub fn pixel_at(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = self.screen.inner;
        if !inner.contains((col, row).into()) {
            return None;
        }
        let px = (col - inner.x) as i32 * 2;
        let py = (row - inner.y) as i32 * 4;
        Some((px, py))
    }

    /// Index of the map country under a terminal cell
    pub fn country_index_at(&self, col: u16, row: u16) -> Option<usize> {
        let Some(View::Map(map)) = self.state.view() else {
            return None;
        };
        let (px, py) = self.pixel_at(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        map.country_at(lon, lat)
    }

    fn country_at(&self, col: u16, row: u16) -> Option<&str> {
        let idx = self.country_index_at(col, row)?;
        match self.state.view() {
            Some(View::Map(map)) => map.name(idx),
            _ => None,
        }
    }

    /// Country under the mouse on the map
    pub fn hovered_country(&self) -> Option<usize> {
        let (col, row) = self.mouse_pos?;
        self.country_index_at(col, row)
    }

    /// Country of the current route, else the one under the mouse
    pub fn focus_country(&self) -> Option<String> {
        if let Some(country) = self.state.route().and_then(Route::country) {
            return Some(country.to_string());
        }
        let (col, row) = self.mouse_pos?;
        self.country_at(col, row).map(str::to_string)
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some("#".to_string());
    }

    pub fn prompt_push(&mut self, ch: char) {
        if let Some(prompt) = &mut self.prompt {
            prompt.push(ch);
        }
    }

    pub fn prompt_pop(&mut self) {
        if let Some(prompt) = &mut self.prompt {
            prompt.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn submit_prompt(&mut self) {
        if let Some(hash) = self.prompt.take() {
            self.navigate(&hash);
        }
    }
}
