//! Weather Map - city weather lookup on a terminal tile map

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};
use weathermap::action::Action;
use weathermap::api::{OpenWeatherClient, TileClient, WeatherProvider};
use weathermap::components::{AlertModal, AlertModalProps, AppView, AppViewProps, Component};
use weathermap::config::{AppConfig, Args};
use weathermap::effect::{Effect, load_tile, lookup_weather};
use weathermap::logging;
use weathermap::reducer::reducer;
use weathermap::state::{AppState, LOADING_ANIM_TICK_MS};

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum MapComponentId {
    Main,
    Alert,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum MapContext {
    Main,
    Alert,
}

impl EventRoutingState<MapComponentId, MapContext> for AppState {
    fn focused(&self) -> Option<MapComponentId> {
        if self.alert.is_some() {
            Some(MapComponentId::Alert)
        } else {
            Some(MapComponentId::Main)
        }
    }

    fn modal(&self) -> Option<MapComponentId> {
        if self.alert.is_some() {
            Some(MapComponentId::Alert)
        } else {
            None
        }
    }

    fn binding_context(&self, id: MapComponentId) -> MapContext {
        match id {
            MapComponentId::Main => MapContext::Main,
            MapComponentId::Alert => MapContext::Alert,
        }
    }

    fn default_context(&self) -> MapContext {
        MapContext::Main
    }
}

/// Network clients shared by every spawned effect.
#[derive(Clone)]
struct Services {
    weather: Arc<dyn WeatherProvider>,
    tiles: TileClient,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = AppConfig::from_args(&args).map_err(io::Error::other)?;
    logging::init(config.log_file.as_deref())?;

    if config.api_key.is_none() {
        tracing::warn!("no API key configured; every lookup will fail");
    }

    let services = Services {
        weather: Arc::new(
            OpenWeatherClient::new(config.api_key.clone())
                .with_endpoint(config.weather_endpoint.clone()),
        ),
        tiles: TileClient::new(config.tile_source.clone()).map_err(io::Error::other)?,
    };

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!(tiles = config.tile_source.template(), "weathermap started");
    let attribution = config.tile_source.attribution().to_string();
    let result = run_app(
        &mut terminal,
        &debug,
        store,
        replay_actions,
        services,
        attribution,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct MapUi {
    view: AppView,
    alert: AlertModal,
}

impl MapUi {
    fn new(attribution: String) -> Self {
        Self {
            view: AppView::with_attribution(attribution),
            alert: AlertModal::default(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<MapComponentId>,
    ) {
        event_ctx.set_component_area(MapComponentId::Main, area);

        let props = AppViewProps {
            state,
            is_focused: render_ctx.is_focused() && state.alert.is_none(),
        };
        self.view.render(frame, area, props);

        if let Some(message) = state.alert.as_deref() {
            event_ctx.set_component_area(MapComponentId::Alert, AlertModal::area(area));
            let props = AlertModalProps {
                message,
                is_focused: render_ctx.is_focused(),
            };
            self.alert.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&MapComponentId::Alert);
        }
    }

    fn handle_main_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = AppViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.view.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_alert_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(message) = state.alert.as_deref() else {
            return HandlerResponse::ignored();
        };
        let props = AlertModalProps {
            message,
            is_focused: true,
        };
        let actions: Vec<_> = self.alert.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Services,
    attribution: String,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(MapUi::new(attribution)));
    let mut bus: EventBus<AppState, Action, MapComponentId, MapContext> = EventBus::new();
    let keybindings: Keybindings<MapContext> = Keybindings::new();

    let ui_main = Rc::clone(&ui);
    bus.register(MapComponentId::Main, move |event, state| {
        ui_main.borrow_mut().handle_main_event(&event.kind, state)
    });

    let ui_alert = Rc::clone(&ui);
    bus.register(MapComponentId::Alert, move |event, state| {
        ui_alert.borrow_mut().handle_alert_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::MapRefreshTiles),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &services),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match effect {
        Effect::LookupWeather { seq, city } => {
            let provider = Arc::clone(&services.weather);
            // One key per lookup; stale answers are dropped by the reducer
            ctx.tasks().spawn(
                format!("lookup-{seq}"),
                lookup_weather(provider, seq, city),
            );
        }
        Effect::LoadTile { key } => {
            let client = services.tiles.clone();
            ctx.tasks()
                .spawn(format!("tile-{}", key.coord()), load_tile(client, key));
        }
    }
}
