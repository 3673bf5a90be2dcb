#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use photo_date_browser::app::watcher::DirectoryWatcher;
use photo_date_browser::app::{self, events::UserEvent, proxy::EventProxy, state::AppState};
use photo_date_browser::config::AppConfig;
use std::sync::{Arc, Mutex};
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use tracing_subscriber::EnvFilter;
use wry::WebViewBuilder;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    let config = AppConfig::default();
    let (width, height) = config.window_size;
    let (pos_x, pos_y) = config.window_position;
    let (min_width, min_height) = config.min_window_size;

    let window = WindowBuilder::new()
        .with_title(&config.window_title)
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_position(tao::dpi::LogicalPosition::new(pos_x, pos_y))
        .with_min_inner_size(tao::dpi::LogicalSize::new(min_width, min_height))
        .build(&event_loop)
        .context("Failed to build window")?;

    #[cfg(target_os = "macos")]
    photo_date_browser::platform::macos::ensure_main_menu();

    let proxy = event_loop.create_proxy();
    let watch_filesystem = config.watch_filesystem;
    let state = Arc::new(Mutex::new(AppState::new(config)));

    if watch_filesystem {
        let watch_proxy = proxy.clone();
        match DirectoryWatcher::new(move |paths| {
            EventProxy::send_event(&watch_proxy, UserEvent::FilesystemChanged(paths));
        }) {
            Ok(watcher) => app::helpers::lock_state(&state).watcher = Some(watcher),
            Err(e) => tracing::warn!("Live updates disabled: {}", e),
        }
    }

    let ipc_state = state.clone();
    let ipc_proxy = proxy.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(message, ipc_proxy.clone(), ipc_state.clone());
    };

    let webview = WebViewBuilder::new(&window)
        .with_html(include_str!("ui/index.html"))
        .with_devtools(cfg!(debug_assertions))
        .with_ipc_handler(ipc_handler)
        .build()
        .context("Failed to build WebView")?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                tracing::info!("Close requested.");
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(UserEvent::FilesystemChanged(paths)) => {
                app::commands::filesystem_changed(paths, proxy.clone(), state.clone());
            }
            Event::UserEvent(user_event) => {
                app::handle_user_event(user_event, &webview);
            }
            _ => (),
        }
    });
}
