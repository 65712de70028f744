/// Example program that opens the configured main window on winit
///
/// Run with: cargo run -p rune-app --example open_window -- [launch args]

use anyhow::Result;
use rune_app::{
    create_native_window, ActivationState, AppBuilder, AppContext, Application, CreatedWindow,
    OpenWindowRequest, RuneConfig,
};
use rune_window::{WindowAttributes, WinitWindowFactory};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;

/// Titles its window from `[window]` config, plus any launch arguments.
struct Viewer {
    context: AppContext,
}

impl Application for Viewer {
    fn context(&self) -> Option<&AppContext> {
        Some(&self.context)
    }

    fn create_window(&mut self, activation: &ActivationState) -> WindowAttributes {
        let window = &activation.context.app().config().window;
        let title = match &activation.launch_args {
            Some(args) => format!("{} {args}", window.title),
            None => window.title.clone(),
        };
        WindowAttributes::new(title).with_size(window.width, window.height)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let request = if args.is_empty() {
        OpenWindowRequest::default()
    } else {
        OpenWindowRequest::launch(args.join(" "))
    };

    let context = AppBuilder::new()
        .with_config(RuneConfig::load())
        .configure_lifecycle_events(|hooks| {
            hooks.on_window_created(|window| info!(title = %window.title(), "window created"));
        })
        .build()?
        .into_context();
    let mut viewer = Viewer { context };

    let event_loop = EventLoop::new()?;
    let mut request = Some(request);
    let mut windows: Vec<CreatedWindow> = Vec::new();

    event_loop.run(move |event, elwt| match event {
        Event::Resumed => {
            // Resumed can repeat on some platforms; open the window once
            let Some(request) = request.take() else { return };
            let mut factory = WinitWindowFactory::new(elwt);
            match create_native_window(&mut viewer, &mut factory, request) {
                Ok(Some(created)) => windows.push(created),
                Ok(None) => elwt.exit(),
                Err(e) => {
                    error!(error = %e, "failed to open window");
                    elwt.exit();
                }
            }
        }
        Event::WindowEvent {
            window_id,
            event: WindowEvent::CloseRequested,
        } => {
            windows.retain(|created| created.window.id() != u64::from(window_id));
            if windows.is_empty() {
                elwt.exit();
            }
        }
        _ => {}
    })?;

    Ok(())
}
