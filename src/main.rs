use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::info;

use air_quality_console::{
    config::Config,
    logging,
    services::{
        api_client::{Backend, HttpBackend},
        controller::{Key, KeyEvent, UiController},
        view_model::{Focus, ViewHandle},
    },
    terminal::{
        commands::{Command, HELP, parse_command},
        render::Renderer,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("reading configuration")?;
    let backend = HttpBackend::new(&config.backend_url, config.request_timeout)
        .context("building the backend client")?;
    info!(backend = %backend.base_url(), locale = ?config.locale, "starting air quality console");

    let controller = UiController::new(backend, config.locale);
    let (stop_render, render_stopped) = oneshot::channel();
    let render_task = tokio::spawn(render_loop(controller.view().clone(), render_stopped));

    let mut in_flight = JoinSet::new();
    {
        let controller = controller.clone();
        in_flight.spawn(async move { controller.check_system_health().await });
    }
    let hint = controller.schedule_sample_queries(config.sample_delay);

    println!("🌍 Air Quality Monitor ({}), type /help for commands", config.backend_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => dispatch(&controller, &mut in_flight, command).await,
            Err(e) => eprintln!("{e}"),
        }
    }

    // Let pending submissions settle so their replies still get printed.
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "submission task failed");
        }
    }
    hint.abort();

    let _ = stop_render.send(());
    render_task.await.context("render task")?;
    Ok(())
}

/// Submissions run as independent tasks; responses land in arrival order.
async fn dispatch<B: Backend + 'static>(
    controller: &UiController<B>,
    in_flight: &mut JoinSet<()>,
    command: Command,
) {
    match command {
        Command::Send(text) => {
            controller.set_input(text);
            if let Some(pending) = controller.begin_send() {
                let controller = controller.clone();
                in_flight.spawn(async move {
                    controller.complete_send(pending).await;
                });
            }
        }
        Command::Predict(fields) => {
            for (id, value) in fields {
                if let Err(e) = controller.set_form_field(&id, value) {
                    eprintln!("{e}");
                    return;
                }
            }
            let pending = controller.begin_prediction();
            let controller = controller.clone();
            in_flight.spawn(async move {
                controller.complete_prediction(pending).await;
            });
        }
        Command::Stats(query) => {
            let pending = controller.begin_statistics(query);
            let controller = controller.clone();
            in_flight.spawn(async move {
                controller.complete_statistics(pending).await;
            });
        }
        Command::Clear => {
            controller
                .handle_key(KeyEvent {
                    key: Key::Escape,
                    ctrl: false,
                    focus: Focus::Input,
                })
                .await;
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

/// Prints view changes until `stop` fires, then flushes whatever is left.
async fn render_loop(view: ViewHandle, mut stop: oneshot::Receiver<()>) {
    let mut revisions = view.subscribe();
    let mut renderer = Renderer::default();
    loop {
        for line in view.read(|vm| renderer.drain(vm)) {
            println!("{line}");
        }
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut stop => break,
        }
    }
    for line in view.read(|vm| renderer.drain(vm)) {
        println!("{line}");
    }
}
