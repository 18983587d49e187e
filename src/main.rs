use std::env;
use std::error::Error;

use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use threeaxis::config::{self, Config};
use threeaxis::sensor::{dispatcher::Dispatcher, event::SensorEvent, ThreeAxisSensor};

use crate::cli::{Args, Commands};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    match args.cmd.unwrap_or(Commands::Run) {
        Commands::List => cli::device::handle_list(&config.paths())?,
        Commands::Run => run(config).await?,
    }

    Ok(())
}

/// Bind, configure and activate every configured sensor, then print readings
/// until interrupted.
async fn run(config: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting threeaxis v{}", VERSION);

    let paths = config.paths();
    let mut dispatcher = Dispatcher::new()?;
    let mut printers = Vec::with_capacity(config.sensors.len());

    for sensor_config in config.sensors {
        let watcher = dispatcher.watcher()?;
        let mut sensor = ThreeAxisSensor::with_device(&sensor_config.name, paths.clone(), watcher);
        if !sensor.is_available() {
            log::warn!(
                "Sensor {} ({}) is not available",
                sensor_config.label,
                sensor_config.name
            );
        }

        let rx = sensor.subscribe();
        printers.push(spawn_printer(sensor_config.label.clone(), rx));

        // Failures are logged by the sensor and leave it in its previous state
        if let Some(interval) = sensor_config.poll_interval {
            let _ = sensor.set_poll_interval(interval);
        }
        if let Some(position) = sensor_config.position {
            let _ = sensor.set_position(position);
        }
        let _ = sensor.set_active(true);

        dispatcher.add(sensor);
    }

    // Setup CTRL+C handler
    let waker = dispatcher.waker();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for shutdown signal: {e}");
            return;
        }
        log::info!("Shutting down");
        if let Err(e) = waker.wake() {
            log::error!("Unable to stop dispatcher: {e}");
        }
    });

    // Sensors are dropped (and disabled) when the dispatcher returns
    let dispatch_task = tokio::task::spawn_blocking(move || dispatcher.run());
    match dispatch_task.await? {
        Ok(_) => log::info!("The dispatcher has exited"),
        Err(e) => {
            log::error!("Error in dispatcher: {e}");
            return Err(Box::new(e));
        }
    }

    for printer in printers {
        printer.await?;
    }

    log::info!("threeaxis stopped");

    Ok(())
}

fn spawn_printer(label: String, mut rx: UnboundedReceiver<SensorEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SensorEvent::ReadingsChanged(data) => {
                    println!("{label}:\tx: {}\ty: {}\tz: {}", data.x, data.y, data.z);
                }
                event => log::debug!("{label}: {event:?}"),
            }
        }
    })
}
