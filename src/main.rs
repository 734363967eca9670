use lv2_ui_bridge::prelude::*;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: lv2-ui-bridge <plugin-uri> <ui-uri> \
[<input-pipe> <output-pipe> <window-title> <transient-window-id>]";

/// argv length (program name included) that selects live mode.
const LIVE_ARGC: usize = 7;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = BridgeConfig::from_env();
    let (plugin_uri, ui_uri) = (&args[1], &args[2]);

    let manifest = JsonManifest::load(&config.manifest_path)?.lookup(plugin_uri, ui_uri)?;

    let mut options = UiOptions::with_sample_rate(config.sample_rate);
    let live = args.len() == LIVE_ARGC;
    let channel: Option<Box<dyn Channel>> = if live {
        options.window_title = args[5].clone();
        options.transient_window_id = args[6].parse().unwrap_or_else(|_| {
            log::warn!("Ignoring transient window id {:?}", args[6]);
            0
        });
        Some(Box::new(PipeChannel::open(
            Path::new(&args[3]),
            Path::new(&args[4]),
        )?))
    } else {
        log::info!(
            "No host pipes given, running {} idle cycles",
            config.smoke_cycles
        );
        None
    };

    let mut bridge =
        BridgeController::new(manifest, options, channel, Box::new(HeadlessToolkit::default()));

    if let Err(e) = bridge.init(&LibraryLoader) {
        bridge.shutdown();
        return Err(e);
    }

    let mut cycles = 0u32;
    while bridge.idle() {
        if !live {
            cycles += 1;
            if cycles >= config.smoke_cycles {
                break;
            }
        }
        std::thread::sleep(config.idle_interval);
    }

    bridge.shutdown();
    Ok(())
}
