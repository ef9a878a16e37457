mod cli;

use std::path::{Path, PathBuf};

use ascii_snap::ascii::{self, GlyphGrid};
use ascii_snap::client::ScreenshotClient;
use ascii_snap::config::Config;
use ascii_snap::export::{self, ExportOptions};
use ascii_snap::source::Image;
use clap::Parser;
use cli::{Args, Command, ConvertArgs, OutputFormat};

/// Load .env file so ASCII_SNAP_SERVICE_URL / ASCII_SNAP_CHROME can live there.
/// Does not override existing environment variables.
fn load_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
}

fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Load the config file.
/// An explicit --config path must exist; the default path falls back to defaults.
fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load_explicit(path).map_err(|e| e.to_string()),
        None => match Config::load(None) {
            Ok(c) => Ok(c),
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using default settings.", e);
                Ok(Config::default())
            }
        },
    }
}

/// Decode the input and run the conversion pipeline.
fn convert_input(args: &ConvertArgs, config: &Config) -> Result<(GlyphGrid, ExportOptions), String> {
    let options = args
        .ascii_options(&config.ascii)
        .map_err(|e| e.to_string())?;
    let export_options = args
        .export_options(&config.export)
        .map_err(|e| e.to_string())?;

    let image = Image::open(&args.input)
        .map_err(|e| format!("{}: {}", args.input.display(), e))?;
    let grid = ascii::convert(&image, &options).map_err(|e| e.to_string())?;

    log::info!(
        "Converted {}x{} image to {}x{} grid",
        image.width(),
        image.height(),
        grid.width(),
        grid.height()
    );
    Ok((grid, export_options))
}

/// Run the render command: print or save text, ANSI or HTML.
fn run_render(
    args: &ConvertArgs,
    format: Option<OutputFormat>,
    output: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let (grid, export_options) = convert_input(args, config)?;

    let format = OutputFormat::resolve(format, output.is_some(), grid.is_colorized());
    let rendered = match format {
        OutputFormat::Text => grid.to_text(),
        OutputFormat::Ansi => grid.to_ansi(export_options.foreground),
        OutputFormat::Html => export::standalone_html(&grid, &export_options),
        OutputFormat::Fragment => grid.to_html(),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Run the screenshot command: export the grid and capture it as PNG.
fn run_screenshot(
    args: &ConvertArgs,
    output: Option<&Path>,
    service: Option<&str>,
    local: bool,
    config: &Config,
) -> Result<(), String> {
    let (grid, export_options) = convert_input(args, config)?;
    let html = export::standalone_html(&grid, &export_options);

    let dest = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| {
            PathBuf::from(export::export_file_name(Some(args.input.as_path()))).with_extension("png")
        });

    if local {
        return capture_locally(&html, &dest, config);
    }

    // Without a flag or config entry, $ASCII_SNAP_SERVICE_URL or the local default
    let url = service
        .map(str::to_string)
        .or_else(|| config.screenshot.service_url.clone());
    let client = match url {
        Some(url) => ScreenshotClient::new(url),
        None => ScreenshotClient::from_env(),
    }
    .map_err(|e| format!("Failed to create screenshot client: {}", e))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    let path = rt
        .block_on(client.capture_to_file(&html, &dest))
        .map_err(|e| format!("Screenshot via {} failed: {}", client.url(), e))?;

    println!("Saved {}", path.display());
    Ok(())
}

#[cfg(feature = "chrome")]
fn chrome_options(
    chrome: Option<PathBuf>,
    max_dimension: Option<u32>,
    scale: Option<f64>,
    config: &Config,
) -> ascii_snap::screenshot::ChromeOptions {
    let defaults = ascii_snap::screenshot::ChromeOptions::default();
    let shot = &config.screenshot;
    ascii_snap::screenshot::ChromeOptions {
        executable: chrome
            .or_else(|| shot.chrome.clone())
            .or_else(|| defaults.executable.clone()),
        max_dimension: max_dimension
            .or(shot.max_dimension)
            .unwrap_or(defaults.max_dimension),
        device_scale_factor: scale
            .or(shot.device_scale_factor)
            .unwrap_or(defaults.device_scale_factor),
        timeout: shot
            .timeout_secs
            .map(std::time::Duration::from_secs)
            .unwrap_or(defaults.timeout),
        ..defaults
    }
}

#[cfg(feature = "chrome")]
fn capture_locally(html: &str, dest: &Path, config: &Config) -> Result<(), String> {
    use ascii_snap::screenshot::{ChromeRenderer, Renderer};

    let renderer = ChromeRenderer::new(chrome_options(None, None, None, config));
    let capture = renderer.render(html).map_err(|e| e.to_string())?;
    std::fs::write(dest, &capture.png)
        .map_err(|e| format!("Failed to write {}: {}", dest.display(), e))?;
    println!(
        "Saved {} ({}x{})",
        dest.display(),
        capture.width,
        capture.height
    );
    Ok(())
}

#[cfg(not(feature = "chrome"))]
fn capture_locally(_html: &str, _dest: &Path, _config: &Config) -> Result<(), String> {
    Err("ascii-snap was built without the `chrome` feature; use --service instead".to_string())
}

/// Run the screenshot service until Ctrl-C.
#[cfg(feature = "chrome")]
fn run_serve(
    bind: Option<String>,
    chrome: Option<PathBuf>,
    max_dimension: Option<u32>,
    scale: Option<f64>,
    config: &Config,
) -> Result<(), String> {
    use ascii_snap::config::DEFAULT_BIND;
    use ascii_snap::screenshot::{ChromeRenderer, ScreenshotService};
    use std::sync::Arc;

    let bind = bind
        .or_else(|| config.screenshot.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    let options = chrome_options(chrome, max_dimension, scale, config);
    let service = ScreenshotService::new(ChromeRenderer::new(options));

    let server = Arc::new(
        tiny_http::Server::http(&bind).map_err(|e| format!("Failed to bind {}: {}", bind, e))?,
    );
    let stopper = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log::info!("Shutting down");
        stopper.unblock();
    })
    .map_err(|e| format!("Failed to set Ctrl-C handler: {}", e))?;

    println!("Screenshot service listening on http://{}", bind);
    println!("Press Ctrl+C to stop");
    service.serve(&server);
    Ok(())
}

#[cfg(not(feature = "chrome"))]
fn run_serve(
    _bind: Option<String>,
    _chrome: Option<PathBuf>,
    _max_dimension: Option<u32>,
    _scale: Option<f64>,
    _config: &Config,
) -> Result<(), String> {
    Err("ascii-snap was built without the `chrome` feature; serve is unavailable".to_string())
}

fn main() {
    // Load .env file before anything else
    load_env();

    let args = Args::parse();
    init_logging(args.log_level);

    let result = match args.command {
        Command::Config { action } => cli::handle_config_action(action, args.config.as_deref()),
        command => load_config(args.config.as_deref()).and_then(|config| match command {
            Command::Render {
                convert,
                format,
                output,
            } => run_render(&convert, format, output.as_deref(), &config),
            Command::Screenshot {
                convert,
                output,
                service,
                local,
            } => run_screenshot(&convert, output.as_deref(), service.as_deref(), local, &config),
            Command::Serve {
                bind,
                chrome,
                max_dimension,
                scale,
            } => run_serve(bind, chrome, max_dimension, scale, &config),
            Command::Config { .. } => Ok(()),
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
