use clap::{ArgAction, Parser};
use maskstudio::app::{App, ExportReport};
use maskstudio::config::Config;
use maskstudio::script::Script;
use std::path::PathBuf;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MASKSTUDIO_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "maskstudio")]
#[command(version = VERSION, about = "Freehand mask annotation for image sequences")]
struct Cli {
    /// Replay a JSON event script headlessly
    #[arg(long, short = 's', value_name = "PATH")]
    script: Option<PathBuf>,

    /// Directory exported archives are written to (overrides config)
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write a PNG of the final view after the script finishes
    #[arg(long, value_name = "PATH", requires = "script")]
    preview: Option<PathBuf>,

    /// Preview size in pixels, e.g. 800x600 (defaults to the zoomed image size)
    #[arg(long, value_name = "WxH", requires = "preview", value_parser = parse_size)]
    preview_size: Option<(u32, u32)>,

    /// Print the default configuration as TOML
    #[arg(long, action = ArgAction::SetTrue)]
    dump_config: bool,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| format!("invalid dimension '{part}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.dump_config {
        print!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    let Some(script_path) = cli.script else {
        // No flags: show usage
        println!("maskstudio: Freehand mask annotation for image sequences");
        println!();
        println!("Usage:");
        println!("  maskstudio --script run.json              Replay an event script");
        println!("  maskstudio --script run.json -o out/      Export archives into out/");
        println!("  maskstudio --script run.json --preview view.png");
        println!("  maskstudio --dump-config                  Print default configuration");
        println!("  maskstudio --help                         Show help");
        println!();
        println!("Configuration is read from ~/.config/maskstudio/config.toml");
        return Ok(());
    };

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        Config::default()
    });

    let script = Script::load(&script_path)?;
    let mut app = App::new(&config, cli.output_dir)?;
    let report = app.run_script(&script)?;

    println!("Replayed {} step(s): {}", report.steps, report.status);
    for (name, reason) in &report.failures {
        eprintln!("Could not load {name}: {reason}");
    }
    for export in &report.exports {
        match export {
            ExportReport::Saved {
                path,
                images,
                masks,
            } => {
                let location = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "memory".to_string());
                println!("Saved archive {location} ({images} image(s), {masks} mask(s))");
            }
            ExportReport::Failed(message) => eprintln!("Export failed: {message}"),
        }
    }

    if let Some(preview) = cli.preview
        && app.write_preview(&preview, cli.preview_size)?
    {
        println!("Preview written to {}", preview.display());
    }

    let failed = report.failed_exports();
    if failed > 0 {
        return Err(anyhow::anyhow!("{failed} export(s) failed"));
    }
    Ok(())
}
