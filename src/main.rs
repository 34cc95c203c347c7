use midiplay::app::AppStartupOptions;
use midiplay::locale::Locale;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Default)]
struct CliArgs {
    locale: Option<Locale>,
    port: Option<String>,
    log_level: Option<String>,
    fresh: bool,
    paths: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    init_logging(args.log_level.as_deref().unwrap_or("warn"));

    midiplay::app::run(AppStartupOptions {
        locale: args.locale,
        midi_port: args.port,
        fresh: args.fresh,
        paths: args.paths,
    })
}

/// `RUST_LOG` wins over `--log-level`. Output goes to stderr so it stays
/// out of the command shell.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--locale" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--locale requires a language tag");
                };
                out.locale = Some(value.parse()?);
            }
            "--port" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--port requires a MIDI port name");
                };
                if value.trim().is_empty() {
                    anyhow::bail!("--port cannot be empty");
                }
                out.port = Some(value.trim().to_string());
            }
            "--log-level" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--log-level requires a level");
                };
                out.log_level = Some(value.trim().to_string());
            }
            "--fresh" => out.fresh = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with("--") => anyhow::bail!("unknown argument {other}"),
            path => out.paths.push(PathBuf::from(path)),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("midiplay [options] [paths...]");
    println!("  --locale <tag>       Interface language (en, de, fr)");
    println!("  --port <name>        MIDI output port to connect to");
    println!("  --log-level <level>  Log filter when RUST_LOG is unset (default warn)");
    println!("  --fresh              Ignore the saved session");
    println!("  paths                MIDI files or folders to add");
}
