use std::path::{Path, PathBuf};

use catalog::{Catalog, GroupId};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{ViewMode, Viewer, ViewerConfig, ViewerEvent};

mod serve;
mod session;

#[derive(Parser, Debug)]
#[command(author, version, about = "Supernova host sky viewer driver")]
struct Args {
    /// Catalog JSON with a `records` array
    #[arg(long, env = "SKYVIEW_CATALOG", default_value = "data.json")]
    catalog: PathBuf,

    /// Viewer config override (JSON; missing fields keep their defaults)
    #[arg(long, env = "SKYVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog content id and the supernova listing
    Summary,

    /// Build the Focus view for one supernova and print its panel
    Focus {
        /// Supernova id; defaults to the first group in the catalog
        cid: Option<String>,
    },

    /// Replay a JSON input session and print the final view state
    Replay {
        session: PathBuf,

        /// Frame step used between session steps
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Seed for the Sky keep filter; entropy when absent
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Serve the static front-end directory over HTTP
    Serve {
        /// Directory holding index.html, data and assets
        #[arg(long, env = "SKYVIEW_ROOT", default_value = ".")]
        root: PathBuf,

        #[arg(long, env = "SKYVIEW_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "SKYVIEW_PORT", default_value_t = 8004)]
        port: u16,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Summary => cmd_summary(&args.catalog),
        Command::Focus { cid } => cmd_focus(&args.catalog, config, cid),
        Command::Replay {
            session,
            frame_ms,
            seed,
        } => cmd_replay(&args.catalog, config, &session, frame_ms, seed),
        Command::Serve { root, host, port } => serve::run(&root, &host, port),
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, String> {
    match path {
        Some(p) => ViewerConfig::load(p).map_err(|e| e.to_string()),
        None => Ok(ViewerConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<Catalog, String> {
    let (catalog, content_id) = Catalog::load(path).map_err(|e| e.to_string())?;
    info!(
        path = %path.display(),
        records = catalog.len(),
        groups = catalog.groups().len(),
        blake3 = %content_id,
        "catalog loaded"
    );
    eprintln!("catalog {} (blake3={content_id})", path.display());
    Ok(catalog)
}

fn cmd_summary(path: &Path) -> Result<(), String> {
    let catalog = load_catalog(path)?;
    let positioned = catalog.records().iter().filter(|r| r.position.is_some()).count();
    println!("records: {} ({positioned} with coordinates)", catalog.len());
    println!("supernovae: {}", catalog.groups().len());
    for entry in catalog.listing() {
        println!("  {entry}");
    }
    Ok(())
}

fn cmd_focus(path: &Path, config: ViewerConfig, cid: Option<String>) -> Result<(), String> {
    let catalog = load_catalog(path)?;
    let mut viewer = Viewer::new(catalog, config).map_err(|e| e.to_string())?;
    let event = match cid {
        Some(cid) => ViewerEvent::SelectGroup(GroupId::new(cid)),
        None => ViewerEvent::SetMode(ViewMode::Focus),
    };
    viewer.handle(event).map_err(|e| e.to_string())?;

    println!("{}", viewer.panel().meta);
    if let Some(url) = &viewer.panel().cutout {
        println!("cutout: {url}");
    }
    if let Some(focus) = viewer.scene().as_focus() {
        for link in &focus.links {
            let id = viewer
                .catalog()
                .record(link.record)
                .and_then(|r| r.object_id.clone())
                .unwrap_or_else(|| format!("#{}", link.record));
            match link.distance_mpc {
                Some(mpc) => println!("  host {id}: {mpc:.3} Mpc"),
                None => println!("  host {id}: distance unknown"),
            }
        }
    }
    Ok(())
}

fn cmd_replay(
    path: &Path,
    config: ViewerConfig,
    session_path: &Path,
    frame_ms: u64,
    seed: Option<u64>,
) -> Result<(), String> {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let json = std::fs::read_to_string(session_path)
        .map_err(|e| format!("{}: {e}", session_path.display()))?;
    let steps = session::parse_session(&json)?;

    let catalog = load_catalog(path)?;
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut viewer = Viewer::with_rng(catalog, config, rng).map_err(|e| e.to_string())?;
    let summary = session::replay(&mut viewer, &steps, frame_ms)?;
    info!(
        steps = summary.steps,
        rejected = summary.rejected,
        frames = summary.frames,
        "session replayed"
    );

    println!("mode: {}", viewer.mode());
    println!("time: {} ms", viewer.now().0);
    if let Some(group) = viewer.selected_group() {
        println!("selected: {group}");
    }
    println!("look: {}", viewer.panel().look_label);
    match viewer.tooltip() {
        Some(t) => println!("tooltip: {} @ ({:.0}, {:.0})", t.text, t.left_px, t.top_px),
        None => println!("tooltip: hidden"),
    }
    if let Some(url) = &viewer.panel().cutout {
        println!("cutout: {url}");
    }
    println!("---\n{}", viewer.panel().meta);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_catalog, load_config};
    use std::io::Write;

    #[test]
    fn loads_catalog_and_config_from_files() {
        let mut catalog = tempfile::NamedTempFile::new().expect("tempfile");
        write!(catalog, r#"{{"records": [{{"cid": "SN1", "ra": 1.0, "dec": 2.0}}]}}"#).expect("write");
        let c = load_catalog(catalog.path()).expect("catalog");
        assert_eq!(c.len(), 1);

        let mut cfg = tempfile::NamedTempFile::new().expect("tempfile");
        write!(cfg, r#"{{"hover_delay_ms": 10}}"#).expect("write");
        assert_eq!(load_config(Some(cfg.path())).expect("config").hover_delay_ms, 10);
        assert_eq!(load_config(None).expect("config").hover_delay_ms, 2000);
    }

    #[test]
    fn missing_catalog_is_an_error_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_catalog(&dir.path().join("none.json")).err().expect("error");
        assert!(err.contains("catalog read error"));
    }
}
