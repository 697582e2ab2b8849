use canvas::codec::CodecError;
use canvas::doc::{ItemId, Payload};
use canvas::engine::EngineCore;
use canvas::resize::Handle;
use canvas::viewport::Point;
use clap::{Parser, Subcommand};
use cms_canvas::cache::LayoutCache;
use cms_canvas::config::{self, AdminConfig};
use cms_canvas::error::{ConfigError, StoreError};
use cms_canvas::format::LayoutFormat;
use cms_canvas::orgchart::OrgChartFormat;
use cms_canvas::page::PageFormat;
use cms_canvas::session::{EditorSession, LoadSource};
use cms_canvas::store::{HttpLayoutStore, LayoutTarget};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("no item `{id}` in {target}")]
    UnknownItem { id: String, target: LayoutTarget },
    #[error("{target} was not loaded from the backend ({loaded:?}); refusing to overwrite it")]
    NotLoaded { target: LayoutTarget, loaded: LoadSource },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "cms-canvas", about = "Inspect, migrate and edit CMS canvas layouts")]
struct Cli {
    #[arg(long, env = "CMS_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "CMS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "CMS_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<String>,

    #[arg(long, env = "CMS_CONNECT_TIMEOUT_SECS")]
    connect_timeout_secs: Option<String>,

    #[arg(long, env = "CMS_LAYOUT_CACHE_DIR")]
    cache_dir: Option<String>,

    #[arg(long, env = "CMS_LAYOUT_AS_STRING", help = "Save layouts as a JSON-encoded string (true/false)")]
    layout_as_string: Option<String>,

    #[arg(long, global = true, help = "Print the edited layout instead of saving it")]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the items of a layout with their geometry.
    Show { target: LayoutTarget },
    /// Print the layout as it would be saved, with legacy defaults filled in.
    Export { target: LayoutTarget },
    /// Fill in missing geometry and save the layout back.
    Migrate { target: LayoutTarget },
    /// Move an item so its top-left corner lands at `x`,`y`.
    Move {
        target: LayoutTarget,
        item: String,
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
    },
    /// Drag one of an item's resize handles by a pointer delta.
    Resize {
        target: LayoutTarget,
        item: String,
        #[arg(long, default_value = "se")]
        handle: Handle,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dx: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dy: i64,
    },
    /// Bring an item in front of all others.
    Raise { target: LayoutTarget, item: String },
    /// Send an item behind all others.
    Lower { target: LayoutTarget, item: String },
    /// Delete an item from the layout.
    Remove { target: LayoutTarget, item: String },
}

impl Command {
    fn target(&self) -> &LayoutTarget {
        match self {
            Self::Show { target }
            | Self::Export { target }
            | Self::Migrate { target }
            | Self::Move { target, .. }
            | Self::Resize { target, .. }
            | Self::Raise { target, .. }
            | Self::Lower { target, .. }
            | Self::Remove { target, .. } => target,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env: {e}");
        }
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = admin_config(&cli)?;

    match cli.command.target() {
        LayoutTarget::Page(_) => run::<PageFormat>(&config, cli.command, cli.dry_run).await,
        LayoutTarget::OrgChart => run::<OrgChartFormat>(&config, cli.command, cli.dry_run).await,
    }
}

/// Flags win over the environment because clap already folded `env` values in.
fn admin_config(cli: &Cli) -> Result<AdminConfig, ConfigError> {
    AdminConfig::from_lookup(|var| match var {
        config::BASE_URL_VAR => cli.base_url.clone(),
        config::TOKEN_VAR => cli.token.clone(),
        config::REQUEST_TIMEOUT_VAR => cli.request_timeout_secs.clone(),
        config::CONNECT_TIMEOUT_VAR => cli.connect_timeout_secs.clone(),
        config::CACHE_DIR_VAR => cli.cache_dir.clone(),
        config::LAYOUT_AS_STRING_VAR => cli.layout_as_string.clone(),
        _ => None,
    })
}

async fn run<F: LayoutFormat>(config: &AdminConfig, command: Command, dry_run: bool) -> Result<(), CliError> {
    let target = command.target().clone();
    let store = HttpLayoutStore::new(config)?;
    let mut session = EditorSession::<F, _>::new(target.clone(), store);
    if let Some(dir) = &config.cache_dir {
        session = session.with_cache(LayoutCache::new(dir));
    }

    let loaded = session.load().await;
    if loaded != LoadSource::Remote {
        eprintln!("warning: {target} loaded from {loaded:?}");
    }

    match command {
        Command::Show { .. } => {
            print_items(session.engine());
            return Ok(());
        }
        Command::Export { .. } => {
            let layout = F::encode(session.document(), session.extra())?;
            return print_json(&layout);
        }
        Command::Migrate { .. } => {}
        Command::Move { item, x, y, .. } => {
            let id = known_item(&session, &item)?;
            let origin = session.document().get(&id).map(|it| Point::new(it.x(), it.y())).unwrap_or_default();
            session.apply(|e| e.begin_drag(&id, origin));
            session.apply(|e| e.on_pointer_move(Point::new(x, y)));
            session.apply(EngineCore::end_drag);
        }
        Command::Resize { item, handle, dx, dy, .. } => {
            let id = known_item(&session, &item)?;
            let anchor = session.document().get(&id).map(|it| handle.anchor(&it.geometry())).unwrap_or_default();
            session.apply(|e| e.begin_resize(&id, handle, anchor));
            session.apply(|e| e.on_pointer_move(Point::new(anchor.x + dx, anchor.y + dy)));
            session.apply(EngineCore::end_resize);
        }
        Command::Raise { item, .. } => {
            let id = known_item(&session, &item)?;
            session.apply(|e| e.bring_to_front(&id));
        }
        Command::Lower { item, .. } => {
            let id = known_item(&session, &item)?;
            session.apply(|e| e.send_to_back(&id));
        }
        Command::Remove { item, .. } => {
            let id = known_item(&session, &item)?;
            session.apply(|e| e.remove_item(&id));
        }
    }

    if dry_run {
        let layout = F::encode(session.document(), session.extra())?;
        return print_json(&layout);
    }
    if loaded != LoadSource::Remote {
        return Err(CliError::NotLoaded { target, loaded });
    }
    session.save().await?;
    eprintln!("saved {target} ({} items)", session.document().len());
    Ok(())
}

fn known_item<F: LayoutFormat, S>(session: &EditorSession<F, S>, raw: &str) -> Result<ItemId, CliError>
where
    S: cms_canvas::store::LayoutStore,
{
    let id = ItemId::from(raw);
    if session.document().contains(&id) {
        Ok(id)
    } else {
        Err(CliError::UnknownItem { id: raw.to_owned(), target: session.target().clone() })
    }
}

fn print_items<T: Payload>(engine: &EngineCore<T>) {
    println!("{:<38} {:>6} {:>6} {:>6} {:>6} {:>4}  LABEL", "ID", "X", "Y", "W", "H", "Z");
    for item in engine.document() {
        println!(
            "{:<38} {:>6} {:>6} {:>6} {:>6} {:>4}  {}",
            item.id,
            item.x(),
            item.y(),
            item.width(),
            item.height(),
            item.z_index(),
            item.payload.label().unwrap_or("-"),
        );
    }
    let extent = engine.extent();
    println!("canvas {}x{}", extent.width, extent.height);
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
