// gridboard: inspect and edit the saved dashboard layout from the command line.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};

use gridboard_app::{load_settings, save_settings, CatalogRegistry, Dashboard, GridboardSettings, JsonFileStore};
use gridboard_core::{DropTarget, DropZoneKind, Rect, StaticGeometry, WidgetRegistry, WidgetWidth, GRID_COLUMNS};
use gridboard_layout::GridMetrics;

/// How long to wait for queued saves before exiting.
const SAVE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "gridboard", version)]
struct Cli {
    /// Layout file to use instead of the configured one.
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the rows of the current layout.
    Show,
    /// List widgets in the catalog and whether they are placed.
    Catalog,
    /// Append a widget from the catalog.
    Add { widget: String },
    /// Remove a widget.
    Delete { widget: String },
    /// Move a widget to a new position.
    Move(MoveArgs),
    /// Set the widths of two adjacent widgets in the same row.
    Resize(ResizeArgs),
    /// Print the drop zones shown while dragging a widget.
    Zones(ZonesArgs),
    /// Write the current settings (with defaults filled in) to the config dir.
    InitSettings,
}

#[derive(Parser, Debug)]
struct MoveArgs {
    widget: String,

    /// Insertion index in the full widget order.
    #[arg(long)]
    index: usize,

    /// Row the widget is dropped into.
    #[arg(long, conflicts_with = "new_row")]
    row: Option<usize>,

    /// Place the widget full-width in a row of its own.
    #[arg(long, default_value_t = false)]
    new_row: bool,
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    left: String,
    right: String,

    /// Columns for the left widget; the right widget gets the rest of the row.
    left_width: u8,
}

#[derive(Parser, Debug)]
struct ZonesArgs {
    /// Widget being dragged.
    dragged: String,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = load_settings();

    if let Command::InitSettings = cli.cmd {
        save_settings(&settings);
        return Ok(());
    }

    let path = cli
        .layout
        .clone()
        .or_else(|| settings.layout_path.clone())
        .or_else(JsonFileStore::default_path)
        .context("cannot determine layout path; pass --layout")?;
    log::info!("using layout {}", path.display());

    let registry = CatalogRegistry::from_settings(&settings);
    let mut dashboard = Dashboard::load(Box::new(JsonFileStore::new(path)), &registry, &settings)?;

    let result = run(cli.cmd, &mut dashboard, &registry, &settings);

    dashboard.flush();
    if !dashboard.wait_for_persistence(SAVE_TIMEOUT) {
        eprintln!("warning: layout save still pending after {}s", SAVE_TIMEOUT.as_secs());
    }
    for notification in dashboard.take_notifications() {
        eprintln!("{notification}");
    }
    result
}

fn run(
    cmd: Command,
    dashboard: &mut Dashboard,
    registry: &CatalogRegistry,
    settings: &GridboardSettings,
) -> anyhow::Result<()> {
    match cmd {
        Command::Show => print_rows(dashboard, registry),
        Command::Catalog => {
            for entry in &settings.catalog {
                let placed = if dashboard.find_widget(&entry.uid).is_some() { "*" } else { " " };
                println!("{placed} {:<20} {}", entry.uid, entry.meta.title);
            }
        }
        Command::Add { widget } => {
            if !registry.contains(&widget) {
                bail!("unknown widget '{widget}'");
            }
            if !dashboard.add_widget(&widget) {
                bail!("'{widget}' is already on the dashboard");
            }
            print_rows(dashboard, registry);
        }
        Command::Delete { widget } => {
            if !dashboard.delete_widget(&widget) {
                bail!("'{widget}' is not on the dashboard");
            }
            print_rows(dashboard, registry);
        }
        Command::Move(args) => {
            let target = match (args.new_row, args.row) {
                (true, _) => DropTarget::new_row(args.index),
                (false, Some(row)) => DropTarget::within_row(args.index, row),
                (false, None) => DropTarget {
                    insert_index: args.index,
                    horizontal_drop: false,
                    target_row: None,
                },
            };
            if !dashboard.move_widget(&args.widget, target) {
                bail!("cannot move '{}'", args.widget);
            }
            print_rows(dashboard, registry);
        }
        Command::Resize(args) => {
            if !dashboard.layout().can_resize(&args.left, &args.right) {
                bail!("'{}' and '{}' are not adjacent in a row", args.left, args.right);
            }
            let left = WidgetWidth::try_from(args.left_width)?;
            let right_columns = GRID_COLUMNS - left.columns();
            let right = WidgetWidth::from_columns(right_columns)
                .with_context(|| format!("no width leaves {right_columns} columns for '{}'", args.right))?;
            if !dashboard.handle_widget_resize(&args.left, &args.right, left, right) {
                bail!("{}/{} is not a valid split", left.columns(), right.columns());
            }
            print_rows(dashboard, registry);
        }
        Command::Zones(args) => {
            let metrics = GridMetrics::from(settings.metrics);
            let rows = dashboard.rows().len() as f32;
            let height = (rows * (metrics.row_height + metrics.gutter) - metrics.gutter).max(0.0);
            let container = Rect::new(0.0, 0.0, args.width, height);
            let geometry = StaticGeometry::with_widgets(container, dashboard.layout().compute_rects(container, &metrics));

            dashboard.handle_drag_start(&args.dragged);
            let started = Instant::now();
            for zone in dashboard.drop_zones(&geometry) {
                let kind = match zone.kind {
                    DropZoneKind::Vertical => "vertical",
                    DropZoneKind::Horizontal => "horizontal",
                };
                println!(
                    "{kind:<10} index={:<2} row={:<4} visible={:<5} at ({:.0}, {:.0}) {:.0}x{:.0}",
                    zone.insert_index,
                    zone.target_row.map_or("-".to_string(), |r| r.to_string()),
                    zone.visible,
                    zone.rect.x,
                    zone.rect.y,
                    zone.rect.width,
                    zone.rect.height,
                );
            }
            dashboard.handle_drag_end();
            log::debug!("drop zones computed in {:?}", started.elapsed());
        }
        Command::InitSettings => save_settings(settings),
    }
    Ok(())
}

fn print_rows(dashboard: &Dashboard, registry: &CatalogRegistry) {
    let rows = dashboard.rows();
    if rows.is_empty() {
        println!("(empty dashboard)");
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .widgets
            .iter()
            .map(|key| {
                let title = registry.lookup(key).map_or_else(|| key.clone(), |meta| meta.title);
                format!("{title} [{}]", dashboard.layout().width_of(key).columns())
            })
            .collect();
        println!("row {i}: {}", cells.join(" | "));
    }
}
