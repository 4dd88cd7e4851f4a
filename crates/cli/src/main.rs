use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use frontier::{
    timed, GridCoord, GridSummary, LocalPos, MinimapCompositor, RenderConfig,
    TileGrid, TileRenderer, VisitedGrids,
};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for rendering frontier grids and minimaps to files.
#[derive(Debug, StructOpt)]
#[structopt(name = "frontier")]
struct Opt {
    /// Path to a render config file. Supported formats: JSON, TOML. Any
    /// field left out uses its default.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to a single grid to render. By default this holds a Base64
    /// terrain snapshot; with `--rows` it holds one line of tile codes per
    /// row instead.
    #[structopt(short, long)]
    grid: Option<PathBuf>,

    /// Read `--grid` as rows of tile codes rather than a snapshot
    #[structopt(long)]
    rows: bool,

    /// Encoded 8-digit coordinate of the grid being rendered
    #[structopt(long, default_value = "1000000")]
    coord: i64,

    /// Tile the player stands on within the grid, as `col,row`
    #[structopt(
        long,
        default_value = "32,32",
        parse(try_from_str = parse_tile)
    )]
    player: LocalPos,

    /// Override the zoom level from the config file
    #[structopt(short, long)]
    zoom: Option<f64>,

    /// Size of the rendered view, in pixels
    #[structopt(long, default_value = "800")]
    width: u32,
    #[structopt(long, default_value = "600")]
    height: u32,

    /// Path to a JSON array of grid summaries to build minimaps from
    #[structopt(short, long)]
    settlement: Option<PathBuf>,

    /// Path to a Base64 visited-grids bitset, used with `--settlement`. If
    /// omitted, nothing has been visited.
    #[structopt(long)]
    visited: Option<PathBuf>,

    /// The output files will be written to this directory
    #[structopt(short, long)]
    output: PathBuf,

    /// The format(s) to output in. Supported formats:
    ///
    /// png - Rendered bitmap(s)
    ///
    /// svg - Flat vector rendering of a grid (grid mode only)
    ///
    /// cfg - The full render config that was used, in TOML format
    #[structopt(short = "f", long, default_value = "png")]
    output_formats: Vec<OutputFormat>,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, PartialEq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Rendered bitmap
    Png,
    /// Flat 2D vector rendering
    Svg,
    /// The full render config in a human-readable file
    Cfg,
}

fn parse_tile(value: &str) -> anyhow::Result<LocalPos> {
    let (col, row) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `col,row`, got {:?}", value))?;
    Ok(LocalPos::from_row_col(
        row.trim().parse().context("invalid row")?,
        col.trim().parse().context("invalid col")?,
    ))
}

fn load_config(config_path: &Path) -> anyhow::Result<RenderConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("error reading file {:?}", path))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes)
        .with_context(|| format!("error writing to file {:?}", path))
}

fn save_png(image: &image::RgbaImage, path: &Path) -> anyhow::Result<()> {
    timed!(format!("Writing {:?}", path), {
        image
            .save(path)
            .with_context(|| format!("error writing image {:?}", path))
    })
}

/// Render a single grid around the player in each output format
fn render_grid(
    opt: &Opt,
    grid_path: &Path,
    renderer: &mut TileRenderer,
) -> anyhow::Result<()> {
    let contents = read_file(grid_path)?;
    let grid = if opt.rows {
        TileGrid::parse_rows(contents.lines())
    } else {
        TileGrid::from_snapshot(&contents)
    };
    let coord = GridCoord::parse(opt.coord)
        .ok_or_else(|| anyhow!("invalid grid coordinate {}", opt.coord))?;
    info!("Loaded grid {} from {:?}", coord, grid_path);

    for output_format in &opt.output_formats {
        let path = opt.output.join("grid");
        match output_format {
            OutputFormat::Png => {
                let frame = timed!("Rendering view", log::Level::Info, {
                    renderer.render_view(
                        &grid,
                        coord,
                        opt.player,
                        opt.width,
                        opt.height,
                    )
                });
                save_png(&frame, &path.with_extension("png"))?;
            }
            OutputFormat::Svg => {
                let svg = renderer.render_as_svg(&grid);
                write_file(&path.with_extension("svg"), svg.as_bytes())?;
            }
            OutputFormat::Cfg => {}
        }
    }
    info!(
        "Texture cache: {} textures, {} hits, {} misses",
        renderer.textures().len(),
        renderer.textures().hits(),
        renderer.textures().misses()
    );
    Ok(())
}

/// Render a minimap for every settlement in the summaries, plus the whole
/// frontier
fn render_minimaps(
    opt: &Opt,
    settlement_path: &Path,
    config: &RenderConfig,
) -> anyhow::Result<()> {
    let grids = GridSummary::list_from_json(&read_file(settlement_path)?)?;
    let visited = match &opt.visited {
        Some(path) => VisitedGrids::from_base64(&read_file(path)?)
            .with_context(|| format!("invalid visited grids in {:?}", path))?,
        None => VisitedGrids::new(),
    };
    info!(
        "Loaded {} grids, {} visited",
        grids.len(),
        visited.count()
    );

    if !opt.output_formats.contains(&OutputFormat::Png) {
        warn!("Minimaps are only rendered as png");
        return Ok(());
    }

    let mut compositor = MinimapCompositor::new(config);
    let mut settlements: Vec<LocalPos> =
        grids.iter().map(|grid| grid.coord.settlement()).collect();
    settlements.sort_by_key(|pos| (pos.y, pos.x));
    settlements.dedup();

    let mut labels = Vec::new();
    for settlement in settlements {
        let map =
            compositor.compose_settlement(settlement, &grids, &visited, None);
        let path = opt
            .output
            .join(format!(
                "settlement_{}_{}",
                settlement.row(),
                settlement.col()
            ))
            .with_extension("png");
        save_png(&map.image, &path)?;
        labels.extend(map.labels);
    }
    let labels_json = serde_json::to_string_pretty(&labels)
        .context("error serializing owner labels")?;
    write_file(&opt.output.join("labels.json"), labels_json.as_bytes())?;

    let frontier = compositor.compose_frontier(&grids, &visited, None);
    save_png(&frontier, &opt.output.join("frontier.png"))?;
    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let mut config = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => RenderConfig::default(),
    };
    if let Some(zoom) = opt.zoom {
        config.zoom_scale = zoom;
    }
    let mut renderer =
        TileRenderer::new(config).context("invalid render config")?;

    fs::create_dir_all(&opt.output).with_context(|| {
        format!("error creating output dir {:?}", &opt.output)
    })?;

    match (&opt.grid, &opt.settlement) {
        (Some(grid_path), None) => render_grid(&opt, grid_path, &mut renderer)?,
        (None, Some(settlement_path)) => {
            render_minimaps(&opt, settlement_path, &config)?
        }
        _ => bail!(
            "must pass exactly one of --grid (to render a grid) \
            or --settlement (to render minimaps)"
        ),
    }

    if opt.output_formats.contains(&OutputFormat::Cfg) {
        let toml = toml::to_string_pretty(renderer.config())
            .context("error serializing config")?;
        write_file(&opt.output.join("render.toml"), toml.as_bytes())?;
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile() {
        assert_eq!(parse_tile("3,7").unwrap(), LocalPos::new(3, 7));
        assert_eq!(parse_tile(" 10 , 0").unwrap(), LocalPos::new(10, 0));
        assert!(parse_tile("3").is_err());
        assert!(parse_tile("a,b").is_err());
    }

    #[test]
    fn test_output_format() {
        assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert!("stl".parse::<OutputFormat>().is_err());
    }
}
