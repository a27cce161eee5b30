use arbor_layout::geom::{Size, size};
use arbor_layout::{
    ChartDocument, DeterministicNodeMeasurer, NodeContent, NodeId, NodeMeasurer, Orientation,
    PassOutcome, SizeMap, ToggleOutcome, Tree, ViewportPatch, size_channel,
};
use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;
use std::time::Instant;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(arbor_layout::Error),
    Json(serde_json::Error),
    Unmeasured(usize),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Unmeasured(n) => write!(
                f,
                "{n} node(s) could not be measured; pass --image-size for nodes with images"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<arbor_layout::Error> for CliError {
    fn from(value: arbor_layout::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Config,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    orientation: Option<Orientation>,
    image_size: Option<Size>,
    toggles: Vec<NodeId>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "arbor-cli\n\
\n\
USAGE:\n\
  arbor-cli [layout] [--pretty] [--viewport-width <w>] [--viewport-height <h>] [--orientation NORTH|EAST|SOUTH|WEST] [--image-size <w>x<h>] [--toggle <id>]... [--out <path>] [<path>|-]\n\
  arbor-cli config [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the chart JSON is read from stdin.\n\
  - layout prints the positioned snapshot as JSON; --out writes it to a file instead.\n\
  - --toggle collapses or expands a node after the first pass; it may be repeated.\n\
  - config prints the resolved chart configuration.\n\
  - Set ARBOR_LOG (e.g. ARBOR_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_orientation(s: &str) -> Option<Orientation> {
    match s.trim().to_ascii_uppercase().as_str() {
        "NORTH" => Some(Orientation::North),
        "EAST" => Some(Orientation::East),
        "SOUTH" => Some(Orientation::South),
        "WEST" => Some(Orientation::West),
        _ => None,
    }
}

fn parse_size(s: &str) -> Option<Size> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let (w, h) = (w.trim().parse::<f64>().ok()?, h.trim().parse::<f64>().ok()?);
    (w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0).then(|| size(w, h))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "config" => args.command = Command::Config,
            "--pretty" => args.pretty = true,
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width =
                    Some(w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height =
                    Some(h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--orientation" => {
                let Some(o) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.orientation = Some(parse_orientation(o).ok_or(CliError::Usage(usage()))?);
            }
            "--image-size" => {
                let Some(s) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.image_size = Some(parse_size(s).ok_or(CliError::Usage(usage()))?);
            }
            "--toggle" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let id = id.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
                args.toggles.push(NodeId(id));
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match out {
        None => println!("{text}"),
        Some(path) => std::fs::write(path, format!("{text}\n"))?,
    }
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("ARBOR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_document(args: &Args) -> Result<ChartDocument, CliError> {
    let text = read_input(args.input.as_deref())?;
    let mut doc = ChartDocument::from_json(&text)?;
    if args.viewport_width.is_some() || args.viewport_height.is_some() {
        let viewport = doc.chart.viewport.get_or_insert_with(ViewportPatch::default);
        viewport.width = args.viewport_width.or(viewport.width);
        viewport.height = args.viewport_height.or(viewport.height);
    }
    if let Some(orientation) = args.orientation {
        doc.chart.root_orientation = Some(orientation);
    }
    Ok(doc)
}

/// Text sizes are measured up front; nodes that need an image are measured on a loader thread
/// that reports back through the size channel.
fn measure(tree: &mut Tree, image_size: Option<Size>) -> Result<PassOutcome, CliError> {
    let pending = tree.measure_with(&DeterministicNodeMeasurer::default());
    if pending == 0 {
        return Ok(tree.position_tree());
    }

    let contents: Vec<(NodeId, NodeContent)> = tree
        .unmeasured()
        .filter_map(|id| Some((id, tree.node(id)?.content.clone())))
        .collect();
    let (reporter, report) = size_channel();
    let loader = std::thread::spawn(move || {
        let measurer = DeterministicNodeMeasurer {
            image_size,
            ..Default::default()
        };
        let mut sizes = SizeMap::default();
        for (id, content) in &contents {
            if let Some(s) = measurer.measure(content) {
                sizes.insert(*id, s);
            }
        }
        tracing::debug!(measured = sizes.len(), requested = contents.len(), "images measured");
        reporter.report(sizes);
    });

    let outcome = block_on(tree.position_tree_when_measured(report));
    if loader.join().is_err() {
        tracing::warn!("image loader thread panicked");
    }
    Ok(outcome?)
}

fn run(args: Args) -> Result<(), CliError> {
    let doc = load_document(&args)?;
    let mut tree = Tree::new(&doc)?;

    if let Command::Config = args.command {
        return write_json(tree.config(), args.pretty, args.out.as_deref());
    }

    if let PassOutcome::Deferred { unmeasured } = measure(&mut tree, args.image_size)? {
        return Err(CliError::Unmeasured(unmeasured));
    }

    let window = tree.config().animation.longest();
    let start = Instant::now();
    if let Some(delay) = tree.take_scheduled_toggle() {
        tracing::debug!(?delay, "running the initial root toggle");
        tree.toggle_collapse(NodeId::ROOT, start);
    }
    // Each toggle lands after the previous animation window has closed.
    for (i, id) in args.toggles.iter().enumerate() {
        let now = start + window * (i as u32 + 1);
        if let ToggleOutcome::Ignored = tree.toggle_collapse(*id, now) {
            tracing::warn!(node = id.index(), "toggle ignored");
        }
    }

    write_json(&tree.snapshot(), args.pretty, args.out.as_deref())?;
    tree.destroy();
    Ok(())
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Unmeasured(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
