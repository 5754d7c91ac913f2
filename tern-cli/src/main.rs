//! Tern CLI
//!
//! A headless front end for testing and debugging: loads a document
//! from a file, URL, or inline string, runs it through the pipeline,
//! and dumps the requested stage.

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;

use tern_browser::Session;
use tern_dom::DomTree;
use tern_layout::{BoxId, LayoutTree, Viewport};

/// Which pipeline stage to dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// The parsed document tree.
    Tree,
    /// The layout box tree with resolved geometry.
    Layout,
    /// The final paint list.
    Paint,
}

/// Headless inspection tool for the Tern engine.
#[derive(Debug, Parser)]
#[command(name = "tern", version, about)]
struct Args {
    /// File path or URL to load.
    location: Option<String>,

    /// Parse an inline HTML string instead of loading a document.
    #[arg(long, conflicts_with = "location")]
    html: Option<String>,

    /// Pipeline stage to dump.
    #[arg(long, value_enum, default_value = "tree")]
    stage: Stage,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Measure with system fonts instead of the deterministic
    /// approximate metrics.
    #[arg(long)]
    system_fonts: bool,

    /// Emit the paint list as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut session = if args.system_fonts {
        Session::with_system_fonts()
    } else {
        Session::new()
    };

    let dom = match (&args.html, &args.location) {
        (Some(html), _) => tern_html::parse(html),
        (None, Some(location)) => session.load(location)?.dom,
        (None, None) => bail!("provide a file path, a URL, or --html '<p>...</p>'"),
    };

    match args.stage {
        Stage::Tree => {
            println!("{}", "=== Document Tree ===".bold());
            tern_html::print_tree(&dom, dom.root());
        }
        Stage::Layout => {
            let page = session.render(&dom, Viewport::with_size(args.width, args.height));
            println!("{}", "=== Layout Tree ===".bold());
            dump_layout(&dom, &page.layout, BoxId::DOCUMENT, 0);
            println!("page height: {}", page.page_height());
        }
        Stage::Paint => {
            let page = session.render(&dom, Viewport::with_size(args.width, args.height));
            if args.json {
                println!("{}", serde_json::to_string_pretty(&page.paint)?);
            } else {
                println!("{}", "=== Paint List ===".bold());
                for command in page.paint.commands() {
                    println!("{command:?}");
                }
                println!("{} commands", page.paint.len());
            }
        }
    }

    Ok(())
}

/// Print one layout box per line, indented by tree depth.
fn dump_layout(dom: &DomTree, tree: &LayoutTree, id: BoxId, indent: usize) {
    let layout_box = tree.get(id);
    let label = if id == BoxId::DOCUMENT {
        "document"
    } else {
        dom.tag(layout_box.node).unwrap_or("#text")
    };
    println!(
        "{:indent$}{label} {}(x={}, y={}, width={}, height={})",
        "",
        layout_box.mode,
        layout_box.x,
        layout_box.y,
        layout_box.width,
        layout_box.height,
    );
    for &child in &layout_box.children {
        dump_layout(dom, tree, child, indent + 2);
    }
}
