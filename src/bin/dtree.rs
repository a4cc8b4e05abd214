//! dtree CLI: walk a decision tree from the terminal.
//!
//! Usage:
//!   dtree walk <start> [--data folder-or-url] [--config file]
//!   dtree render <start> --choose 1,2 [--output file]

use clap::{Parser, Subcommand};
use decision_tree::{
    FileRepository, HtmlRenderer, HttpRepository, NodeId, NodeRepository, TerminalRenderer,
    TraversalController, TreeConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "dtree", version, about = "Interactive decision tree traversal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// YAML configuration file (defaults to ~/.config/dtree/config.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Folder or base URL holding the node documents (overrides dataFolder)
    #[arg(long, global = true)]
    data: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer questions interactively
    Walk {
        /// Id of the start node
        start: String,
    },
    /// Follow a fixed list of answers and print the resulting HTML
    Render {
        /// Id of the start node
        start: String,
        /// 1-based option numbers, each picked on the newest node
        #[arg(long, value_delimiter = ',')]
        choose: Vec<usize>,
        /// Write the document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Get the default config path (~/.config/dtree/config.yaml)
fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("dtree").join("config.yaml");
    path.exists().then_some(path)
}

fn load_config(path: Option<PathBuf>, data: Option<String>) -> Result<TreeConfig, String> {
    let mut config = match path.or_else(default_config_path) {
        Some(path) => TreeConfig::load(&path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        None => TreeConfig::default(),
    };
    if let Some(data) = data {
        config.data_folder = data;
    }
    Ok(config)
}

fn open_repository(config: &TreeConfig) -> Result<Arc<dyn NodeRepository>, String> {
    let remote = config.data_folder.starts_with("http://") || config.data_folder.starts_with("https://");
    if remote {
        let repo = HttpRepository::from_config(config)
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        Ok(Arc::new(repo))
    } else {
        Ok(Arc::new(FileRepository::from_config(config)))
    }
}

/// One line of walk input
#[derive(Debug, PartialEq)]
enum WalkCommand {
    /// Pick option (1-based) on the node at the given depth, or the tip
    Choose { depth: Option<usize>, option: usize },
    Reset,
    Quit,
}

fn parse_walk_command(line: &str) -> Option<WalkCommand> {
    let line = line.trim();
    match line {
        "q" | "quit" => return Some(WalkCommand::Quit),
        "r" | "reset" => return Some(WalkCommand::Reset),
        _ => {}
    }
    match line.split_once('.') {
        Some((depth, option)) => Some(WalkCommand::Choose {
            depth: Some(depth.trim().parse::<usize>().ok()?),
            option: option.trim().parse::<usize>().ok().filter(|n| *n > 0)?,
        }),
        None => Some(WalkCommand::Choose {
            depth: None,
            option: line.parse::<usize>().ok().filter(|n| *n > 0)?,
        }),
    }
}

async fn cmd_walk(config: TreeConfig, start: &str) -> i32 {
    let repository = match open_repository(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let renderer = TerminalRenderer::new(std::io::stdout(), config.show_extra_description_text);
    let mut controller = TraversalController::new(repository, renderer, config);

    if controller.start(start).await.is_err() {
        return 1;
    }
    println!("\nEnter an option number, <depth>.<option> to revisit a node, r to reset, q to quit.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return 0,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        let Some(command) = parse_walk_command(&line) else {
            eprintln!("Unrecognized input '{}'", line.trim());
            continue;
        };
        match command {
            WalkCommand::Quit => return 0,
            WalkCommand::Reset => controller.reset(),
            WalkCommand::Choose { depth, option } => {
                let Some(chain) = controller.chain() else {
                    return 1;
                };
                let position = depth.unwrap_or(chain.len() - 1);
                let Some(entry) = chain.get(position) else {
                    eprintln!("No node at depth {}", position);
                    continue;
                };
                let from: NodeId = entry.node_id.clone();
                if let Err(e) = controller.select_answer_index(&from, option - 1).await {
                    if e.is_precondition_violation() {
                        eprintln!("Error: {}", e);
                    }
                }
            }
        }
    }
}

async fn cmd_render(config: TreeConfig, start: &str, choose: &[usize], output: Option<&Path>) -> i32 {
    if choose.contains(&0) {
        eprintln!("Error: options are numbered from 1");
        return 1;
    }
    let repository = match open_repository(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let renderer = HtmlRenderer::new(&config);
    let mut controller = TraversalController::new(repository, renderer, config);

    if let Err(e) = controller.start(start).await {
        eprintln!("Error: {}", e);
        return 1;
    }
    for &option in choose {
        let Some(tip) = controller.tip() else {
            return 1;
        };
        let from = tip.node_id.clone();
        if let Err(e) = controller.select_answer_index(&from, option - 1).await {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    let html = controller.renderer().to_html();
    match output {
        Some(path) => match std::fs::write(path, html) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                1
            }
        },
        None => {
            println!("{}", html);
            0
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match load_config(cli.config, cli.data) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = rt.block_on(async {
        match cli.command {
            Commands::Walk { start } => cmd_walk(config, &start).await,
            Commands::Render { start, choose, output } => {
                cmd_render(config, &start, &choose, output.as_deref()).await
            }
        }
    });
    std::process::exit(code);
}
