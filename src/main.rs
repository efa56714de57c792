use clap::{Parser, Subcommand};

mod catalog;
mod diagnostics;
mod export;
mod label;
mod render;
mod script;
mod session;
mod steps;

use anyhow::Context;
use catalog::Catalog;
use session::Session;
use std::path::PathBuf;
use steps::IdGenerator;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "protocol-builder")]
#[command(about = "Assemble lab protocols from catalog operations and export them as PDF", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog operations grouped by category.
    Catalog {
        #[arg(long)]
        catalog: String,
    },

    /// Replay a gesture script and export the resulting protocol.
    Build {
        #[arg(long)]
        catalog: String,

        #[arg(long)]
        script: String,

        /// Protocol header; overrides any header gesture in the script.
        #[arg(long)]
        header: Option<String>,

        /// Directory the PDF is written to.
        #[arg(short = 'o', long, default_value = ".")]
        out: PathBuf,

        /// Also write the protocol payload as JSON.
        #[arg(long)]
        payload_out: Option<PathBuf>,

        /// Use step-1, step-2, ... instead of random instance ids.
        #[arg(long)]
        sequential_ids: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init(cli.debug);

    match cli.cmd {
        Commands::Catalog { catalog } => {
            let catalog = Catalog::load(&catalog)?;
            println!("{} operations", catalog.len());
            for group in catalog.grouped() {
                println!("\n{}", label::category_label(group.category));
                for op in group.operations {
                    println!("  [{}] {}", op.id, label::operation_label(&op.name));
                    if let Some(example) = &op.example {
                        println!("      e.g. {}", example);
                    }
                    for param in &op.parameters {
                        println!("      - {} ({})", label::parameter_label(param), param.kind());
                    }
                }
            }
        }
        Commands::Build {
            catalog,
            script,
            header,
            out,
            payload_out,
            sequential_ids,
        } => {
            // 1) Catalog + gestures.
            let catalog = Catalog::load(&catalog)?;
            let gestures = script::load_script(&script)?;

            // 2) Replay into a fresh session.
            let ids = if sequential_ids {
                IdGenerator::sequential()
            } else {
                IdGenerator::default()
            };
            let mut session = Session::new(&catalog, ids);
            script::replay(&mut session, &gestures);
            if let Some(header) = header {
                session.set_header(header);
            }

            // 3) Render + write.
            let exported = export::export(
                &session.snapshot(),
                &out,
                &render::Helvetica,
                chrono::Local::now(),
            )?;

            if let Some(path) = payload_out {
                let json = serde_json::to_string_pretty(&exported.payload)?;
                std::fs::write(&path, json).with_context(|| {
                    diagnostics::error_message(format!("write payload {}", path.display()))
                })?;
            }

            println!(
                "Wrote {} ({} page{})",
                exported.pdf_path.display(),
                exported.pages,
                if exported.pages == 1 { "" } else { "s" }
            );
        }
    }

    Ok(())
}
