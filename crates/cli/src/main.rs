//! drawparse CLI
//!
//! Command-line front end for reconciling an engineering drawing against
//! its BOM and order spreadsheets. Every command works on the saved draft:
//! it is restored first and written back after any change.
//!
//! Copyright (c) 2025 Michael A Wright

mod render;

use anyhow::{Context, Result};
use api_bridge::{ApiClient, ApiConfig};
use clap::{Args, Parser, Subcommand};
use reconcile_core::{
    ComponentId, ComponentPatch, DirectorySaveTarget, FileSlots, ReconciliationStore, SlotStore,
    Status, UploadFile, UploadPatch, CREDENTIAL_SLOT,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nbuilt:  ",
    env!("BUILT_TIME_UTC"),
    "\nhost:   ",
    env!("BUILT_HOST"),
    "\ncommit: ",
    env!("BUILT_GIT_COMMIT_HASH"),
);

#[derive(Parser)]
#[command(name = "drawparse")]
#[command(about = "Reconcile drawing components against BOM and order spreadsheets", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Directory holding the saved draft and API key
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the parsing backend
    #[arg(long, global = true, env = api_bridge::API_URL_ENV)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a drawing and both spreadsheets for parsing
    Parse {
        /// Drawing PDF
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// BOM spreadsheet
        #[arg(long)]
        bom: Option<PathBuf>,

        /// Manager/order spreadsheet
        #[arg(long)]
        manager: Option<PathBuf>,

        /// Zero-based sheet index in the BOM spreadsheet
        #[arg(short, long, default_value = "0")]
        sheet_index: u32,
    },

    /// Show the component table
    List {
        /// Print the draft as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show status counts and technical parameters
    Stats,

    /// Append a blank component
    Add,

    /// Change fields of one component (an empty value clears a nullable field)
    Edit {
        /// Component id
        id: String,

        #[command(flatten)]
        fields: EditFields,
    },

    /// Delete one component, or all selected ones
    Delete {
        /// Component id
        #[arg(required_unless_present = "selected")]
        id: Option<String>,

        /// Delete every selected component
        #[arg(long, conflicts_with = "id")]
        selected: bool,
    },

    /// Toggle selection of one component, or (de)select all
    Select {
        /// Component id
        #[arg(required_unless_present_any = ["all", "none"])]
        id: Option<String>,

        /// Select every component
        #[arg(long, conflicts_with_all = ["id", "none"])]
        all: bool,

        /// Deselect every component
        #[arg(long, conflicts_with = "id")]
        none: bool,
    },

    /// Export the current table to a spreadsheet
    Export {
        /// Directory to save the spreadsheet in
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Discard the saved draft
    Reset,

    /// Manage the stored API key
    Config {
        /// Store a new API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Show whether an API key is stored
        #[arg(long)]
        show: bool,
    },

    /// Check that the backend is reachable
    Health,
}

#[derive(Args, Default)]
struct EditFields {
    #[arg(long)]
    pos: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    material: Option<String>,
    #[arg(long)]
    bom_material: Option<String>,
    #[arg(long)]
    order_material: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    #[arg(long)]
    manager_quantity: Option<String>,
    /// equal, notEqual or new
    #[arg(long)]
    status: Option<Status>,
    #[arg(long)]
    note: Option<String>,
}

impl EditFields {
    fn into_patch(self) -> Result<ComponentPatch> {
        Ok(ComponentPatch {
            pos: self.pos.map(nullable_text),
            description: self.description,
            material: self.material,
            bom_material: self.bom_material.map(nullable_text),
            order_material: self.order_material.map(nullable_text),
            quantity: self.quantity.map(|q| nullable_number(&q)).transpose()?,
            manager_quantity: self
                .manager_quantity
                .map(|q| nullable_number(&q))
                .transpose()?,
            status: self.status,
            note: self.note.map(nullable_text),
            ..ComponentPatch::default()
        })
    }
}

fn nullable_text(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn nullable_number(value: &str) -> Result<Option<f64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    let number = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("not a number: {value}"))?;
    Ok(Some(number))
}

fn read_upload(path: Option<&Path>) -> Result<Option<UploadFile>> {
    path.map(|p| UploadFile::from_path(p).with_context(|| format!("Failed to read {}", p.display())))
        .transpose()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let slots = match cli.data_dir {
        Some(dir) => FileSlots::new(dir),
        None => FileSlots::default_location().context("No data directory available; pass --data-dir")?,
    };
    let slots = Arc::new(slots);

    let mut config = ApiConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    let client = Arc::new(ApiClient::new(config, slots.clone())?);

    let out_dir = match &cli.command {
        Commands::Export { out_dir } => out_dir.clone(),
        _ => PathBuf::from("."),
    };

    match cli.command {
        Commands::Config { set_api_key, show } => {
            if let Some(key) = set_api_key {
                slots.set(CREDENTIAL_SLOT, key.trim())?;
                println!("API key saved to {}", slots.dir().display());
            }
            if show {
                let stored = slots.get(CREDENTIAL_SLOT)?.is_some_and(|k| !k.trim().is_empty());
                println!("API key: {}", if stored { "configured" } else { "not configured" });
            }
            return Ok(());
        }
        Commands::Health => {
            let url = client.config().endpoint("/health");
            if client.health().await.with_context(|| format!("{url} unreachable"))? {
                println!("OK {url}");
                return Ok(());
            }
            anyhow::bail!("{url} answered with an error status");
        }
        command => {
            let mut store = ReconciliationStore::new(
                client,
                Arc::new(DirectorySaveTarget::new(out_dir)),
                slots,
            );
            store.restore_draft();
            run(&mut store, command).await?;

            if let Some(error) = store.error() {
                eprintln!("error: {error}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run(store: &mut ReconciliationStore, command: Commands) -> Result<()> {
    match command {
        Commands::Parse {
            pdf,
            bom,
            manager,
            sheet_index,
        } => {
            store.set_upload_bundle(UploadPatch {
                pdf: read_upload(pdf.as_deref())?,
                bom: read_upload(bom.as_deref())?,
                manager: read_upload(manager.as_deref())?,
                bom_sheet_index: Some(sheet_index),
            });
            if store.submit_for_parsing().await {
                store.persist_draft();
                render::print_components(store.components());
                render::print_statistics(&store.statistics());
            }
        }
        Commands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.components())?);
            } else {
                render::print_components(store.components());
            }
        }
        Commands::Stats => {
            if let Some(ts) = store.draft_timestamp() {
                render::print_draft_saved(ts);
            }
            render::print_statistics(&store.statistics());
            render::print_technical_params(&store.technical_params());
        }
        Commands::Add => {
            let id = store.add_blank_record();
            store.persist_draft();
            println!("{id}");
        }
        Commands::Edit { id, fields } => {
            let id = existing_id(store, &id)?;
            let patch = fields.into_patch()?;
            if patch.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field");
            }
            store.update_record(&id, ComponentPatch {
                is_editing: Some(false),
                ..patch
            });
            store.persist_draft();
        }
        Commands::Delete { id, selected } => {
            if selected {
                let removed = store.delete_selected();
                println!("deleted {removed} component(s)");
            } else if let Some(id) = id {
                let id = existing_id(store, &id)?;
                store.delete_record(&id);
            }
            store.persist_draft();
        }
        Commands::Select { id, all, none } => {
            if all || none {
                store.select_all(all);
            } else if let Some(id) = id {
                let id = existing_id(store, &id)?;
                store.toggle_selected(&id);
            }
            store.persist_draft();
            println!("{} selected", store.selected_ids().len());
        }
        Commands::Export { .. } => {
            if let Some(path) = store.export_current_state().await {
                println!("saved {}", path.display());
            }
        }
        Commands::Reset => {
            store.reset_all();
            if store.discard_draft() {
                println!("draft discarded");
            }
        }
        // handled in main before a store is built
        Commands::Config { .. } | Commands::Health => {}
    }
    Ok(())
}

fn existing_id(store: &ReconciliationStore, id: &str) -> Result<ComponentId> {
    let id = ComponentId::from(id);
    if store.find(&id).is_none() {
        anyhow::bail!("no component with id {id}");
    }
    Ok(id)
}
