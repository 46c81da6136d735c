//! # CLI Layer
//!
//! This module is **one possible UI client** for objman. A layout editor or an
//! HTTP service would drive the same [`objman::api::ObjmanApi`].
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads command and edit batches from files
//! - Formats output for human consumption, or as JSON with `--json`
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory and tenant, builds the API
//! - `handle_*()`: Per-command handlers that call the API and print the result
//!
//! Failed validation is returned as an error so the process exits nonzero.

use super::render::{
    print_messages, render_compiled, render_config, render_layout, render_palette, use_color,
};
use super::setup::{init_tracing, Cli, Commands, FilterCommands, LayoutCommands, HOME_ENV, TENANT_ENV};
use clap::Parser;
use directories::ProjectDirs;
use objman::api::ObjmanApi;
use objman::commands::config::ConfigAction;
use objman::commands::CmdResult;
use objman::error::{ObjmanError, Result};
use objman::filter::FilterEdit;
use objman::layout::LayoutCommand;
use objman::store::fs::FileStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_TENANT: &str = "default";

struct AppContext {
    api: ObjmanApi<FileStore>,
    tenant: String,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Layout(cmd) => match cmd {
            LayoutCommands::Show { object } => handle_layout_show(&ctx, &object),
            LayoutCommands::Check { object } => handle_layout_check(&ctx, &object),
            LayoutCommands::Palette { object } => handle_layout_palette(&ctx, &object),
            LayoutCommands::Apply { object, commands } => {
                handle_layout_apply(&mut ctx, &object, &commands)
            }
        },
        Commands::Filter(cmd) => match cmd {
            FilterCommands::Validate { list } => handle_filter_validate(&ctx, &list),
            FilterCommands::Compile { list, alias } => {
                handle_filter_compile(&ctx, &list, alias.as_deref())
            }
            FilterCommands::Describe { list } => handle_filter_describe(&ctx, &list),
            FilterCommands::Edit { list, edits } => handle_filter_edit(&mut ctx, &list, &edits),
        },
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let tenant = cli
        .tenant
        .clone()
        .or_else(|| std::env::var(TENANT_ENV).ok())
        .unwrap_or_else(|| DEFAULT_TENANT.to_string());
    debug!(data_dir = %data_dir.display(), %tenant, "context ready");

    let api = ObjmanApi::new(FileStore::new(&data_dir), data_dir)?;
    Ok(AppContext {
        api,
        tenant,
        json: cli.json,
    })
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "objman", "objman")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ObjmanError::Config("Unable to determine a data directory".to_string()))
}

fn read_batch<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn finish(ctx: &AppContext, result: &CmdResult) {
    if ctx.json {
        // Messages would break the JSON document on stdout.
        for message in &result.messages {
            debug!(level = ?message.level, "{}", message.content);
        }
    } else {
        print_messages(&result.messages);
    }
}

fn print_layout(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    if let Some(layout) = &result.layout {
        if ctx.json {
            print_json(&layout.to_snapshot())?;
        } else {
            print!("{}", render_layout(layout, use_color()));
        }
    }
    Ok(())
}

fn handle_layout_show(ctx: &AppContext, object: &str) -> Result<()> {
    let result = ctx.api.show_layout(&ctx.tenant, object)?;
    print_layout(ctx, &result)?;
    finish(ctx, &result);
    Ok(())
}

fn handle_layout_check(ctx: &AppContext, object: &str) -> Result<()> {
    let result = ctx.api.check_layout(&ctx.tenant, object)?;
    if ctx.json {
        let problems: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
        print_json(&json!({ "object": object, "messages": problems }))?;
    } else {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_layout_palette(ctx: &AppContext, object: &str) -> Result<()> {
    let result = ctx.api.layout_palette(&ctx.tenant, object)?;
    if ctx.json {
        print_json(&result.palette)?;
    } else {
        print!("{}", render_palette(&result.palette));
    }
    finish(ctx, &result);
    Ok(())
}

fn handle_layout_apply(ctx: &mut AppContext, object: &str, path: &Path) -> Result<()> {
    let commands: Vec<LayoutCommand> = read_batch(path)?;
    let tenant = ctx.tenant.clone();
    let result = ctx.api.apply_layout(&tenant, object, &commands)?;
    if ctx.json {
        print_layout(ctx, &result)?;
    }
    finish(ctx, &result);
    Ok(())
}

fn handle_filter_validate(ctx: &AppContext, list: &str) -> Result<()> {
    let result = ctx.api.validate_filters(&ctx.tenant, list)?;
    let Some(validation) = &result.validation else {
        return Ok(());
    };
    if ctx.json {
        print_json(validation)?;
    } else if validation.is_valid {
        print_messages(&result.messages);
    }
    if validation.is_valid {
        Ok(())
    } else {
        Err(ObjmanError::InvalidFilter(validation.errors.clone()))
    }
}

fn handle_filter_compile(ctx: &AppContext, list: &str, alias: Option<&str>) -> Result<()> {
    let result = ctx.api.compile_filters(&ctx.tenant, list, alias)?;
    if let Some(compiled) = &result.compiled {
        if ctx.json {
            print_json(compiled)?;
        } else if !compiled.is_empty() {
            print!("{}", render_compiled(compiled));
        }
    }
    finish(ctx, &result);
    Ok(())
}

fn handle_filter_describe(ctx: &AppContext, list: &str) -> Result<()> {
    let result = ctx.api.describe_filters(&ctx.tenant, list)?;
    if let Some(description) = &result.description {
        if ctx.json {
            print_json(&json!({ "description": description }))?;
        } else {
            println!("{}", description);
        }
    }
    Ok(())
}

fn handle_filter_edit(ctx: &mut AppContext, list: &str, path: &Path) -> Result<()> {
    let edits: Vec<FilterEdit> = read_batch(path)?;
    let tenant = ctx.tenant.clone();
    let result = ctx.api.edit_filters(&tenant, list, &edits)?;
    if ctx.json {
        if let Some(filters) = &result.filters {
            print_json(filters)?;
        }
    }
    finish(ctx, &result);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let shown_key = match (&key, &value) {
        (Some(k), None) => Some(k.clone()),
        _ => None,
    };
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if result.has_errors() {
        let errors: Vec<String> = result.messages.iter().map(|m| m.content.clone()).collect();
        return Err(ObjmanError::Config(errors.join("; ")));
    }
    if ctx.json {
        if let Some(config) = &result.config {
            print_json(config)?;
        } else if let (Some(key), Some(message)) = (shown_key, result.messages.first()) {
            let mut shown = serde_json::Map::new();
            shown.insert(key, message.content.clone().into());
            print_json(&shown)?;
        }
    } else if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    finish(ctx, &result);
    Ok(())
}
