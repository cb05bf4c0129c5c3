//! IDM Forms CLI
//!
//! Command-line interface for inspecting form schema preparation and patches.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use idm_forms::{
    convert_placeholder_schema_to_read_only, convert_to_draft4_plus_required, derive_ui_schema,
    flatten_placeholder, generate_patch_set, json_type_name, load_json,
    remove_passwords_from_required, revert_placeholders_to_original_value, validate_values,
    DeriveOptions, Mode, UiText, ValidateError,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "idm-forms")]
#[command(about = "Prepare form schemas and compute patches for the IDM console")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert legacy required flags (and drop password requirements with --edit)
    Normalize {
        /// Schema file
        schema: PathBuf,

        /// Normalize for editing an existing object
        #[arg(long)]
        edit: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Derive the UI schema (rendering hints) for a schema
    UiSchema {
        /// Schema file
        schema: PathBuf,

        /// Derive for editing an existing object
        #[arg(long)]
        edit: bool,

        /// JSON file overriding display text (passwordPlaceholder, fileInstructions)
        #[arg(long)]
        text: Option<PathBuf>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Mark schema properties whose values hold placeholders as read-only
    Mask {
        /// Schema file
        schema: PathBuf,

        /// Values file
        values: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Restore placeholder values using a masked schema
    Revert {
        /// Values file
        values: PathBuf,

        /// Masked schema file (output of `mask`)
        #[arg(long)]
        schema: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Compute the patch turning OLD into NEW
    Patch {
        /// New object state
        new: PathBuf,

        /// Old object state
        old: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Validate values against a schema
    Validate {
        /// Schema file
        schema: PathBuf,

        /// Values file
        values: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Normalize { schema, edit, out } => run_normalize(&schema, edit, &out),
        Commands::UiSchema {
            schema,
            edit,
            text,
            out,
        } => run_ui_schema(&schema, edit, text.as_deref(), &out),
        Commands::Mask {
            schema,
            values,
            out,
        } => run_mask(&schema, &values, &out),
        Commands::Revert {
            values,
            schema,
            out,
        } => run_revert(&values, &schema, &out),
        Commands::Patch { new, old, out } => run_patch(&new, &old, &out),
        Commands::Validate {
            schema,
            values,
            json,
        } => run_validate(&schema, &values, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load(path: &Path) -> Result<Value, u8> {
    load_json(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_normalize(schema_path: &Path, edit: bool, out: &OutputArgs) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let mut normalized = convert_to_draft4_plus_required(&schema);
    if edit {
        normalized = remove_passwords_from_required(&normalized).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
    }
    write_output(&normalized, out)
}

fn run_ui_schema(
    schema_path: &Path,
    edit: bool,
    text_path: Option<&Path>,
    out: &OutputArgs,
) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let normalized = convert_to_draft4_plus_required(&schema);
    let mut options = DeriveOptions::new(Mode::from_edit_flag(edit));
    if let Some(path) = text_path {
        let text: UiText = serde_json::from_value(load(path)?).map_err(|e| {
            eprintln!("Error: invalid UI text in {}: {}", path.display(), e);
            2u8
        })?;
        options = options.text(text);
    }
    let ui = derive_ui_schema(&normalized, &options)
        .map(|hint| hint.to_ui_schema())
        .unwrap_or_else(|| serde_json::json!({}));
    write_output(&ui, out)
}

fn run_mask(schema_path: &Path, values_path: &Path, out: &OutputArgs) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let values = load(values_path)?;
    if !values.is_object() {
        log::warn!("values are a {}, nothing to mask", json_type_name(&values));
    }

    let masked = convert_placeholder_schema_to_read_only(&flatten_placeholder(&values), &schema)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
    write_output(&masked, out)
}

fn run_revert(values_path: &Path, schema_path: &Path, out: &OutputArgs) -> Result<(), u8> {
    let values = load(values_path)?;
    let schema = load(schema_path)?;
    write_output(&revert_placeholders_to_original_value(&values, &schema), out)
}

fn run_patch(new_path: &Path, old_path: &Path, out: &OutputArgs) -> Result<(), u8> {
    let new = load(new_path)?;
    let old = load(old_path)?;
    let patch = generate_patch_set(&new, &old);
    let value = serde_json::to_value(&patch).map_err(|e| {
        eprintln!("Error serializing patch: {}", e);
        2u8
    })?;
    write_output(&value, out)
}

fn run_validate(schema_path: &Path, values_path: &Path, json_output: bool) -> Result<(), u8> {
    let schema = load(schema_path)?;
    let values = load(values_path)?;

    match validate_values(&convert_to_draft4_plus_required(&schema), &values) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(ValidateError::Form(e)) => {
            if json_output {
                let output = serde_json::json!({ "valid": false, "error": e.to_string() });
                println!("{}", output);
            } else {
                eprintln!("Error: {}", e);
            }
            Err(e.exit_code() as u8)
        }
    }
}

fn write_output(value: &Value, out: &OutputArgs) -> Result<(), u8> {
    let json_output = if out.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match &out.output {
        Some(path) => {
            std::fs::write(path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}
