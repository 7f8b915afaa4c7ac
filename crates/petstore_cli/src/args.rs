//! Command-line surface of the `petstore` binary.

use clap::{Args, Parser, Subcommand};
use petstore_core::Gender;
use std::path::PathBuf;

/// Manage shelter pet records stored in SQLite
#[derive(Parser, Debug)]
#[command(name = "petstore", version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file; flags below override its fields
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path, or `:memory:`
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Validate only the fields supplied to `update`
    #[arg(long, global = true)]
    pub relaxed_updates: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert the sample pet (Toto, Terrier, male, 7)
    InsertDummy,

    /// Insert one pet
    Insert(PetFields),

    /// List every pet as id, name and breed
    List {
        /// SQL ordering, e.g. `name ASC`
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show every field of one pet
    Show { id: i64 },

    /// Update one pet
    Update {
        id: i64,
        #[command(flatten)]
        fields: PetFields,
    },

    /// Delete one pet
    Delete { id: i64 },

    /// Delete every pet
    DeleteAll,

    /// Print the content type of an identifier
    Type { uri: String },

    /// Print the core library version
    Version,
}

#[derive(Args, Debug, Default)]
pub struct PetFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub breed: Option<String>,

    /// `unknown`, `male`, `female`, or a raw code
    #[arg(long, value_parser = parse_gender, allow_hyphen_values = true)]
    pub gender: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub weight: Option<i64>,
}

fn parse_gender(value: &str) -> Result<i64, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "unknown" => Ok(Gender::Unknown.code()),
        "male" => Ok(Gender::Male.code()),
        "female" => Ok(Gender::Female.code()),
        other => other
            .parse::<i64>()
            .map_err(|_| format!("expected unknown|male|female or an integer, got `{other}`")),
    }
}
