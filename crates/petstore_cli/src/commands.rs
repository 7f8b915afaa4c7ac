//! Command execution against one `PetProvider`.

use crate::args::{Cli, Command, PetFields};
use log::info;
use petstore_core::contract::{COLUMN_ID, COLUMN_PET_BREED, COLUMN_PET_NAME};
use petstore_core::{
    core_version, init_logging, DbTarget, Gender, PetProvider, PetStoreConfig, PetValues,
    ProviderError, Selection, ValidationPolicy,
};

const LIST_PROJECTION: &[&str] = &[COLUMN_ID, COLUMN_PET_NAME, COLUMN_PET_BREED];

/// Loads configuration, applies flag overrides, and starts logging.
pub fn load_config(cli: &Cli) -> Result<PetStoreConfig, String> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
            serde_json::from_str::<PetStoreConfig>(&text)
                .map_err(|err| format!("invalid config `{}`: {err}", path.display()))?
        }
        None => PetStoreConfig::default(),
    };

    if let Some(db) = &cli.db {
        config.database = DbTarget::from(db.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if cli.relaxed_updates {
        config.validation_policy = ValidationPolicy::PresentFieldsOnly;
    }

    if let Some(dir) = &config.log_dir {
        init_logging(&config.log_level, dir)?;
    }
    Ok(config)
}

/// Runs one command and returns the line to print on success.
pub fn execute(provider: &PetProvider, command: &Command) -> Result<String, ProviderError> {
    let matcher = provider.matcher();
    match command {
        Command::InsertDummy => {
            let values = PetValues::new()
                .name("Toto")
                .breed("Terrier")
                .gender(Gender::Male)
                .weight(7);
            let uri = provider.insert(&matcher.collection_uri(), &values)?;
            Ok(format!("Pet saved: {uri}"))
        }
        Command::Insert(fields) => {
            let uri = provider.insert(&matcher.collection_uri(), &to_values(fields))?;
            Ok(format!("Pet saved: {uri}"))
        }
        Command::List { sort } => {
            let mut cursor = provider.query(
                &matcher.collection_uri(),
                Some(LIST_PROJECTION),
                &Selection::all(),
                sort.as_deref(),
            )?;
            let mut lines = Vec::new();
            for row in cursor.rows()? {
                let row = row?;
                let name = row.get_text(COLUMN_PET_NAME)?.unwrap_or_default().trim();
                let breed = row.get_text(COLUMN_PET_BREED)?.unwrap_or_default().trim();
                lines.push(format!(
                    "{}\t{}\t{}",
                    row.id()?,
                    name,
                    if breed.is_empty() { "Unknown breed" } else { breed }
                ));
            }
            if lines.is_empty() {
                return Ok("No pets yet".to_string());
            }
            Ok(lines.join("\n"))
        }
        Command::Show { id } => {
            let mut cursor =
                provider.query(&matcher.item_uri(*id), None, &Selection::all(), None)?;
            let pets = cursor.collect_pets()?;
            Ok(match pets.first() {
                Some(pet) => format!(
                    "id: {}\nname: {}\nbreed: {}\ngender: {}\nweight: {}",
                    pet.id,
                    pet.name,
                    pet.breed.as_deref().unwrap_or(""),
                    pet.gender.label(),
                    pet.weight
                ),
                None => format!("No pet with id {id}"),
            })
        }
        Command::Update { id, fields } => {
            let changed =
                provider.update(&matcher.item_uri(*id), &to_values(fields), &Selection::all())?;
            Ok(format!("Pet updated: {changed} row(s)"))
        }
        Command::Delete { id } => {
            let removed = provider.delete(&matcher.item_uri(*id), &Selection::all())?;
            Ok(format!("Pet deleted: {removed} row(s)"))
        }
        Command::DeleteAll => {
            let removed = provider.delete(&matcher.collection_uri(), &Selection::all())?;
            info!("event=cli_delete_all module=cli status=ok rows={removed}");
            Ok(format!("Deleted {removed} pet(s)"))
        }
        Command::Type { uri } => provider.get_type(uri).map(str::to_string),
        Command::Version => Ok(format!("petstore_core version={}", core_version())),
    }
}

fn to_values(fields: &PetFields) -> PetValues {
    PetValues {
        name: fields.name.clone(),
        breed: fields.breed.clone(),
        gender: fields.gender,
        weight: fields.weight,
    }
}
