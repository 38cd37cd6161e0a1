//! fintrack-storage-json
//!
//! Filesystem [`LedgerStore`]: one JSON document per user, written atomically.
//! Records are decoded one at a time so a single malformed entry is reported
//! and kept on disk instead of failing the whole ledger.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use fintrack_core::{
    storage::{screen_record, RejectedRecord, ScreenedRecord},
    CoreError, LedgerStore, LoadReport, ValidationError,
};
use fintrack_domain::{
    ledger::CURRENT_SCHEMA_VERSION, Budget, Category, Ledger, RecurringRule, SavingsGoal,
    Transaction,
};

const LEDGER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence, one file per user.
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    ledger_root: PathBuf,
}

/// A decoded document plus the raw records that failed decoding or screening.
struct Decoded {
    report: LoadReport,
    preserved: Vec<(&'static str, Value)>,
}

impl JsonLedgerStore {
    pub fn new(ledger_root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&ledger_root)?;
        Ok(Self { ledger_root })
    }

    pub fn ledger_root(&self) -> &Path {
        &self.ledger_root
    }

    pub fn ledger_path(&self, user_id: &str) -> PathBuf {
        self.ledger_root
            .join(format!("{}.{}", canonical_name(user_id), LEDGER_EXTENSION))
    }

    fn read(&self, user_id: &str) -> Result<Decoded, CoreError> {
        let path = self.ledger_path(user_id);
        if !path.exists() {
            return Ok(Decoded {
                report: LoadReport {
                    ledger: Ledger::new(user_id),
                    rejected: Vec::new(),
                },
                preserved: Vec::new(),
            });
        }
        let data = fs::read_to_string(&path)?;
        let document: Value =
            serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
        decode_document(user_id, document)
    }

    fn write(
        &self,
        ledger: &Ledger,
        preserved: Vec<(&'static str, Value)>,
    ) -> Result<(), CoreError> {
        let mut stamped = ledger.clone();
        stamped.updated_at = Some(Utc::now());
        let mut document =
            serde_json::to_value(&stamped).map_err(|err| CoreError::Serde(err.to_string()))?;
        if let Some(object) = document.as_object_mut() {
            for (collection, raw) in preserved {
                if let Some(items) = object.get_mut(collection).and_then(Value::as_array_mut) {
                    items.push(raw);
                }
            }
        }
        let json = serde_json::to_string_pretty(&document)
            .map_err(|err| CoreError::Serde(err.to_string()))?;

        let path = self.ledger_path(&ledger.user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(user = %ledger.user_id, path = %path.display(), "ledger written");
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn load(&self, user_id: &str) -> Result<LoadReport, CoreError> {
        Ok(self.read(user_id)?.report)
    }

    /// Overwrites the user's document, including any previously rejected records.
    fn save(&self, ledger: &Ledger) -> Result<(), CoreError> {
        self.write(ledger, Vec::new())
    }

    fn update(
        &self,
        user_id: &str,
        change: &mut dyn FnMut(&mut Ledger) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let Decoded { report, preserved } = self.read(user_id)?;
        let mut ledger = report.ledger;
        change(&mut ledger)?;
        self.write(&ledger, preserved)
    }
}

fn decode_document(user_id: &str, document: Value) -> Result<Decoded, CoreError> {
    let Value::Object(mut object) = document else {
        return Err(CoreError::Serde(
            "ledger document must be a JSON object".into(),
        ));
    };

    if let Some(stored) = object.get("user_id").and_then(Value::as_str) {
        if stored != user_id {
            return Err(CoreError::Storage(format!(
                "ledger file for `{user_id}` belongs to `{stored}`"
            )));
        }
    }

    let mut ledger = Ledger::new(user_id);
    ledger.schema_version = object
        .get("schema_version")
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(CURRENT_SCHEMA_VERSION);
    ledger.updated_at = object
        .get("updated_at")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok());

    let mut rejected = Vec::new();
    let mut preserved = Vec::new();
    ledger.transactions =
        decode_collection::<Transaction>(&mut object, user_id, &mut rejected, &mut preserved)?;
    ledger.budgets =
        decode_collection::<Budget>(&mut object, user_id, &mut rejected, &mut preserved)?;
    ledger.categories =
        decode_collection::<Category>(&mut object, user_id, &mut rejected, &mut preserved)?;
    ledger.recurring_rules =
        decode_collection::<RecurringRule>(&mut object, user_id, &mut rejected, &mut preserved)?;
    ledger.savings_goals =
        decode_collection::<SavingsGoal>(&mut object, user_id, &mut rejected, &mut preserved)?;

    Ok(Decoded {
        report: LoadReport { ledger, rejected },
        preserved,
    })
}

fn decode_collection<T>(
    object: &mut Map<String, Value>,
    user_id: &str,
    rejected: &mut Vec<RejectedRecord>,
    preserved: &mut Vec<(&'static str, Value)>,
) -> Result<Vec<T>, CoreError>
where
    T: DeserializeOwned + ScreenedRecord,
{
    let items = match object.remove(T::COLLECTION) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(CoreError::Serde(format!(
                "`{}` must be an array",
                T::COLLECTION
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, raw) in items.into_iter().enumerate() {
        let outcome = serde_json::from_value::<T>(raw.clone())
            .map_err(|err| ValidationError::Malformed(err.to_string()))
            .and_then(|record| screen_record(user_id, &record).map(|()| record));
        match outcome {
            Ok(record) => records.push(record),
            Err(error) => {
                rejected.push(RejectedRecord {
                    collection: T::COLLECTION,
                    position,
                    error,
                });
                preserved.push((T::COLLECTION, raw));
            }
        }
    }
    Ok(records)
}

/// File-system safe slug for a user id.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_user_ids() {
        assert_eq!(canonical_name("Alice Smith"), "alice_smith");
        assert_eq!(canonical_name("user-42"), "user-42");
        assert_eq!(canonical_name("  ///  "), "ledger");
    }
}
