//! JSON documents on local disk standing in for the lead, offer and result stores.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::scoring::domain::{Lead, Offer, ScoreResult};
use crate::scoring::repository::{LeadRepository, OfferRepository, ResultSink, StoreError};

const LEADS_FILE: &str = "leads.json";
const OFFER_FILE: &str = "offer.json";
const RESULTS_FILE: &str = "results.json";

/// Keeps `leads.json`, `offer.json` and `results.json` under one data directory.
///
/// Every write goes to a sibling temp file that is renamed over the target,
/// so readers see either the old document or the new one.
pub struct JsonFileStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store, creating the data directory when it is missing.
    pub fn open<P: Into<PathBuf>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StoreError> {
        let path = self.path(file);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let target = self.path(file);
        let staging = self.path(&format!("{file}.tmp"));

        let payload = serde_json::to_vec_pretty(value)?;
        {
            let mut handle = fs::File::create(&staging)?;
            handle.write_all(&payload)?;
            handle.sync_all()?;
        }
        fs::rename(&staging, &target)?;
        tracing::debug!(path = %target.display(), bytes = payload.len(), "store document replaced");
        Ok(())
    }
}

impl LeadRepository for JsonFileStore {
    fn all(&self) -> Result<Vec<Lead>, StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        Ok(self.read(LEADS_FILE)?.unwrap_or_default())
    }

    fn append(&self, leads: Vec<Lead>) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut stored: Vec<Lead> = self.read(LEADS_FILE)?.unwrap_or_default();
        let added = leads.len();
        stored.extend(leads);
        self.write(LEADS_FILE, &stored)?;
        Ok(added)
    }
}

impl OfferRepository for JsonFileStore {
    fn current(&self) -> Result<Option<Offer>, StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        self.read(OFFER_FILE)
    }

    fn replace(&self, offer: Offer) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        self.write(OFFER_FILE, &offer)
    }
}

impl ResultSink for JsonFileStore {
    fn replace_all(&self, results: &[ScoreResult]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        self.write(RESULTS_FILE, results)
    }

    fn latest(&self) -> Result<Option<Vec<ScoreResult>>, StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        self.read(RESULTS_FILE)
    }
}
