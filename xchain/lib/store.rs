//! Saving and loading computed results.
//!
//! Results are written as a single [`Record`] encoded with [`bincode`].

use std::{
    fs,
    io::{ BufReader, BufWriter, Write },
    path::{ Path, PathBuf },
};
use serde::{ Deserialize, Serialize };
use crate::{
    artifacts::RunArtifacts,
    dynamics::{ Kind, tdse::TdseRecord, tise::TiseRecord },
    error::{ SolverError, StoreError },
};

/// Where results go and which reference data, if any, to read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persistence {
    /// If not `None`, computed results are saved to this file.
    #[serde(default)]
    pub save_file: Option<PathBuf>,
    /// If not `None`, reference data are loaded from this file.
    #[serde(default)]
    pub load_file: Option<PathBuf>,
    /// How to compare computed results against the reference data.
    #[serde(default)]
    pub compare: Option<String>,
}

impl Persistence {
    /// Save to the run's save file; no reference data.
    pub fn from_artifacts(artifacts: &RunArtifacts) -> Self {
        Self {
            save_file: Some(artifacts.save_file()),
            load_file: None,
            compare: None,
        }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        match &self.compare {
            Some(mode) => Err(SolverError::UnsupportedCompare(mode.clone())),
            None => Ok(()),
        }
    }

    /// Load and check the reference data, if configured.
    pub fn load_reference(&self, kind: Kind, n_site: usize)
        -> Result<Option<Record>, StoreError>
    {
        let Some(path) = self.load_file.as_ref() else { return Ok(None); };
        let record = load(path)?;
        if record.kind() != kind {
            return Err(StoreError::WrongKind(
                path.clone(), record.kind().name(), kind.name()));
        }
        if record.n_site() != n_site {
            return Err(StoreError::SiteCount(
                path.clone(), record.n_site(), n_site));
        }
        log::info!(
            "loaded {} reference data for {} sites from {}",
            kind.name(), n_site, path.display(),
        );
        Ok(Some(record))
    }

    /// Save a record to the save file, if configured.
    pub fn save(&self, record: &Record) -> Result<(), StoreError> {
        match self.save_file.as_ref() {
            Some(path) => save(path, record),
            None => Ok(()),
        }
    }
}

/// Results of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Tdse(TdseRecord),
    Tise(TiseRecord),
}

impl Record {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Tdse(_) => Kind::Tdse,
            Self::Tise(_) => Kind::Tise,
        }
    }

    pub fn n_site(&self) -> usize {
        match self {
            Self::Tdse(rec) => rec.populations.ncols(),
            Self::Tise(rec) => rec.populations.ncols(),
        }
    }
}

/// Write a record to `path`, replacing any existing file.
pub fn save(path: &Path, record: &Record) -> Result<(), StoreError> {
    let file = fs::File::create(path)
        .map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, record)?;
    writer.flush().map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
    log::info!("saved {} results to {}", record.kind().name(), path.display());
    Ok(())
}

/// Read a record from `path`.
pub fn load(path: &Path) -> Result<Record, StoreError> {
    let file = fs::File::open(path)
        .map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
    let record: Record = bincode::deserialize_from(BufReader::new(file))?;
    Ok(record)
}
