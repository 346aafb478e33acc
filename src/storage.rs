//! Persistência local do estado da campanha.
//!
//! O trait [`KeyValueStore`] representa o armazenamento durável (get/set
//! síncronos). [`FileStore`] grava um arquivo JSON por chave no diretório de
//! dados; [`MemoryStore`] serve para testes e para o modo `--ephemeral`.
//!
//! Falhas de leitura ou de parse resultam nos valores padrão, sem erro para o
//! usuário. Falhas de escrita são apenas registradas no log.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::campaign::CampaignState;

/// Chave fixa sob a qual o registro da campanha é gravado.
pub const STORAGE_KEY: &str = "saletarget_data_v3";

/// Armazenamento chave-valor durável, síncrono e local ao processo.
pub trait KeyValueStore {
    /// Retorna o valor gravado em `key`, ou `None` se ausente ou ilegível.
    fn get(&self, key: &str) -> Option<String>;

    /// Sobrescreve o valor em `key`.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Um arquivo `<chave>.json` por chave dentro de um diretório.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Abre o diretório de dados, criando-o se necessário.
    ///
    /// Um diretório inutilizável não impede a abertura: o aviso fica no log,
    /// as leituras dão `None` e cada escrita falha (e é registrada) por conta própria.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(error = %e, dir = %dir.display(), "data directory unusable, progress will not be saved");
        }
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)
    }
}

/// Armazenamento em memória; pode simular um disco cheio.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Um store cujas escritas sempre falham.
    #[cfg(test)]
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            fail_writes: true,
        }
    }

    /// Um store já contendo `value` em `key`.
    #[cfg(test)]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "storage full"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Decodifica um registro gravado. Qualquer formato inesperado vira `None`.
pub fn decode_campaign(raw: &str) -> Option<CampaignState> {
    match serde_json::from_str::<CampaignState>(raw) {
        Ok(state) if state.is_valid() => Some(state),
        Ok(_) => {
            debug!("stored campaign has out-of-range amounts");
            None
        }
        Err(e) => {
            debug!(error = %e, "stored campaign is not a valid record");
            None
        }
    }
}

/// Carrega a campanha gravada, ou os valores padrão se ausente/corrompida.
pub fn load_campaign(store: &impl KeyValueStore) -> CampaignState {
    match store.get(STORAGE_KEY).as_deref().and_then(decode_campaign) {
        Some(state) => state,
        None => {
            debug!(key = STORAGE_KEY, "no usable campaign record, starting from defaults");
            CampaignState::default()
        }
    }
}

/// Grava a campanha. Falhas são registradas e ignoradas.
pub fn save_campaign(store: &mut impl KeyValueStore, state: &CampaignState) {
    let raw = match serde_json::to_string(state) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "could not encode campaign, progress not saved");
            return;
        }
    };
    if let Err(e) = store.set(STORAGE_KEY, &raw) {
        warn!(error = %e, key = STORAGE_KEY, "could not persist campaign, progress not saved");
    }
}
