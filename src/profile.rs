//! Perfis de usuário de longo prazo guardados em um arquivo JSON.
//!
//! O arquivo contém um objeto que mapeia id de usuário para um perfil JSON
//! arbitrário. Arquivo ausente ou ilegível começa vazio; cada `set` grava o
//! mapa inteiro de volta.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

/// Perfis carregados em memória com escrita imediata no arquivo.
pub struct ProfileStore {
    // Arquivo de persistência.
    path: PathBuf,
    // Perfis por id de usuário, em ordem estável.
    profiles: BTreeMap<String, Value>,
}

impl ProfileStore {
    /// Abre o store em `path`, carregando o conteúdo existente.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let profiles = load(&path);
        Self { path, profiles }
    }

    /// Clone do perfil de `user_id`, se existir.
    pub fn get(&self, user_id: &str) -> Option<Value> {
        self.profiles.get(user_id).cloned()
    }

    /// Grava `profile` para `user_id` e persiste. Falha de escrita é
    /// registrada em log; o valor em memória é mantido de qualquer forma.
    pub fn set(&mut self, user_id: &str, profile: Value) {
        self.profiles.insert(user_id.to_string(), profile);
        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "failed to save profiles");
        }
    }

    fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.profiles)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

// Lê o arquivo; ausente ou corrompido resulta em mapa vazio.
fn load(path: &Path) -> BTreeMap<String, Value> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&contents) {
        Ok(profiles) => profiles,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable profile file");
            BTreeMap::new()
        }
    }
}
