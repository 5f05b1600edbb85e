//! Armazenamento em memória dos registros de job.
//!
//! O lock do mapa só é mantido o tempo de achar ou inserir um registro. Cada
//! registro tem seu próprio mutex: atualizações de um job são serializadas e
//! jobs diferentes nunca esperam um pelo outro. Leituras devolvem clones,
//! nunca referências vivas.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::SessionError;
use crate::job::{Job, JobUpdate};

/// Mapa `id → job` seguro para chamadores concorrentes.
#[derive(Debug, Default)]
pub struct SessionStore {
    // Lock do mapa; cada job tem o próprio mutex.
    jobs: RwLock<HashMap<String, Arc<Mutex<Job>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere um novo registro. Falha se o id já existir.
    pub fn create(&self, job: Job) -> Result<Job, SessionError> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        if jobs.contains_key(&job.id) {
            return Err(SessionError::DuplicateJob(job.id));
        }
        let snapshot = job.clone();
        jobs.insert(job.id.clone(), Arc::new(Mutex::new(job)));
        Ok(snapshot)
    }

    /// Mescla `update` no registro de `id`, criando um registro vazio se não
    /// existir. Retorna o registro como ficou após a mescla.
    pub fn update(&self, id: &str, update: JobUpdate) -> Job {
        let slot = self.slot_or_insert(id);
        let mut job = slot.lock().unwrap_or_else(PoisonError::into_inner);
        update.apply(&mut job);
        job.clone()
    }

    /// Executa `f` sobre o registro de `id` segurando o lock dele.
    ///
    /// Usado em sequências ler-verificar-gravar, como transições de status.
    /// Retorna `None` se o id for desconhecido.
    pub fn modify<R>(&self, id: &str, f: impl FnOnce(&mut Job) -> R) -> Option<R> {
        let slot = self.slot(id)?;
        let mut job = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut job))
    }

    /// Snapshot do registro de `id`.
    pub fn get(&self, id: &str) -> Option<Job> {
        let slot = self.slot(id)?;
        let job = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(job.clone())
    }

    /// Todos os ids conhecidos, sem ordem definida.
    pub fn list(&self) -> Vec<String> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn slot(&self, id: &str) -> Option<Arc<Mutex<Job>>> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    // Busca com lock de leitura; só pega o de escrita para inserir.
    fn slot_or_insert(&self, id: &str) -> Arc<Mutex<Job>> {
        if let Some(slot) = self.slot(id) {
            return slot;
        }
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        jobs.entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Job::new(id, "", ""))))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobStatus, OutlineEntry, Section};
    use std::thread;

    #[test]
    fn create_then_get_returns_snapshot() {
        let store = SessionStore::new();
        store.create(Job::new("a", "Topic", "Readers")).unwrap();

        let mut snapshot = store.get("a").unwrap();
        snapshot.topic = "changed locally".into();

        assert_eq!(store.get("a").unwrap().topic, "Topic");
    }

    #[test]
    fn create_duplicate_id_fails() {
        let store = SessionStore::new();
        store.create(Job::new("a", "first", "x")).unwrap();

        let err = store.create(Job::new("a", "second", "y")).unwrap_err();
        assert!(matches!(err, SessionError::DuplicateJob(ref id) if id == "a"));
        assert_eq!(store.get("a").unwrap().topic, "first");
    }

    #[test]
    fn get_unknown_is_none() {
        let store = SessionStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn update_merges_fields() {
        let store = SessionStore::new();
        store.create(Job::new("a", "Topic", "Readers")).unwrap();

        let job = store.update(
            "a",
            JobUpdate {
                content: Some("text".into()),
                ..Default::default()
            },
        );
        assert_eq!(job.content, "text");
        assert_eq!(job.topic, "Topic");
    }

    #[test]
    fn update_creates_missing_record() {
        let store = SessionStore::new();
        let job = store.update("fresh", JobUpdate::status(JobStatus::Paused));

        assert_eq!(job.id, "fresh");
        assert_eq!(job.status, JobStatus::Paused);
        assert_eq!(store.list(), vec!["fresh".to_string()]);
    }

    #[test]
    fn modify_unknown_is_none() {
        let store = SessionStore::new();
        assert!(store.modify("nope", |job| job.status).is_none());
    }

    #[test]
    fn list_returns_all_ids() {
        let store = SessionStore::new();
        store.create(Job::new("a", "", "")).unwrap();
        store.create(Job::new("b", "", "")).unwrap();

        let mut ids = store.list();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn concurrent_updates_to_same_job_are_not_lost() {
        let store = Arc::new(SessionStore::new());
        store.create(Job::new("a", "", "")).unwrap();

        let outline_store = Arc::clone(&store);
        let outline = thread::spawn(move || {
            for _ in 0..200 {
                outline_store.update(
                    "a",
                    JobUpdate {
                        outline: Some(vec![OutlineEntry::new("Intro", &[])]),
                        ..Default::default()
                    },
                );
            }
        });
        let sections_store = Arc::clone(&store);
        let sections = thread::spawn(move || {
            for _ in 0..200 {
                sections_store.update(
                    "a",
                    JobUpdate {
                        sections: Some(vec![Section::new("Intro", "Body")]),
                        ..Default::default()
                    },
                );
            }
        });
        outline.join().unwrap();
        sections.join().unwrap();

        let job = store.get("a").unwrap();
        assert_eq!(job.outline.len(), 1);
        assert_eq!(job.sections.len(), 1);
    }

    #[test]
    fn concurrent_creation_of_distinct_jobs() {
        let store = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let id = format!("job-{i}");
                    store.create(Job::new(id.clone(), "t", "a")).unwrap();
                    store.update(&id, JobUpdate::status(JobStatus::Paused));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list().len(), 8);
        for id in store.list() {
            assert_eq!(store.get(&id).unwrap().status, JobStatus::Paused);
        }
    }
}
