use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::error::{BoardError, Result};
use crate::models::{RemoteUser, Student, MAX_ATTENDANCE, MIN_ATTENDANCE};

/// Key the student collection is persisted under.
pub const SNAPSHOT_KEY: &str = "studentAttendance";

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;
    async fn write(&self, key: &str, payload: &str) -> Result<()>;
}

#[async_trait]
pub trait StudentSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Snapshot,
    Fetched,
    /// The fetch failed; the collection is empty.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub students: Arc<[Student]>,
    pub origin: LoadOrigin,
}

/// Owns the student collection for the lifetime of the process.
///
/// The first `load` reads the snapshot, or fetches and persists a fresh
/// collection when there is none. Every later `load` returns the same result.
pub struct Repository {
    store: Arc<dyn SnapshotStore>,
    source: Arc<dyn StudentSource>,
    rng: Mutex<StdRng>,
    cache: OnceCell<Loaded>,
}

impl Repository {
    pub fn new(store: Arc<dyn SnapshotStore>, source: Arc<dyn StudentSource>) -> Self {
        Self {
            store,
            source,
            rng: Mutex::new(StdRng::from_entropy()),
            cache: OnceCell::new(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub async fn load(&self) -> Loaded {
        self.cache.get_or_init(|| self.resolve()).await.clone()
    }

    async fn resolve(&self) -> Loaded {
        if let Some(students) = self.read_snapshot().await {
            info!(count = students.len(), "loaded students from snapshot");
            return Loaded {
                students: students.into(),
                origin: LoadOrigin::Snapshot,
            };
        }

        let users = match self.source.fetch_users().await {
            Ok(users) => users,
            Err(err) => {
                error!(error = %err, "error fetching students");
                return Loaded {
                    students: Vec::<Student>::new().into(),
                    origin: LoadOrigin::Unavailable,
                };
            }
        };

        let students = self.assign_attendance(users);
        info!(count = students.len(), "fetched students");

        if let Err(err) = self.write_snapshot(&students).await {
            warn!(error = %err, "failed to persist student snapshot");
        }

        Loaded {
            students: students.into(),
            origin: LoadOrigin::Fetched,
        }
    }

    async fn read_snapshot(&self) -> Option<Vec<Student>> {
        let payload = match self.store.read(SNAPSHOT_KEY).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read student snapshot, fetching fresh data");
                return None;
            }
        };

        match parse_snapshot(&payload) {
            Ok(students) => Some(students),
            Err(err) => {
                warn!(error = %err, "discarding student snapshot, fetching fresh data");
                None
            }
        }
    }

    async fn write_snapshot(&self, students: &[Student]) -> Result<()> {
        let payload = encode_snapshot(students)?;
        self.store.write(SNAPSHOT_KEY, &payload).await
    }

    fn assign_attendance(&self, users: Vec<RemoteUser>) -> Vec<Student> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        users
            .into_iter()
            .map(|user| {
                let attendance = rng.gen_range(MIN_ATTENDANCE..=MAX_ATTENDANCE);
                Student::from_remote(user, attendance)
            })
            .collect()
    }
}

pub fn encode_snapshot(students: &[Student]) -> Result<String> {
    Ok(serde_json::to_string(students)?)
}

/// Parses a snapshot, rejecting duplicate ids and out-of-range attendance.
pub fn parse_snapshot(payload: &str) -> Result<Vec<Student>> {
    let students: Vec<Student> = serde_json::from_str(payload)?;
    let mut seen = HashSet::new();

    for student in &students {
        if !seen.insert(student.id) {
            return Err(BoardError::InvalidSnapshot(format!(
                "duplicate student id {}",
                student.id
            )));
        }
        if !(MIN_ATTENDANCE..=MAX_ATTENDANCE).contains(&student.attendance) {
            return Err(BoardError::InvalidSnapshot(format!(
                "attendance {} out of range for student {}",
                student.attendance, student.id
            )));
        }
    }

    Ok(students)
}
