use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use blog_types::{BlogDraft, BlogId, BlogPost};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::results::{DeleteResult, DocumentCursor, InsertOneResult, UpdateResult};
use crate::traits::DocumentStore;

/// A single journal record.
///
/// On-disk format, one record per line:
/// ```text
/// <crc32 of json, 8 lowercase hex digits> <json>\n
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JournalRecord {
    Insert { post: BlogPost },
    Update {
        #[serde(rename = "_id")]
        id: BlogId,
        title: String,
        content: String,
    },
    Delete {
        #[serde(rename = "_id")]
        id: BlogId,
    },
}

impl JournalRecord {
    /// Encode as one journal line, including the trailing newline.
    pub fn encode(&self) -> StoreResult<String> {
        let json =
            serde_json::to_string(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let crc = crc32fast::hash(json.as_bytes());
        Ok(format!("{crc:08x} {json}\n"))
    }

    /// Decode one journal line (without its newline). `line` is the 1-based
    /// line number used in error reports.
    pub fn decode(raw: &[u8], line: usize) -> StoreResult<Self> {
        let corrupt = |reason: String| StoreError::CorruptRecord { line, reason };

        let text = std::str::from_utf8(raw).map_err(|e| corrupt(format!("not UTF-8: {e}")))?;
        let (crc_hex, json) = text
            .split_once(' ')
            .ok_or_else(|| corrupt("missing checksum separator".into()))?;
        let expected = u32::from_str_radix(crc_hex, 16)
            .map_err(|e| corrupt(format!("bad checksum field: {e}")))?;
        let actual = crc32fast::hash(json.as_bytes());
        if actual != expected {
            return Err(corrupt(format!(
                "checksum mismatch: expected {expected:08x}, got {actual:08x}"
            )));
        }
        serde_json::from_str(json).map_err(|e| corrupt(e.to_string()))
    }

    fn apply(self, posts: &mut BTreeMap<BlogId, BlogPost>) {
        match self {
            Self::Insert { post } => {
                posts.insert(post.id, post);
            }
            Self::Update { id, title, content } => {
                if let Some(post) = posts.get_mut(&id) {
                    post.replace(title, content);
                }
            }
            Self::Delete { id } => {
                posts.remove(&id);
            }
        }
    }
}

/// Flush strategy for the journal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` after every record.
    EveryWrite,
    /// Hand records to the OS and let the page cache decide.
    #[default]
    OsDefault,
}

struct JournalState {
    file: File,
    /// Byte length of the journal through its last complete record.
    len: u64,
    posts: BTreeMap<BlogId, BlogPost>,
    records: u64,
    /// A failed append could not be rolled back; only `compact` clears this.
    broken: bool,
}

impl JournalState {
    fn append(&mut self, sync_mode: SyncMode, record: &JournalRecord) -> StoreResult<()> {
        if self.broken {
            return Err(StoreError::Unavailable(
                "journal has a partial record; compact it before writing".into(),
            ));
        }
        let line = record.encode()?;
        let written = self.file.write_all(line.as_bytes()).and_then(|()| match sync_mode {
            SyncMode::EveryWrite => self.file.sync_all(),
            SyncMode::OsDefault => Ok(()),
        });
        if let Err(e) = written {
            if let Err(rollback) = self.truncate_to_len() {
                warn!(error = %rollback, "journal rollback failed");
                self.broken = true;
            }
            return Err(e.into());
        }
        self.len += line.len() as u64;
        self.records += 1;
        Ok(())
    }

    fn truncate_to_len(&mut self) -> io::Result<()> {
        self.file.set_len(self.len)?;
        self.file.seek(SeekFrom::Start(self.len))?;
        Ok(())
    }
}

/// Document store persisted as an append-only journal.
///
/// Every successful mutation appends one [`JournalRecord`]. On open the
/// journal is replayed front-to-back to rebuild the collection; records that
/// fail the checksum or do not parse are logged and skipped, and an
/// unterminated final line (a write torn by a crash) is cut off before the
/// next append. Reads are served from the rebuilt in-memory view. Appends
/// run on the blocking thread pool.
pub struct FileDocumentStore {
    path: PathBuf,
    sync_mode: SyncMode,
    state: Arc<RwLock<JournalState>>,
}

impl FileDocumentStore {
    /// Open (or create) a journal at `path` and replay it.
    pub fn open(path: &Path, sync_mode: SyncMode) -> StoreResult<Self> {
        if path.is_dir() {
            return Err(StoreError::InvalidPath(path.to_path_buf()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;

        let replayed = replay(BufReader::new(&file), path)?;
        let file_len = file.metadata()?.len();
        if replayed.len < file_len {
            warn!(
                path = %path.display(),
                dropped = file_len - replayed.len,
                "truncating torn journal tail"
            );
            file.set_len(replayed.len)?;
        }
        file.seek(SeekFrom::Start(replayed.len))?;
        info!(
            path = %path.display(),
            documents = replayed.posts.len(),
            records = replayed.records,
            "journal opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            sync_mode,
            state: Arc::new(RwLock::new(JournalState {
                file,
                len: replayed.len,
                posts: replayed.posts,
                records: replayed.records,
                broken: false,
            })),
        })
    }

    /// Path to the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended to the journal since it was last compacted.
    pub fn record_count(&self) -> StoreResult<u64> {
        Ok(self.read()?.records)
    }

    /// Rewrite the journal as one insert per live document.
    ///
    /// The new journal is written to a temporary file in the same directory
    /// and renamed over the old one, so a crash mid-compaction leaves the
    /// previous journal intact. The store keeps writing through the handle
    /// of the renamed file.
    pub fn compact(&self) -> StoreResult<()> {
        let mut state = self.write()?;

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        let mut len = 0u64;
        for post in state.posts.values() {
            let line = JournalRecord::Insert { post: post.clone() }.encode()?;
            tmp.write_all(line.as_bytes())?;
            len += line.len() as u64;
        }
        tmp.as_file().sync_all()?;
        let file = tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        state.file = file;
        state.len = len;
        state.records = state.posts.len() as u64;
        state.broken = false;

        debug!(documents = state.records, "journal compacted");
        Ok(())
    }

    /// Run a mutation under the write lock on the blocking pool.
    async fn mutate<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut JournalState, SyncMode) -> StoreResult<T> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let sync_mode = self.sync_mode;
        tokio::task::spawn_blocking(move || {
            let mut guard = state
                .write()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            op(&mut *guard, sync_mode)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("journal task failed: {e}")))?
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, JournalState>> {
        self.state
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, JournalState>> {
        self.state
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

struct Replayed {
    posts: BTreeMap<BlogId, BlogPost>,
    records: u64,
    /// Offset just past the last newline-terminated line.
    len: u64,
}

fn replay(mut reader: impl BufRead, path: &Path) -> StoreResult<Replayed> {
    let mut posts = BTreeMap::new();
    let mut records = 0u64;
    let mut len = 0u64;
    let mut buf = Vec::new();
    let mut line = 0usize;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        line += 1;
        let Some(raw) = buf.strip_suffix(b"\n") else {
            warn!(path = %path.display(), line, bytes = read, "skipping torn journal tail");
            break;
        };
        len += read as u64;
        if raw.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match JournalRecord::decode(raw, line) {
            Ok(record) => {
                record.apply(&mut posts);
                records += 1;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping journal record"),
        }
    }

    debug!(records, documents = posts.len(), "journal replay complete");
    Ok(Replayed { posts, records, len })
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn insert_one(&self, draft: BlogDraft) -> StoreResult<InsertOneResult> {
        self.mutate(move |state, sync_mode| {
            let id = BlogId::generate();
            if state.posts.contains_key(&id) {
                return Err(StoreError::Rejected(format!("duplicate key: {id}")));
            }
            let post = draft.into_post(id);
            state.append(sync_mode, &JournalRecord::Insert { post: post.clone() })?;
            state.posts.insert(id, post);
            debug!(%id, "inserted document");
            Ok(InsertOneResult { inserted_id: id })
        })
        .await
    }

    async fn find_one(&self, id: &BlogId) -> StoreResult<Option<BlogPost>> {
        Ok(self.read()?.posts.get(id).cloned())
    }

    async fn update_one(&self, id: &BlogId, fields: BlogDraft) -> StoreResult<UpdateResult> {
        let id = *id;
        self.mutate(move |state, sync_mode| {
            let modified = match state.posts.get(&id) {
                None => return Ok(UpdateResult::unmatched()),
                Some(post) => post.title != fields.title || post.content != fields.content,
            };
            if modified {
                let record = JournalRecord::Update {
                    id,
                    title: fields.title.clone(),
                    content: fields.content.clone(),
                };
                state.append(sync_mode, &record)?;
                if let Some(post) = state.posts.get_mut(&id) {
                    post.replace(fields.title, fields.content);
                }
            }
            debug!(%id, modified, "updated document");
            Ok(UpdateResult::matched(modified))
        })
        .await
    }

    async fn delete_one(&self, id: &BlogId) -> StoreResult<DeleteResult> {
        let id = *id;
        self.mutate(move |state, sync_mode| {
            if !state.posts.contains_key(&id) {
                return Ok(DeleteResult { deleted_count: 0 });
            }
            state.append(sync_mode, &JournalRecord::Delete { id })?;
            state.posts.remove(&id);
            debug!(%id, "deleted document");
            Ok(DeleteResult { deleted_count: 1 })
        })
        .await
    }

    async fn find_many(&self, limit: usize) -> StoreResult<DocumentCursor> {
        let state = self.read()?;
        let take = if limit == 0 { usize::MAX } else { limit };
        Ok(DocumentCursor::from_posts(
            state.posts.values().take(take).cloned().collect(),
        ))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.posts.len())
    }
}

impl std::fmt::Debug for FileDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDocumentStore")
            .field("path", &self.path)
            .field("sync_mode", &self.sync_mode)
            .finish()
    }
}
