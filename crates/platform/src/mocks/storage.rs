//! In-memory mock storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{lock, MockError};
use crate::storage::{File, Storage};

/// Fault injected into [`MockStorage`]. Faults persist until cleared and
/// apply to files opened after injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFault {
    /// `open_file` fails
    Open,
    /// `create_file` fails
    Create,
    /// `read` fails
    Read,
    /// `write` fails if it would extend the file past this many bytes
    DiskFull(usize),
    /// `seek` fails
    Seek,
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, Arc<Mutex<Vec<u8>>>>,
    faults: Vec<StorageFault>,
    open_handles: usize,
    opened_total: usize,
}

/// In-memory [`Storage`] keyed by path.
#[derive(Clone, Default)]
pub struct MockStorage {
    state: Arc<Mutex<State>>,
}

impl MockStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, path: &str, contents: impl Into<Vec<u8>>) {
        lock(&self.state)
            .files
            .insert(path.into(), Arc::new(Mutex::new(contents.into())));
    }

    /// Current contents of `path`.
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        let s = lock(&self.state);
        s.files.get(path).map(|f| lock(f).clone())
    }

    /// Inject a fault.
    pub fn fail(&self, fault: StorageFault) {
        lock(&self.state).faults.push(fault);
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        lock(&self.state).faults.clear();
    }

    /// Handles currently open.
    pub fn open_handles(&self) -> usize {
        lock(&self.state).open_handles
    }

    /// Handles ever opened.
    pub fn opened_total(&self) -> usize {
        lock(&self.state).opened_total
    }

    fn handle(&self, data: Arc<Mutex<Vec<u8>>>, state: &mut State) -> MockFile {
        state.open_handles = state.open_handles.saturating_add(1);
        state.opened_total = state.opened_total.saturating_add(1);
        MockFile {
            data,
            pos: 0,
            faults: state.faults.clone(),
            storage: Arc::clone(&self.state),
        }
    }
}

impl Storage for MockStorage {
    type Error = MockError;
    type File = MockFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let mut s = lock(&self.state);
        if s.faults.contains(&StorageFault::Open) {
            return Err(MockError::Injected);
        }
        let data = s.files.get(path).cloned().ok_or(MockError::NotFound)?;
        Ok(self.handle(data, &mut s))
    }

    async fn create_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let mut s = lock(&self.state);
        if s.faults.contains(&StorageFault::Create) {
            return Err(MockError::Injected);
        }
        let data = Arc::new(Mutex::new(Vec::new()));
        s.files.insert(path.into(), Arc::clone(&data));
        Ok(self.handle(data, &mut s))
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(lock(&self.state).files.contains_key(path))
    }
}

/// Handle to a [`MockStorage`] file. Closing is dropping.
pub struct MockFile {
    data: Arc<Mutex<Vec<u8>>>,
    pos: usize,
    faults: Vec<StorageFault>,
    storage: Arc<Mutex<State>>,
}

impl File for MockFile {
    type Error = MockError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.faults.contains(&StorageFault::Read) {
            return Err(MockError::Injected);
        }
        let data = lock(&self.data);
        let src = data.get(self.pos..).unwrap_or(&[]);
        let n = src.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), src.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let end = self.pos.saturating_add(buf.len());
        let limit = self.faults.iter().find_map(|f| match f {
            StorageFault::DiskFull(n) => Some(*n),
            _ => None,
        });
        if limit.is_some_and(|limit| end > limit) {
            return Err(MockError::Injected);
        }
        let mut data = lock(&self.data);
        if data.len() < end {
            data.resize(end, 0);
        }
        if let Some(dst) = data.get_mut(self.pos..end) {
            dst.copy_from_slice(buf);
        }
        self.pos = end;
        Ok(buf.len())
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        if self.faults.contains(&StorageFault::Seek) {
            return Err(MockError::Injected);
        }
        self.pos = usize::try_from(pos).map_err(|_| MockError::Injected)?;
        Ok(pos)
    }

    fn size(&self) -> u64 {
        lock(&self.data).len() as u64
    }
}

impl Drop for MockFile {
    fn drop(&mut self) {
        let mut s = lock(&self.storage);
        s.open_handles = s.open_handles.saturating_sub(1);
    }
}
