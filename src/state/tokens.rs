use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::domain::types::CategoryId;

/// Ticket handed out when a backend request is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationToken(u64);

impl Display for OperationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tracks the latest token issued per category and for the list fetch.
///
/// A completion may mutate local state only while its token is still the
/// latest one for its key.
#[derive(Debug, Default)]
pub struct OperationTokens {
    next: u64,
    latest: HashMap<CategoryId, OperationToken>,
    fetch: Option<OperationToken>,
}

impl OperationTokens {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&mut self) -> OperationToken {
        self.next += 1;
        OperationToken(self.next)
    }

    /// Issue a token for `id`, superseding any request still in flight for it.
    pub fn issue(&mut self, id: &CategoryId) -> OperationToken {
        let token = self.next_token();
        self.latest.insert(id.clone(), token);
        token
    }

    pub fn is_latest(&self, id: &CategoryId, token: OperationToken) -> bool {
        self.latest.get(id) == Some(&token)
    }

    /// Release `token` for `id`. Returns `true` when it was still the latest.
    pub fn settle(&mut self, id: &CategoryId, token: OperationToken) -> bool {
        if self.is_latest(id, token) {
            self.latest.remove(id);
            true
        } else {
            false
        }
    }

    /// Number of per-category requests still awaiting completion.
    pub fn in_flight(&self) -> usize {
        self.latest.len()
    }

    pub fn issue_fetch(&mut self) -> OperationToken {
        let token = self.next_token();
        self.fetch = Some(token);
        token
    }

    /// Release the fetch token. Returns `true` when it was still the latest.
    pub fn settle_fetch(&mut self, token: OperationToken) -> bool {
        if self.fetch == Some(token) {
            self.fetch = None;
            true
        } else {
            false
        }
    }
}
