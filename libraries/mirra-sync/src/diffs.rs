use crate::types::SyncOperation;
use mirra_core::RelativePath;
use std::fmt;

/// Changes needed to make the destination match the source.
///
/// Every path is relative to the sync roots. Engine entry points return
/// `Option<Diffs>`, `None` meaning there is nothing to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diffs {
    pub to_create: Vec<RelativePath>,
    pub to_update: Vec<RelativePath>,
    pub to_delete: Vec<RelativePath>,
}

impl Diffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    /// `None` if there are no changes.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn batch(&self, operation: SyncOperation) -> &[RelativePath] {
        match operation {
            SyncOperation::Create => &self.to_create,
            SyncOperation::Update => &self.to_update,
            SyncOperation::Delete => &self.to_delete,
        }
    }

    pub fn push(&mut self, operation: SyncOperation, path: RelativePath) {
        match operation {
            SyncOperation::Create => self.to_create.push(path),
            SyncOperation::Update => self.to_update.push(path),
            SyncOperation::Delete => self.to_delete.push(path),
        }
    }
}

impl fmt::Display for Diffs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (operation, heading) in [
            (SyncOperation::Delete, "To delete"),
            (SyncOperation::Update, "To update"),
            (SyncOperation::Create, "To create"),
        ] {
            let batch = self.batch(operation);
            if batch.is_empty() {
                continue;
            }
            writeln!(f, "{} ({}):", heading, batch.len())?;
            for path in batch {
                writeln!(f, "\t{}", path)?;
            }
        }
        Ok(())
    }
}
