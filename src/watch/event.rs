// src/watch/event.rs

use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a path, reduced to what the watch loop cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Create,
    Write,
    Rename,
    Remove,
    /// Permission / attribute change only.
    Chmod,
    /// Reads and backend-specific noise.
    Ignored,
}

impl FsOp {
    /// True for operations that may add paths to the watch set.
    pub fn may_add(self) -> bool {
        matches!(self, FsOp::Create | FsOp::Write | FsOp::Rename)
    }
}

impl From<&EventKind> for FsOp {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => FsOp::Create,
            EventKind::Modify(ModifyKind::Name(_)) => FsOp::Rename,
            EventKind::Modify(ModifyKind::Metadata(_)) => FsOp::Chmod,
            EventKind::Modify(_) | EventKind::Any => FsOp::Write,
            EventKind::Remove(_) => FsOp::Remove,
            EventKind::Access(_) | EventKind::Other => FsOp::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{
        AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode,
    };

    #[test]
    fn notify_kinds_are_classified() {
        let cases = [
            (EventKind::Create(CreateKind::File), FsOp::Create),
            (EventKind::Create(CreateKind::Folder), FsOp::Create),
            (EventKind::Modify(ModifyKind::Data(DataChange::Content)), FsOp::Write),
            (EventKind::Modify(ModifyKind::Any), FsOp::Write),
            (EventKind::Modify(ModifyKind::Name(RenameMode::To)), FsOp::Rename),
            (EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)), FsOp::Chmod),
            (EventKind::Remove(RemoveKind::File), FsOp::Remove),
            (EventKind::Access(AccessKind::Any), FsOp::Ignored),
            (EventKind::Other, FsOp::Ignored),
        ];
        for (kind, expected) in cases {
            assert_eq!(FsOp::from(&kind), expected, "{kind:?}");
        }
    }
}
