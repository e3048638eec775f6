//! Watch list of task fields recorded in history

/// A task field whose changes are journaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    Assignees,
    Milestone,
}

impl TrackedField {
    pub const ALL: [TrackedField; 7] = [
        TrackedField::Title,
        TrackedField::Description,
        TrackedField::Status,
        TrackedField::Priority,
        TrackedField::DueDate,
        TrackedField::Assignees,
        TrackedField::Milestone,
    ];

    /// Attribute name as stored in the task document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::Assignees => "assignees",
            Self::Milestone => "milestone",
        }
    }
}

impl std::fmt::Display for TrackedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
