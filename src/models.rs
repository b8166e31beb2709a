//! Domain models that mirror the SQLite schema and get passed between the
//! store, the inventory service and the TUI. They stay plain data holders so
//! the other layers can focus on persistence, policy and presentation.

use std::fmt;
use std::str::FromStr;

/// Holder value stored for equipment that nobody is using.
pub const HOLDER_NONE: &str = "N/A";

/// Availability of a piece of equipment. The persisted text matches
/// [`Status::as_str`] exactly, so reports group on the same labels the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Available,
    InUse,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Available, Status::InUse];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::InUse => "In Use",
        }
    }

    /// The other state; used by the form's status picker.
    pub fn toggled(self) -> Self {
        match self {
            Status::Available => Status::InUse,
            Status::InUse => Status::Available,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not one we know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown equipment status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Status::Available),
            "In Use" => Ok(Status::InUse),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One playground item. `id` is the primary key; `holder` is either the
/// student identifier currently using the item or [`HOLDER_NONE`].
pub struct Equipment {
    pub name: String,
    pub id: String,
    /// Free-form classification such as "Ball" or "Net". Reports group on the
    /// raw text, so "ball" and "Ball" are different categories.
    pub category: String,
    pub status: Status,
    pub holder: String,
}

impl Equipment {
    pub fn is_in_use(&self) -> bool {
        self.status == Status::InUse
    }
}

/// Field values collected by the "add" form. The holder is not part of the
/// draft; the service asks for it when the status requires one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentDraft {
    pub name: String,
    pub id: String,
    pub category: String,
    pub status: Status,
}

/// Replacement values for an update. The id cannot change once created, so it
/// travels separately as the selected record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentChanges {
    pub name: String,
    pub category: String,
    pub status: Status,
}

impl From<&Equipment> for EquipmentChanges {
    fn from(equipment: &Equipment) -> Self {
        Self {
            name: equipment.name.clone(),
            category: equipment.category.clone(),
            status: equipment.status,
        }
    }
}

/// Counts of records per distinct field value, kept in the order the store
/// produced them. That order is also the order bars and slices are drawn in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    entries: Vec<(String, u64)>,
}

impl Distribution {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }
}
