//! Inventory rules on top of [`EquipmentStore`]: who holds what, which actions
//! need a yes/no answer first, and when a selection no longer matches a row.
//!
//! The service never draws anything. Whenever it needs the user's input it
//! calls a [`Prompter`], so the TUI can answer from its modal dialogs and tests
//! can answer from a stub.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::db::EquipmentStore;
use crate::error::{InventoryError, InventoryResult};
use crate::models::{Equipment, EquipmentChanges, EquipmentDraft, Status, HOLDER_NONE};
use crate::report::{self, ChartSink, Report};

/// Yes/no questions the service may ask before changing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    AddRecord,
    ClearAll,
    ReturnEquipment,
}

impl Confirmation {
    pub fn title(self) -> &'static str {
        match self {
            Confirmation::AddRecord => "Confirm",
            Confirmation::ClearAll => "Delete All",
            Confirmation::ReturnEquipment => "Return Equipment",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            Confirmation::AddRecord => "Do you want to add this equipment record?",
            Confirmation::ClearAll => "Delete all playground records? This cannot be undone!",
            Confirmation::ReturnEquipment => "Has the equipment been returned?",
        }
    }
}

/// Source of user answers during an operation.
pub trait Prompter {
    fn confirm(&mut self, question: Confirmation) -> bool;

    /// Student identifier for equipment being put in use. `None` or a blank
    /// answer aborts the operation.
    fn holder_id(&mut self) -> Option<String>;
}

/// Answers gathered ahead of time, e.g. by the TUI's modal flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    pub confirm: bool,
    pub holder: Option<String>,
}

impl Answers {
    pub fn confirmed() -> Self {
        Self {
            confirm: true,
            holder: None,
        }
    }

    pub fn declined() -> Self {
        Self::default()
    }
}

impl Prompter for Answers {
    fn confirm(&mut self, _question: Confirmation) -> bool {
        self.confirm
    }

    fn holder_id(&mut self) -> Option<String> {
        self.holder.clone()
    }
}

/// Result of a service call that completed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Equipment),
    Updated(Equipment),
    Removed(Equipment),
    Cleared(usize),
    Issued(Equipment),
    Returned(Equipment),
    /// The user said no; nothing was written.
    Declined,
}

impl Outcome {
    /// True when the table changed and any cached listing must be re-read.
    pub fn needs_refresh(&self) -> bool {
        !matches!(self, Outcome::Declined)
    }

    /// Record the listing should keep selected after a refresh.
    pub fn focus_id(&self) -> Option<&str> {
        match self {
            Outcome::Added(e) | Outcome::Updated(e) | Outcome::Issued(e) | Outcome::Returned(e) => {
                Some(&e.id)
            }
            Outcome::Removed(_) | Outcome::Cleared(_) | Outcome::Declined => None,
        }
    }

    /// One-line summary for the status bar.
    pub fn describe(&self) -> String {
        match self {
            Outcome::Added(e) => format!("Record {} added successfully!", e.id),
            Outcome::Updated(e) => format!("Record {} updated.", e.id),
            Outcome::Removed(e) => format!("Record {} deleted successfully!", e.id),
            Outcome::Cleared(count) => format!("Deleted {count} record(s)."),
            Outcome::Issued(e) => format!("{} issued to {}.", e.name, e.holder),
            Outcome::Returned(e) => format!("{} returned.", e.name),
            Outcome::Declined => "Cancelled.".to_string(),
        }
    }
}

pub struct InventoryService {
    store: EquipmentStore,
}

impl InventoryService {
    pub fn new(store: EquipmentStore) -> Self {
        Self { store }
    }

    /// Fresh listing for the UI table.
    pub fn records(&self) -> InventoryResult<Vec<Equipment>> {
        self.store.list_all()
    }

    /// Category and status counts of the current inventory.
    pub fn report(&self) -> InventoryResult<Report> {
        Report::collect(&self.store)
    }

    pub fn render_report(&self, sink: &mut dyn ChartSink) -> InventoryResult<()> {
        report::render_from_store(&self.store, sink)
    }

    /// Write the current report as a PDF into `dir`.
    pub fn export_report(&self, dir: &Path, now: DateTime<Local>) -> InventoryResult<PathBuf> {
        report::export(&self.store, dir, now)
    }

    /// Create a record. In-use equipment needs a holder before the
    /// confirmation is asked; available equipment always gets [`HOLDER_NONE`].
    /// The id is stored exactly as typed.
    pub fn add(
        &self,
        draft: EquipmentDraft,
        prompter: &mut dyn Prompter,
    ) -> InventoryResult<Outcome> {
        require(&draft.id, "Equipment ID")?;
        require(&draft.name, "Equipment name")?;
        let id = draft.id;
        let name = draft.name.trim().to_string();
        let holder = acquire_holder(draft.status, prompter)?;

        if !prompter.confirm(Confirmation::AddRecord) {
            info!(%id, "add declined");
            return Ok(Outcome::Declined);
        }

        let equipment = Equipment {
            name,
            id,
            category: draft.category.trim().to_string(),
            status: draft.status,
            holder,
        };
        self.store.insert(&equipment)?;
        info!(id = %equipment.id, status = %equipment.status, "equipment added");
        Ok(Outcome::Added(equipment))
    }

    /// Current stored version of the selected record, for filling the edit
    /// form.
    pub fn view(&self, selection: Option<&Equipment>) -> InventoryResult<Equipment> {
        let selected = selected(selection)?;
        self.store
            .get(&selected.id)?
            .ok_or_else(|| missing(&selected.id))
    }

    /// Replace name, category and status of the selected record. The id is
    /// fixed; the holder follows the same rule as [`Self::add`].
    pub fn update(
        &self,
        selection: Option<&Equipment>,
        changes: EquipmentChanges,
        prompter: &mut dyn Prompter,
    ) -> InventoryResult<Outcome> {
        let selected = selected(selection)?;
        let holder = acquire_holder(changes.status, prompter)?;
        let name = changes.name.trim().to_string();
        let category = changes.category.trim().to_string();

        let touched =
            self.store
                .update_fields(&selected.id, &name, &category, changes.status, &holder)?;
        if touched == 0 {
            warn!(id = %selected.id, "update targeted a missing record");
            return Err(missing(&selected.id));
        }

        info!(id = %selected.id, status = %changes.status, "equipment updated");
        Ok(Outcome::Updated(Equipment {
            name,
            id: selected.id.clone(),
            category,
            status: changes.status,
            holder,
        }))
    }

    pub fn remove(&self, selection: Option<&Equipment>) -> InventoryResult<Outcome> {
        let selected = selected(selection)?;
        if self.store.delete(&selected.id)? == 0 {
            warn!(id = %selected.id, "delete targeted a missing record");
            return Err(missing(&selected.id));
        }
        info!(id = %selected.id, "equipment deleted");
        Ok(Outcome::Removed(selected.clone()))
    }

    pub fn clear(&self, prompter: &mut dyn Prompter) -> InventoryResult<Outcome> {
        if !prompter.confirm(Confirmation::ClearAll) {
            return Ok(Outcome::Declined);
        }
        let deleted = self.store.delete_all()?;
        info!(deleted, "inventory cleared");
        Ok(Outcome::Cleared(deleted))
    }

    /// Flip the selected record between available and in use. Returning asks
    /// for confirmation; issuing asks for the new holder and nothing else.
    pub fn toggle_status(
        &self,
        selection: Option<&Equipment>,
        prompter: &mut dyn Prompter,
    ) -> InventoryResult<Outcome> {
        let selected = selected(selection)?;

        self.store.transaction(|store| {
            let current = store
                .get(&selected.id)?
                .ok_or_else(|| missing(&selected.id))?;

            match current.status {
                Status::InUse => {
                    if !prompter.confirm(Confirmation::ReturnEquipment) {
                        return Ok(Outcome::Declined);
                    }
                    store.update_status(&current.id, Status::Available, HOLDER_NONE)?;
                    info!(id = %current.id, "equipment returned");
                    Ok(Outcome::Returned(Equipment {
                        status: Status::Available,
                        holder: HOLDER_NONE.to_string(),
                        ..current
                    }))
                }
                Status::Available => {
                    let holder = acquire_holder(Status::InUse, prompter)?;
                    store.update_status(&current.id, Status::InUse, &holder)?;
                    info!(id = %current.id, %holder, "equipment issued");
                    Ok(Outcome::Issued(Equipment {
                        status: Status::InUse,
                        holder,
                        ..current
                    }))
                }
            }
        })
    }
}

fn acquire_holder(status: Status, prompter: &mut dyn Prompter) -> InventoryResult<String> {
    match status {
        Status::Available => Ok(HOLDER_NONE.to_string()),
        Status::InUse => prompter
            .holder_id()
            .map(|holder| holder.trim().to_string())
            .filter(|holder| !holder.is_empty())
            .ok_or_else(|| InventoryError::validation("Student ID cannot be empty!")),
    }
}

fn require(value: &str, field: &str) -> InventoryResult<()> {
    if value.trim().is_empty() {
        Err(InventoryError::validation(format!("{field} is required.")))
    } else {
        Ok(())
    }
}

fn selected(selection: Option<&Equipment>) -> InventoryResult<&Equipment> {
    selection.ok_or_else(|| InventoryError::not_found("Select a record from the table."))
}

fn missing(id: &str) -> InventoryError {
    InventoryError::not_found(format!("Equipment {id} no longer exists."))
}
