use rusqlite::{ffi, params, Error as SqlError, OptionalExtension, Row};
use tracing::debug;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{Equipment, Status};

use super::EquipmentStore;

const SELECT_COLUMNS: &str = "SELECT name, id, category, status, holder FROM equipment";

impl EquipmentStore {
    /// Every record in insertion order. Each call re-queries, so the result is
    /// always a fresh snapshot of the table.
    pub fn list_all(&self) -> InventoryResult<Vec<Equipment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;

        let equipment = stmt
            .query_map([], equipment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(equipment)
    }

    pub fn get(&self, id: &str) -> InventoryResult<Option<Equipment>> {
        let equipment = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                equipment_from_row,
            )
            .optional()?;
        Ok(equipment)
    }

    /// Insert a new row. A clash on the primary key comes back as
    /// [`InventoryError::DuplicateKey`] and leaves the table untouched.
    pub fn insert(&self, equipment: &Equipment) -> InventoryResult<()> {
        self.conn
            .execute(
                "INSERT INTO equipment (name, id, category, status, holder)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    equipment.name,
                    equipment.id,
                    equipment.category,
                    equipment.status,
                    equipment.holder
                ],
            )
            .map_err(|err| map_duplicate_id(err, &equipment.id))?;

        debug!(id = %equipment.id, "inserted equipment");
        Ok(())
    }

    /// Replace every mutable field of the row with `id`. Returns the number of
    /// rows touched; zero means the id does not exist.
    pub fn update_fields(
        &self,
        id: &str,
        name: &str,
        category: &str,
        status: Status,
        holder: &str,
    ) -> InventoryResult<usize> {
        let updated = self.conn.execute(
            "UPDATE equipment SET name = ?1, category = ?2, status = ?3, holder = ?4
             WHERE id = ?5",
            params![name, category, status, holder, id],
        )?;
        Ok(updated)
    }

    pub fn update_status(&self, id: &str, status: Status, holder: &str) -> InventoryResult<usize> {
        let updated = self.conn.execute(
            "UPDATE equipment SET status = ?1, holder = ?2 WHERE id = ?3",
            params![status, holder, id],
        )?;
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> InventoryResult<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM equipment WHERE id = ?1", params![id])?;
        Ok(deleted)
    }

    pub fn delete_all(&self) -> InventoryResult<usize> {
        let deleted = self.conn.execute("DELETE FROM equipment", [])?;
        Ok(deleted)
    }
}

fn equipment_from_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        name: row.get(0)?,
        id: row.get(1)?,
        category: row.get(2)?,
        status: row.get(3)?,
        holder: row.get(4)?,
    })
}

/// Only the primary key is turned into a domain error; any other failure
/// stays a storage error.
fn map_duplicate_id(err: SqlError, id: &str) -> InventoryError {
    match &err {
        SqlError::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            InventoryError::DuplicateKey(id.to_string())
        }
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HOLDER_NONE;

    fn item(id: &str, category: &str, status: Status) -> Equipment {
        Equipment {
            name: format!("{category} {id}"),
            id: id.to_string(),
            category: category.to_string(),
            status,
            holder: match status {
                Status::Available => HOLDER_NONE.to_string(),
                Status::InUse => "S1".to_string(),
            },
        }
    }

    #[test]
    fn insert_then_list_returns_the_record() {
        let store = EquipmentStore::open_in_memory().unwrap();
        let ball = item("E1", "Ball", Status::Available);
        store.insert(&ball).unwrap();

        assert_eq!(store.list_all().unwrap(), vec![ball]);
    }

    #[test]
    fn duplicate_id_is_rejected_and_table_unchanged() {
        let store = EquipmentStore::open_in_memory().unwrap();
        store.insert(&item("E1", "Ball", Status::Available)).unwrap();

        let err = store.insert(&item("E1", "Bat", Status::InUse)).unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateKey(ref id) if id == "E1"));

        let rows = store.list_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Ball");
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = EquipmentStore::open_in_memory().unwrap();
        for id in ["Z9", "A1", "M5"] {
            store.insert(&item(id, "Net", Status::Available)).unwrap();
        }

        let ids: Vec<_> = store.list_all().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["Z9", "A1", "M5"]);
    }

    #[test]
    fn update_fields_rewrites_everything_but_the_id() {
        let store = EquipmentStore::open_in_memory().unwrap();
        store.insert(&item("E1", "Ball", Status::Available)).unwrap();

        let touched = store
            .update_fields("E1", "Cricket bat", "Bat", Status::InUse, "S42")
            .unwrap();
        assert_eq!(touched, 1);

        let stored = store.get("E1").unwrap().unwrap();
        assert_eq!(stored.id, "E1");
        assert_eq!(stored.name, "Cricket bat");
        assert_eq!(stored.category, "Bat");
        assert_eq!(stored.status, Status::InUse);
        assert_eq!(stored.holder, "S42");
    }

    #[test]
    fn writes_against_missing_id_touch_nothing() {
        let store = EquipmentStore::open_in_memory().unwrap();
        store.insert(&item("E1", "Ball", Status::Available)).unwrap();

        assert_eq!(
            store
                .update_fields("nope", "x", "y", Status::Available, HOLDER_NONE)
                .unwrap(),
            0
        );
        assert_eq!(store.update_status("nope", Status::InUse, "S1").unwrap(), 0);
        assert_eq!(store.delete("nope").unwrap(), 0);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn update_status_only_touches_status_and_holder() {
        let store = EquipmentStore::open_in_memory().unwrap();
        store.insert(&item("E1", "Ball", Status::InUse)).unwrap();

        store.update_status("E1", Status::Available, HOLDER_NONE).unwrap();

        let stored = store.get("E1").unwrap().unwrap();
        assert_eq!(stored.name, "Ball E1");
        assert_eq!(stored.status, Status::Available);
        assert_eq!(stored.holder, HOLDER_NONE);
    }

    #[test]
    fn delete_and_delete_all() {
        let store = EquipmentStore::open_in_memory().unwrap();
        for id in ["E1", "E2", "E3"] {
            store.insert(&item(id, "Ball", Status::Available)).unwrap();
        }

        assert_eq!(store.delete("E2").unwrap(), 1);
        assert!(store.get("E2").unwrap().is_none());

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.delete_all().unwrap(), 0);
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let store = EquipmentStore::open_in_memory().unwrap();
        store.insert(&item("E1", "Ball", Status::Available)).unwrap();

        let result: InventoryResult<()> = store.transaction(|store| {
            store.delete("E1")?;
            store.insert(&item("E2", "Bat", Status::Available))?;
            Err(InventoryError::validation("abort"))
        });

        assert!(result.is_err());
        let ids: Vec<_> = store.list_all().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["E1"]);
    }

    #[test]
    fn file_backed_store_reopens_with_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("playground.db");

        {
            let store = EquipmentStore::open(&path).unwrap();
            store.insert(&item("E1", "Ball", Status::Available)).unwrap();
        }

        let store = EquipmentStore::open(&path).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
