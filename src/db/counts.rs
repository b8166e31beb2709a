use crate::error::InventoryResult;
use crate::models::Distribution;

use super::EquipmentStore;

impl EquipmentStore {
    /// Number of records per category, grouped on the raw category text.
    pub fn count_by_category(&self) -> InventoryResult<Distribution> {
        self.grouped_count(
            "SELECT category, COUNT(*) FROM equipment GROUP BY category ORDER BY category",
        )
    }

    /// Number of records per status label.
    pub fn count_by_status(&self) -> InventoryResult<Distribution> {
        self.grouped_count("SELECT status, COUNT(*) FROM equipment GROUP BY status ORDER BY status")
    }

    fn grouped_count(&self, sql: &str) -> InventoryResult<Distribution> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get::<_, String>(0)?, count.max(0) as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Distribution::new(entries))
    }
}
