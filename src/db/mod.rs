//! Persistence module split across logical submodules. The whole inventory
//! lives in one `equipment` table owned by [`EquipmentStore`].

mod connection;
mod counts;
mod equipment;

pub use connection::EquipmentStore;
