mod set_vm;

pub use set_vm::{SetCardVm, map_set_cards};
