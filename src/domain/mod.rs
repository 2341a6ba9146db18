pub mod branch;
pub mod change;
pub mod commit;
pub mod icon;
pub mod narration;
