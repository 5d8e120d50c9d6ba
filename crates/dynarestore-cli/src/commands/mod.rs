pub mod restore;
pub mod tenant;
