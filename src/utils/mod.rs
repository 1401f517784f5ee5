pub mod db_utils;
pub mod slots;
pub mod week;
