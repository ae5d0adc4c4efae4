pub mod api;
pub mod date_utils;
pub mod dialog;
pub mod logging;
