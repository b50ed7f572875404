//! Reading tests, grouped by feature.

mod data_types;
mod metadata;
mod modes;
mod sheet_blocks;
