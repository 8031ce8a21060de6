pub mod migrate_legacy;
pub mod recalculate_points;
