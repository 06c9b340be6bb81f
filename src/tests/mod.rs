pub mod test_stats;
pub mod test_training;
