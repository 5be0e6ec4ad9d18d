pub mod counter_logs;
pub mod ddl;
pub mod sequences;
pub mod sounds;
pub mod timers;
