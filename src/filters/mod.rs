pub mod record;

pub use record::RecordFilter;
