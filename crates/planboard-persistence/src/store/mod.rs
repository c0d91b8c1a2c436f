pub mod atomic_writer;
pub mod json_file_store;
pub mod local_card_store;

pub use atomic_writer::AtomicWriter;
pub use json_file_store::JsonFileStore;
pub use local_card_store::LocalCardStore;
