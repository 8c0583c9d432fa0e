pub mod mem_store;
