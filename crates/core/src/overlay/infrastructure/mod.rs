pub mod filter_directory;
