mod find_test;
mod write_test;
