mod materialize_test;
mod multi_threaded_test;
