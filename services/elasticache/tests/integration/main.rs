mod config_test;
mod web_test;
