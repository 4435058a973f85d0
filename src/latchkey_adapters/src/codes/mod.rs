pub mod random_reset_code_generator;
