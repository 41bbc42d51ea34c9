pub mod fixed_function_shader;
