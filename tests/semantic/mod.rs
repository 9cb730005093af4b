mod tests_filters;
mod tests_paths;
