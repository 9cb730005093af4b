mod tests_expressions;
mod tests_query_options;
