mod tests_concurrency;
mod tests_parse_uri;
